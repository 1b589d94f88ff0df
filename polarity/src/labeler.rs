use core::ops::Range;

use tracing::debug;

use crate::document::{Corpus, Document};
use crate::sentiment_intensity::PolarityScorer;

/// Assigns polarity scores and sentiment labels to documents.
///
/// # Examples
///
/// ```
/// use polarity::{Corpus, Label, LexiconLabeler, SentimentIntensityAnalyzer};
///
/// let corpus = Corpus::from_texts(["great product", "awful smell", "plain box"]);
/// let labeler = LexiconLabeler::new(SentimentIntensityAnalyzer::new());
/// let labeled = labeler.label_range(&corpus, 0..2);
///
/// assert_eq!(Some(Label::Positive), labeled.documents()[0].label());
/// assert_eq!(Some(Label::Negative), labeled.documents()[1].label());
/// assert_eq!(None, labeled.documents()[2].label());
/// ```
pub struct LexiconLabeler<S> {
    scorer: S,
}

impl<S> LexiconLabeler<S>
where
    S: PolarityScorer,
{
    pub fn new(scorer: S) -> Self {
        Self { scorer }
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Scores one document.
    ///
    /// Documents without text are returned unchanged.
    pub fn label_document(&self, doc: &Document) -> Document {
        match doc.text() {
            Some(text) => doc.clone().with_polarity(self.scorer.polarity(text)),
            None => doc.clone(),
        }
    }

    /// Scores every document of the corpus.
    pub fn label_all(&self, corpus: &Corpus) -> Corpus {
        self.label_range(corpus, 0..corpus.len())
    }

    /// Scores the documents whose positions fall in `range`.
    ///
    /// The range is clamped to the corpus. Documents outside of it keep no score and no label.
    pub fn label_range(&self, corpus: &Corpus, range: Range<usize>) -> Corpus {
        let end = range.end.min(corpus.len());
        let start = range.start.min(end);
        debug!(start, end, "labeling documents");
        corpus
            .iter()
            .enumerate()
            .map(|(i, doc)| {
                if (start..end).contains(&i) {
                    self.label_document(doc)
                } else {
                    doc.clone()
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::document::Label;

    #[test]
    fn test_zero_score_is_negative() {
        let labeler = LexiconLabeler::new(|_: &str| 0.0);
        let labeled = labeler.label_all(&Corpus::from_texts(["anything"]));
        assert_eq!(Some(Label::Negative), labeled.documents()[0].label());
        assert_eq!(Some(0.0), labeled.documents()[0].polarity());
    }

    #[test]
    fn test_positive_score_is_positive() {
        let labeler = LexiconLabeler::new(|_: &str| 1e-9);
        let labeled = labeler.label_all(&Corpus::from_texts(["anything"]));
        assert_eq!(Some(Label::Positive), labeled.documents()[0].label());
    }

    #[test]
    fn test_label_range_clamped() {
        let labeler = LexiconLabeler::new(|_: &str| 0.5);
        let corpus = Corpus::from_texts(["a", "b", "c"]);

        let labeled = labeler.label_range(&corpus, 1..10);
        let labels: Vec<_> = labeled.iter().map(Document::label).collect();
        assert_eq!(vec![None, Some(Label::Positive), Some(Label::Positive)], labels);

        let labeled = labeler.label_range(&corpus, 5..10);
        assert!(labeled.iter().all(|doc| doc.label().is_none()));
    }

    #[test]
    fn test_missing_text_not_labeled() {
        let labeler = LexiconLabeler::new(|_: &str| 0.5);
        let corpus = Corpus::new(vec![Document::missing(), Document::new("x")]);
        let labeled = labeler.label_all(&corpus);
        assert_eq!(None, labeled.documents()[0].label());
        assert_eq!(Some(Label::Positive), labeled.documents()[1].label());
    }

    #[test]
    fn test_scores_normalized_text() {
        let labeler = LexiconLabeler::new(|text: &str| if text == "clean" { 1.0 } else { -1.0 });
        let corpus = Corpus::new(vec![Document::new("RAW!").with_normalized_text("clean")]);
        let labeled = labeler.label_all(&corpus);
        assert_eq!(Some(Label::Positive), labeled.documents()[0].label());
    }
}
