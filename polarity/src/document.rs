use core::fmt;
use core::str::FromStr;

use hashbrown::HashMap;

use crate::utils::{tokens, Indexer};

/// Sentiment label.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Label {
    /// Negative or neutral sentiment. (`neg`)
    Negative = 0,

    /// Positive sentiment. (`pos`)
    Positive = 1,
}

impl Label {
    /// All labels in report order.
    pub const ALL: [Self; 2] = [Self::Negative, Self::Positive];

    /// Maps a polarity score to a label.
    ///
    /// Only scores strictly greater than zero are positive. Zero, negative scores and NaN are
    /// negative.
    ///
    /// # Examples
    ///
    /// ```
    /// use polarity::Label;
    ///
    /// assert_eq!(Label::Positive, Label::from_score(0.0001));
    /// assert_eq!(Label::Negative, Label::from_score(0.0));
    /// assert_eq!(Label::Negative, Label::from_score(-0.3));
    /// ```
    pub fn from_score(score: f64) -> Self {
        if score > 0.0 {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    /// Gets the short name of the label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Negative => "neg",
            Self::Positive => "pos",
        }
    }

    pub(crate) fn class_id(self) -> f64 {
        f64::from(self as u8)
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Label {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pos" => Ok(Self::Positive),
            "neg" => Ok(Self::Negative),
            _ => Err("Could not parse a label value"),
        }
    }
}

/// A single review.
///
/// Documents are values: every stage of the pipeline returns a new document instead of changing
/// an existing one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    raw: Option<String>,
    normalized: Option<String>,
    polarity: Option<f64>,
    label: Option<Label>,
    rating: Option<f64>,
}

impl Document {
    /// Creates a new document from raw review text.
    pub fn new<S>(raw: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            raw: Some(raw.into()),
            ..Self::default()
        }
    }

    /// Creates a document whose review text is missing.
    pub fn missing() -> Self {
        Self::default()
    }

    /// Returns a copy with the given star rating.
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Returns a copy with the given normalized text.
    pub fn with_normalized_text<S>(mut self, text: S) -> Self
    where
        S: Into<String>,
    {
        self.normalized = Some(text.into());
        self
    }

    /// Returns a copy carrying the polarity score and the label derived from it.
    pub fn with_polarity(mut self, score: f64) -> Self {
        self.polarity = Some(score);
        self.label = Some(Label::from_score(score));
        self
    }

    /// Returns a copy carrying the given label without a polarity score.
    pub fn with_label(mut self, label: Label) -> Self {
        self.label = Some(label);
        self
    }

    /// Gets the raw review text.
    pub fn raw_text(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Gets the normalized text.
    pub fn normalized_text(&self) -> Option<&str> {
        self.normalized.as_deref()
    }

    /// Gets the normalized text if present, otherwise the raw text.
    pub fn text(&self) -> Option<&str> {
        self.normalized.as_deref().or(self.raw.as_deref())
    }

    pub fn polarity(&self) -> Option<f64> {
        self.polarity
    }

    pub fn label(&self) -> Option<Label> {
        self.label
    }

    pub fn rating(&self) -> Option<f64> {
        self.rating
    }
}

/// An ordered collection of documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Creates a corpus of unrated documents from raw texts.
    ///
    /// # Examples
    ///
    /// ```
    /// use polarity::Corpus;
    ///
    /// let corpus = Corpus::from_texts(["Great product", "Broke after a day"]);
    /// assert_eq!(2, corpus.len());
    /// ```
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts.into_iter().map(Document::new).collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    pub fn into_documents(self) -> Vec<Document> {
        self.documents
    }

    /// Maps every document through `f`, producing a new corpus in the same order.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: FnMut(&Document) -> Document,
    {
        self.documents.iter().map(f).collect()
    }

    /// Counts tokens of the current texts (normalized if present) over the whole corpus.
    pub fn term_frequencies(&self) -> TermFrequencies {
        TermFrequencies::from_texts(self.documents.iter().filter_map(Document::text))
    }

    /// Computes the mean star rating of the rated documents of each label.
    ///
    /// Labels without any rated document are omitted.
    pub fn mean_rating_by_label(&self) -> Vec<(Label, f64)> {
        let mut sums = [(0.0, 0usize); 2];
        for doc in &self.documents {
            if let (Some(label), Some(rating)) = (doc.label, doc.rating) {
                let (sum, n) = &mut sums[label.index()];
                *sum += rating;
                *n += 1;
            }
        }
        Label::ALL
            .iter()
            .zip(sums)
            .filter(|(_, (_, n))| *n != 0)
            .map(|(&label, (sum, n))| (label, sum / n as f64))
            .collect()
    }
}

impl FromIterator<Document> for Corpus {
    fn from_iter<T: IntoIterator<Item = Document>>(iter: T) -> Self {
        Self {
            documents: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Corpus {
    type Item = Document;
    type IntoIter = std::vec::IntoIter<Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.into_iter()
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Document;
    type IntoIter = core::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

/// Corpus-wide token counts.
///
/// Tokens are ranked by count in descending order. Ties keep the order in which the tokens first
/// appeared in the corpus.
#[derive(Debug, Clone, Default)]
pub struct TermFrequencies {
    ranked: Vec<(String, usize)>,
    counts: HashMap<String, usize>,
}

impl TermFrequencies {
    /// Counts whitespace-separated tokens of all texts in a single pass.
    pub fn from_texts<'a, I>(texts: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut indexer = Indexer::<String>::new();
        let mut counts = vec![];
        for text in texts {
            for token in tokens(text) {
                let id = indexer.get_id(token);
                if id == counts.len() {
                    counts.push(0);
                }
                counts[id] += 1;
            }
        }
        let mut ranked: Vec<_> = indexer.into_keys().into_iter().zip(counts).collect();
        // stable: equal counts stay in first-appearance order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        let counts = ranked.iter().cloned().collect();
        Self { ranked, counts }
    }

    /// Gets tokens with their counts, most frequent first.
    pub fn ranked(&self) -> &[(String, usize)] {
        &self.ranked
    }

    /// Gets the count of a token.
    pub fn count(&self, token: &str) -> usize {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Gets the number of distinct tokens.
    pub fn n_distinct(&self) -> usize {
        self.ranked.len()
    }

    /// Gets the `n` least frequent tokens, i.e. the tail of the ranking.
    ///
    /// `n` is clamped to the number of distinct tokens.
    pub fn least_frequent(&self, n: usize) -> impl Iterator<Item = &str> {
        let start = self.ranked.len().saturating_sub(n);
        self.ranked[start..].iter().map(|(token, _)| token.as_str())
    }

    /// Gets tokens whose count is strictly greater than `threshold`, most frequent first.
    pub fn above(&self, threshold: usize) -> impl Iterator<Item = (&str, usize)> {
        self.ranked
            .iter()
            .take_while(move |(_, count)| *count > threshold)
            .map(|(token, count)| (token.as_str(), *count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_boundary() {
        assert_eq!(Label::Negative, Label::from_score(0.0));
        assert_eq!(Label::Negative, Label::from_score(-0.0));
        assert_eq!(Label::Negative, Label::from_score(f64::NAN));
        assert_eq!(Label::Positive, Label::from_score(f64::MIN_POSITIVE));
        assert_eq!(Label::Positive, Label::from_score(1.0));
    }

    #[test]
    fn test_label_parse() {
        assert_eq!(Ok(Label::Positive), "pos".parse());
        assert_eq!(Ok(Label::Negative), "neg".parse());
        assert!("neutral".parse::<Label>().is_err());
        assert_eq!("pos", Label::Positive.to_string());
    }

    #[test]
    fn test_document_values() {
        let doc = Document::new("Great!").with_rating(5.0);
        let normalized = doc.clone().with_normalized_text("great");
        assert_eq!(Some("Great!"), doc.text());
        assert_eq!(Some("great"), normalized.text());
        assert_eq!(Some("Great!"), normalized.raw_text());

        let scored = normalized.with_polarity(0.0);
        assert_eq!(Some(Label::Negative), scored.label());
        assert_eq!(Some(0.0), scored.polarity());
        assert_eq!(Some(5.0), scored.rating());
        assert_eq!(None, Document::missing().text());
    }

    #[test]
    fn test_term_frequencies_ranking() {
        let freqs = TermFrequencies::from_texts(["b a c", "a d", "c a"]);
        assert_eq!(("a".to_string(), 3), freqs.ranked()[0]);
        let tokens: Vec<_> = freqs.ranked().iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(vec!["a", "c", "b", "d"], tokens);
        assert_eq!(2, freqs.count("c"));
        assert_eq!(0, freqs.count("z"));
    }

    #[test]
    fn test_term_frequencies_least_frequent_clamped() {
        let freqs = TermFrequencies::from_texts(["x y y"]);
        let rare: Vec<_> = freqs.least_frequent(1).collect();
        assert_eq!(vec!["x"], rare);
        let rare: Vec<_> = freqs.least_frequent(1000).collect();
        assert_eq!(vec!["y", "x"], rare);
    }

    #[test]
    fn test_term_frequencies_above() {
        let freqs = TermFrequencies::from_texts(["a a a b b c"]);
        let above: Vec<_> = freqs.above(1).collect();
        assert_eq!(vec![("a", 3), ("b", 2)], above);
    }

    #[test]
    fn test_mean_rating_by_label() {
        let corpus = Corpus::new(vec![
            Document::new("a").with_rating(5.0).with_polarity(0.8),
            Document::new("b").with_rating(4.0).with_polarity(0.2),
            Document::new("c").with_rating(1.0).with_polarity(-0.6),
            Document::new("d").with_rating(3.0),
        ]);
        assert_eq!(
            vec![(Label::Negative, 1.0), (Label::Positive, 4.5)],
            corpus.mean_rating_by_label()
        );
    }
}
