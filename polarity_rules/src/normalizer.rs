use polarity::{Corpus, TermFrequencies};
use tracing::info;

use crate::string_filters::{
    EnglishLemmatizer, LemmatizeFilter, Lemmatizer, LowercaseFilter, RareWordsFilter,
    StopwordsFilter, StripDigitsFilter, StripPunctuationFilter,
};
use crate::StringFilter;

/// Review text normalizer.
///
/// Texts are lowercased, stripped of punctuation and digits, and stopwords are removed. Then the
/// least frequent tokens of the whole corpus are removed and the remaining tokens are lemmatized.
pub struct TextNormalizer {
    cleaners: Vec<Box<dyn StringFilter + Send + Sync>>,
    lemmatizer: Box<dyn StringFilter + Send + Sync>,
    rare_word_limit: usize,
}

impl TextNormalizer {
    /// Number of least frequent tokens removed by default.
    pub const DEFAULT_RARE_WORD_LIMIT: usize = 1000;

    /// Creates a normalizer with the English stopword list and lemmatizer.
    pub fn new() -> Self {
        Self {
            cleaners: vec![
                Box::new(LowercaseFilter),
                Box::new(StripPunctuationFilter),
                Box::new(StripDigitsFilter),
                Box::new(StopwordsFilter::english()),
            ],
            lemmatizer: Box::new(LemmatizeFilter::new(EnglishLemmatizer::new())),
            rare_word_limit: Self::DEFAULT_RARE_WORD_LIMIT,
        }
    }

    /// Sets the number of least frequent tokens to remove. `0` disables the stage.
    pub fn rare_word_limit(mut self, limit: usize) -> Self {
        self.rare_word_limit = limit;
        self
    }

    /// Replaces the stopword list.
    pub fn stopwords(mut self, stopwords: StopwordsFilter) -> Self {
        self.cleaners[3] = Box::new(stopwords);
        self
    }

    /// Replaces the lemmatizer.
    pub fn lemmatizer<L>(mut self, lemmatizer: L) -> Self
    where
        L: Lemmatizer + Send + Sync + 'static,
    {
        self.lemmatizer = Box::new(LemmatizeFilter::new(lemmatizer));
        self
    }

    /// Applies the corpus-independent stages: case folding, punctuation and digit stripping,
    /// and stopword removal.
    pub fn clean(&self, text: &str) -> String {
        let mut text = text.to_string();
        for cleaner in &self.cleaners {
            text = cleaner.filter(&text);
        }
        text
    }

    /// Normalizes a single text with a rare-word set learned from a corpus.
    pub fn normalize_text(&self, text: &str, rare_words: &RareWordsFilter) -> String {
        let text = rare_words.filter(&self.clean(text));
        self.lemmatizer.filter(&text)
    }

    /// Normalizes every document of a corpus.
    ///
    /// Documents without raw text stay without text. Documents that become empty are kept.
    ///
    /// # Returns
    ///
    /// The normalized corpus and the rare-word set computed from it.
    pub fn normalize_corpus(&self, corpus: &Corpus) -> (Corpus, RareWordsFilter) {
        let cleaned: Vec<Option<String>> = corpus
            .iter()
            .map(|doc| doc.raw_text().map(|text| self.clean(text)))
            .collect();

        let frequencies =
            TermFrequencies::from_texts(cleaned.iter().filter_map(|text| text.as_deref()));
        let rare_words = RareWordsFilter::from_frequencies(&frequencies, self.rare_word_limit);
        info!(
            n_documents = corpus.len(),
            n_distinct = frequencies.n_distinct(),
            n_rare = rare_words.len(),
            "normalizing corpus"
        );

        let normalized = corpus
            .iter()
            .zip(cleaned)
            .map(|(doc, text)| match text {
                Some(text) => {
                    let text = self.lemmatizer.filter(&rare_words.filter(&text));
                    doc.clone().with_normalized_text(text)
                }
                None => doc.clone(),
            })
            .collect::<Corpus>();
        (normalized, rare_words)
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use polarity::Document;

    #[test]
    fn test_clean() {
        let normalizer = TextNormalizer::new();
        assert_eq!(
            "product works well gb",
            normalizer.clean("This product works VERY well!!! 64GB :-)")
        );
    }

    #[test]
    fn test_no_digits_or_punctuation() {
        let normalizer = TextNormalizer::new().rare_word_limit(0);
        let corpus = Corpus::from_texts([
            "It's 100% worth it -- 5 stars!",
            "Broke after 2 days... snake_case_name?",
            "Ünïcödé ÇAFÉ ٣ items",
            "great\u{FF3F}product nice\u{203F}fit ok\u{2040}good",
        ]);
        let (normalized, _) = normalizer.normalize_corpus(&corpus);
        for doc in &normalized {
            let text = doc.normalized_text().unwrap();
            assert!(text.chars().all(|c| c.is_alphabetic() || c == ' '), "{}", text);
            assert!(!text.contains("  "));
            assert_eq!(text.to_lowercase(), text);
        }
        assert_eq!(Some("worth star"), normalized.documents()[0].normalized_text());
    }

    #[test]
    fn test_clean_idempotent() {
        let normalizer = TextNormalizer::new();
        let once = normalizer.clean("The CASES were 3x too small, wasn't it?");
        assert_eq!(once, normalizer.clean(&once));
    }

    #[test]
    fn test_rare_word_clamp_empties_small_corpus() {
        let normalizer = TextNormalizer::new();
        let corpus = Corpus::from_texts(["great product", "great price"]);
        let (normalized, rare_words) = normalizer.normalize_corpus(&corpus);
        assert_eq!(3, rare_words.len());
        for doc in &normalized {
            assert_eq!(Some(""), doc.normalized_text());
        }
    }

    #[test]
    fn test_missing_text_stays_missing() {
        let normalizer = TextNormalizer::new().rare_word_limit(0);
        let corpus = Corpus::new(vec![Document::missing(), Document::new("Great!")]);
        let (normalized, _) = normalizer.normalize_corpus(&corpus);
        assert_eq!(None, normalized.documents()[0].text());
        assert_eq!(Some("great"), normalized.documents()[1].normalized_text());
    }

    #[test]
    fn test_normalize_text_uses_rare_words() {
        let normalizer = TextNormalizer::new();
        let rare_words = RareWordsFilter::new(["charger"]);
        assert_eq!(
            "great battery awful",
            normalizer.normalize_text("Great batteries, awful CHARGER.", &rare_words)
        );
    }
}
