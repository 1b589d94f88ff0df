use hashbrown::HashSet;
use polarity::TermFrequencies;

use crate::StringFilter;

/// Drops tokens of a fixed rare-word set.
#[derive(Clone, Debug, Default)]
pub struct RareWordsFilter {
    rare_words: HashSet<String>,
}

impl RareWordsFilter {
    /// Creates a filter with the given words.
    pub fn new<I, S>(rare_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rare_words: rare_words.into_iter().map(Into::into).collect(),
        }
    }

    /// Takes the `limit` least frequent tokens of a corpus.
    ///
    /// `limit` is clamped to the number of distinct tokens, so a corpus with fewer distinct
    /// tokens than `limit` yields a filter dropping every token.
    ///
    /// # Arguments
    ///
    /// * `frequencies` - Corpus-wide token counts.
    /// * `limit` - The number of tokens to take from the tail of the ranking.
    ///
    /// # Returns
    ///
    /// A new filter.
    pub fn from_frequencies(frequencies: &TermFrequencies, limit: usize) -> Self {
        Self::new(frequencies.least_frequent(limit))
    }

    pub fn contains(&self, token: &str) -> bool {
        self.rare_words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.rare_words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rare_words.is_empty()
    }
}

impl StringFilter for RareWordsFilter {
    fn filter(&self, string: &str) -> String {
        crate::retain_tokens(string, |token| !self.rare_words.contains(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_least_frequent_tail() {
        let freqs = TermFrequencies::from_texts(["a b a c", "b a d"]);
        let filter = RareWordsFilter::from_frequencies(&freqs, 2);
        assert_eq!(2, filter.len());
        assert!(filter.contains("c"));
        assert!(filter.contains("d"));
        assert_eq!("a b a", filter.filter("a b a c"));
    }

    #[test]
    fn test_limit_clamped() {
        let freqs = TermFrequencies::from_texts(["good product", "good price"]);
        let filter = RareWordsFilter::from_frequencies(&freqs, 1000);
        assert_eq!(3, filter.len());
        assert_eq!("", filter.filter("good product"));
    }

    #[test]
    fn test_zero_limit() {
        let freqs = TermFrequencies::from_texts(["good product"]);
        let filter = RareWordsFilter::from_frequencies(&freqs, 0);
        assert!(filter.is_empty());
        assert_eq!("good product", filter.filter("good  product"));
    }
}
