use hashbrown::HashSet;

use crate::StringFilter;

/// English stopwords of the NLTK corpus.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

/// Drops stopword tokens and joins the rest with single spaces.
#[derive(Clone)]
pub struct StopwordsFilter {
    stopwords: HashSet<String>,
}

impl StopwordsFilter {
    /// Creates a filter with a custom stopword list.
    pub fn new<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stopwords: stopwords.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a filter with [`ENGLISH_STOPWORDS`].
    pub fn english() -> Self {
        Self::new(ENGLISH_STOPWORDS.iter().copied())
    }

    pub fn contains(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }
}

impl Default for StopwordsFilter {
    fn default() -> Self {
        Self::english()
    }
}

impl StringFilter for StopwordsFilter {
    fn filter(&self, string: &str) -> String {
        crate::retain_tokens(string, |token| !self.stopwords.contains(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_list() {
        let filter = StopwordsFilter::english();
        assert_eq!(179, filter.len());
        assert!(filter.contains("not"));
        assert!(!filter.contains("good"));
    }

    #[test]
    fn test_remove_stopwords() {
        let filter = StopwordsFilter::english();
        assert_eq!(
            "product works well",
            filter.filter("this product  works very well")
        );
        assert_eq!("", filter.filter("it was the"));
    }

    #[test]
    fn test_idempotent() {
        let filter = StopwordsFilter::english();
        let once = filter.filter("i loved it and it was not bad at all");
        assert_eq!(once, filter.filter(&once));
    }
}
