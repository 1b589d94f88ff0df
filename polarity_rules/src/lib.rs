//! Rule base text filters for Polarity.
//!
//! ## Examples
//!
//! ```
//! use polarity::Corpus;
//! use polarity_rules::TextNormalizer;
//!
//! let corpus = Corpus::from_texts([
//!     "The 2 batteries were GREAT!!",
//!     "Great batteries, terrible charger.",
//! ]);
//! let normalizer = TextNormalizer::new().rare_word_limit(2);
//! let (normalized, rare_words) = normalizer.normalize_corpus(&corpus);
//!
//! assert_eq!(Some("battery great"), normalized.documents()[0].normalized_text());
//! assert_eq!(Some("great battery"), normalized.documents()[1].normalized_text());
//! assert!(rare_words.contains("terrible"));
//! assert!(rare_words.contains("charger"));
//! ```

mod normalizer;
pub mod string_filters;

pub use normalizer::TextNormalizer;

/// Filter that maps a string to a new string.
pub trait StringFilter {
    /// Filters the specified string.
    ///
    /// # Arguments:
    ///
    /// * `string` - Input string.
    ///
    /// # Returns
    ///
    /// A processed string.
    fn filter(&self, string: &str) -> String;
}

/// Joins tokens of `string` that satisfy `keep` with single spaces.
pub(crate) fn retain_tokens<F>(string: &str, mut keep: F) -> String
where
    F: FnMut(&str) -> bool,
{
    let mut result = String::with_capacity(string.len());
    for token in polarity::tokens(string) {
        if keep(token) {
            if !result.is_empty() {
                result.push(' ');
            }
            result.push_str(token);
        }
    }
    result
}
