//! Filters for review text.

mod case_fold;
mod lemmatize;
mod rare_words;
mod stopwords;
mod strip;

pub use case_fold::LowercaseFilter;
pub use lemmatize::{EnglishLemmatizer, LemmatizeFilter, Lemmatizer};
pub use rare_words::RareWordsFilter;
pub use stopwords::{StopwordsFilter, ENGLISH_STOPWORDS};
pub use strip::{StripDigitsFilter, StripPunctuationFilter};
