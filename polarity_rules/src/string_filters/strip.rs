use std::sync::LazyLock;

use regex::Regex;

use crate::StringFilter;

static PUNCTUATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]|\p{Pc}").unwrap());
static DIGIT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").unwrap());

/// Removes every character that is neither a word character nor whitespace, and connector
/// punctuation such as underscores.
#[derive(Clone, Copy, Default)]
pub struct StripPunctuationFilter;

impl StringFilter for StripPunctuationFilter {
    fn filter(&self, string: &str) -> String {
        PUNCTUATION_REGEX.replace_all(string, "").into_owned()
    }
}

/// Removes Unicode decimal digits.
#[derive(Clone, Copy, Default)]
pub struct StripDigitsFilter;

impl StringFilter for StripDigitsFilter {
    fn filter(&self, string: &str) -> String {
        DIGIT_REGEX.replace_all(string, "").into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_punctuation() {
        let filter = StripPunctuationFilter;
        assert_eq!("its great  really", filter.filter("it's great -- really!?"));
        assert_eq!("snakecase", filter.filter("snake_case"));
        assert_eq!("café 5", filter.filter("café: 5."));
        assert_eq!("greatproduct", filter.filter("great\u{FF3F}product"));
        assert_eq!("nicefit", filter.filter("nice\u{203F}fit"));
        assert_eq!("okgood", filter.filter("ok\u{2040}good"));
    }

    #[test]
    fn test_strip_digits() {
        let filter = StripDigitsFilter;
        assert_eq!("gb card", filter.filter("64gb card"));
        assert_eq!("", filter.filter("٣2"));
    }
}
