use std::borrow::Cow;

use hashbrown::{HashMap, HashSet};

use crate::StringFilter;

/// Maps a token to its base form.
pub trait Lemmatizer {
    /// Gets the base form of a lowercase token. Unknown tokens are returned as is.
    fn lemmatize<'a>(&self, token: &'a str) -> Cow<'a, str>;
}

const IRREGULAR_NOUNS: &[(&str, &str)] = &[
    ("analyses", "analysis"),
    ("calves", "calf"),
    ("children", "child"),
    ("crises", "crisis"),
    ("dice", "die"),
    ("feet", "foot"),
    ("geese", "goose"),
    ("halves", "half"),
    ("heroes", "hero"),
    ("indices", "index"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("lives", "life"),
    ("loaves", "loaf"),
    ("men", "man"),
    ("mice", "mouse"),
    ("oxen", "ox"),
    ("potatoes", "potato"),
    ("scarves", "scarf"),
    ("selves", "self"),
    ("shelves", "shelf"),
    ("teeth", "tooth"),
    ("thieves", "thief"),
    ("tomatoes", "tomato"),
    ("wives", "wife"),
    ("wolves", "wolf"),
    ("women", "woman"),
];

// Suffix replacements for regular plurals.
const NOUN_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

const ENGLISH_NOUNS: &str = include_str!("../../data/english_nouns.txt");

/// Rule-based English noun lemmatizer.
///
/// Irregular plurals are looked up. Otherwise plural suffixes are replaced, and a candidate is
/// accepted only if it is a known lemma. Known lemmas and tokens without a known lemma are
/// returned unchanged, so lemmatizing a lemma returns it unchanged.
#[derive(Clone)]
pub struct EnglishLemmatizer {
    irregular: HashMap<&'static str, &'static str>,
    lemmas: HashSet<String>,
}

impl EnglishLemmatizer {
    /// Creates a lemmatizer with the built-in noun list.
    pub fn new() -> Self {
        let mut lemmas: HashSet<String> = ENGLISH_NOUNS
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        lemmas.extend(IRREGULAR_NOUNS.iter().map(|&(_, lemma)| lemma.to_string()));
        Self {
            irregular: IRREGULAR_NOUNS.iter().copied().collect(),
            lemmas,
        }
    }

    /// Adds known lemmas.
    pub fn with_lemmas<I, S>(mut self, lemmas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lemmas.extend(lemmas.into_iter().map(Into::into));
        self
    }

    /// Returns `true` if the token is a known lemma.
    pub fn is_lemma(&self, token: &str) -> bool {
        self.lemmas.contains(token)
    }
}

impl Default for EnglishLemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lemmatizer for EnglishLemmatizer {
    fn lemmatize<'a>(&self, token: &'a str) -> Cow<'a, str> {
        if let Some(&lemma) = self.irregular.get(token) {
            return Cow::Borrowed(lemma);
        }
        if self.is_lemma(token) {
            return Cow::Borrowed(token);
        }
        NOUN_RULES
            .iter()
            .filter_map(|&(suffix, replacement)| {
                token
                    .strip_suffix(suffix)
                    .map(|stem| format!("{}{}", stem, replacement))
            })
            .filter(|candidate| self.is_lemma(candidate))
            .min_by_key(String::len)
            .map_or(Cow::Borrowed(token), Cow::Owned)
    }
}

/// Replaces every token with its lemma.
#[derive(Clone, Default)]
pub struct LemmatizeFilter<L> {
    lemmatizer: L,
}

impl<L> LemmatizeFilter<L>
where
    L: Lemmatizer,
{
    pub const fn new(lemmatizer: L) -> Self {
        Self { lemmatizer }
    }
}

impl<L> StringFilter for LemmatizeFilter<L>
where
    L: Lemmatizer,
{
    fn filter(&self, string: &str) -> String {
        let mut result = String::with_capacity(string.len());
        for token in polarity::tokens(string) {
            if !result.is_empty() {
                result.push(' ');
            }
            result.push_str(&self.lemmatizer.lemmatize(token));
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_plurals() {
        let lemmatizer = EnglishLemmatizer::new();
        assert_eq!("battery", lemmatizer.lemmatize("batteries"));
        assert_eq!("box", lemmatizer.lemmatize("boxes"));
        assert_eq!("dish", lemmatizer.lemmatize("dishes"));
        assert_eq!("glass", lemmatizer.lemmatize("glasses"));
        assert_eq!("product", lemmatizer.lemmatize("products"));
        assert_eq!("tie", lemmatizer.lemmatize("ties"));
    }

    #[test]
    fn test_irregular_and_invariant() {
        let lemmatizer = EnglishLemmatizer::new();
        assert_eq!("child", lemmatizer.lemmatize("children"));
        assert_eq!("knife", lemmatizer.lemmatize("knives"));
        assert_eq!("glass", lemmatizer.lemmatize("glass"));
        assert_eq!("status", lemmatizer.lemmatize("status"));
        assert_eq!("analysis", lemmatizer.lemmatize("analysis"));
        assert_eq!("news", lemmatizer.lemmatize("news"));
        assert_eq!("gas", lemmatizer.lemmatize("gas"));
        assert_eq!("great", lemmatizer.lemmatize("great"));
        assert_eq!("loaf", lemmatizer.lemmatize("loaves"));
    }

    #[test]
    fn test_unknown_lemma_passes_through() {
        let lemmatizer = EnglishLemmatizer::new();
        assert_eq!("bias", lemmatizer.lemmatize("bias"));
        assert_eq!("christmas", lemmatizer.lemmatize("christmas"));
        assert_eq!("canvas", lemmatizer.lemmatize("canvas"));
        assert_eq!("atlas", lemmatizer.lemmatize("atlas"));
        assert_eq!("thermos", lemmatizer.lemmatize("thermos"));
        assert_eq!("xyzzys", lemmatizer.lemmatize("xyzzys"));
        assert_eq!("loved", lemmatizer.lemmatize("loved"));
    }

    #[test]
    fn test_with_lemmas() {
        let lemmatizer = EnglishLemmatizer::new();
        assert_eq!("gizmos", lemmatizer.lemmatize("gizmos"));
        let lemmatizer = lemmatizer.with_lemmas(["gizmo"]);
        assert_eq!("gizmo", lemmatizer.lemmatize("gizmos"));
        assert!(lemmatizer.is_lemma("gizmo"));
    }

    #[test]
    fn test_idempotent() {
        let lemmatizer = EnglishLemmatizer::new();
        for token in [
            "batteries", "boxes", "classes", "leaves", "men", "works", "series", "cases", "bias",
            "buses", "xyzzys",
        ] {
            let once = lemmatizer.lemmatize(token).into_owned();
            assert_eq!(once, lemmatizer.lemmatize(&once), "{}", token);
        }
    }

    #[test]
    fn test_filter() {
        let filter = LemmatizeFilter::new(EnglishLemmatizer::new());
        assert_eq!("great battery charger", filter.filter("great batteries chargers"));
        assert_eq!("", filter.filter(""));
    }
}
