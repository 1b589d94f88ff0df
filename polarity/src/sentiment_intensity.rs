//! Valence-aware polarity scoring.

use hashbrown::HashMap;

use crate::lexicon::Lexicon;

// Empirically derived increments of the valence-aware scoring rules.
const B_INCR: f64 = 0.293;
const B_DECR: f64 = -0.293;
const C_INCR: f64 = 0.733;
const N_SCALAR: f64 = -0.74;

const NORMALIZATION_ALPHA: f64 = 15.0;

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "ain't", "aren't",
    "can't", "couldn't", "daren't", "didn't", "doesn't", "dont", "hadnt", "hasnt", "havent",
    "isnt", "mightnt", "mustnt", "neither", "don't", "hadn't", "hasn't", "haven't", "isn't",
    "mightn't", "mustn't", "neednt", "needn't", "never", "none", "nope", "nor", "not", "nothing",
    "nowhere", "oughtnt", "shant", "shouldnt", "uhuh", "wasnt", "werent", "oughtn't", "shan't",
    "shouldn't", "uh-uh", "wasn't", "weren't", "without", "wont", "wouldnt", "won't", "wouldn't",
    "rarely", "seldom", "despite",
];

const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", B_INCR),
    ("amazingly", B_INCR),
    ("awfully", B_INCR),
    ("completely", B_INCR),
    ("considerable", B_INCR),
    ("considerably", B_INCR),
    ("decidedly", B_INCR),
    ("deeply", B_INCR),
    ("enormous", B_INCR),
    ("enormously", B_INCR),
    ("entirely", B_INCR),
    ("especially", B_INCR),
    ("exceptional", B_INCR),
    ("exceptionally", B_INCR),
    ("extreme", B_INCR),
    ("extremely", B_INCR),
    ("fabulously", B_INCR),
    ("fully", B_INCR),
    ("greatly", B_INCR),
    ("hella", B_INCR),
    ("highly", B_INCR),
    ("hugely", B_INCR),
    ("incredible", B_INCR),
    ("incredibly", B_INCR),
    ("intensely", B_INCR),
    ("major", B_INCR),
    ("majorly", B_INCR),
    ("more", B_INCR),
    ("most", B_INCR),
    ("particularly", B_INCR),
    ("purely", B_INCR),
    ("quite", B_INCR),
    ("really", B_INCR),
    ("remarkably", B_INCR),
    ("so", B_INCR),
    ("substantially", B_INCR),
    ("thoroughly", B_INCR),
    ("total", B_INCR),
    ("totally", B_INCR),
    ("tremendous", B_INCR),
    ("tremendously", B_INCR),
    ("uber", B_INCR),
    ("unbelievably", B_INCR),
    ("unusually", B_INCR),
    ("utter", B_INCR),
    ("utterly", B_INCR),
    ("very", B_INCR),
    ("almost", B_DECR),
    ("barely", B_DECR),
    ("hardly", B_DECR),
    ("kinda", B_DECR),
    ("kindof", B_DECR),
    ("kind-of", B_DECR),
    ("less", B_DECR),
    ("little", B_DECR),
    ("marginal", B_DECR),
    ("marginally", B_DECR),
    ("occasional", B_DECR),
    ("occasionally", B_DECR),
    ("partly", B_DECR),
    ("scarce", B_DECR),
    ("scarcely", B_DECR),
    ("slight", B_DECR),
    ("slightly", B_DECR),
    ("somewhat", B_DECR),
    ("sorta", B_DECR),
    ("sortof", B_DECR),
    ("sort-of", B_DECR),
];

/// Computes a compound polarity score of a text.
pub trait PolarityScorer {
    /// Scores a text.
    ///
    /// # Returns
    ///
    /// A score in `[-1, 1]`. Texts without any sentiment-bearing word score `0`.
    fn polarity(&self, text: &str) -> f64;
}

impl<F> PolarityScorer for F
where
    F: Fn(&str) -> f64,
{
    fn polarity(&self, text: &str) -> f64 {
        self(text)
    }
}

/// Lexicon and rule based sentiment intensity analyzer.
///
/// Each lexicon word contributes its valence, adjusted by preceding intensifiers, negations,
/// all-caps emphasis and the contrastive conjunction "but". The sum is amplified by exclamation
/// and question marks and squashed into `[-1, 1]`.
///
/// # Examples
///
/// ```
/// use polarity::{PolarityScorer, SentimentIntensityAnalyzer};
///
/// let analyzer = SentimentIntensityAnalyzer::new();
/// assert!(analyzer.polarity("great product loved it") > 0.0);
/// assert!(analyzer.polarity("terrible waste of money") < 0.0);
/// assert_eq!(0.0, analyzer.polarity("product arrived tuesday"));
/// ```
#[derive(Debug, Clone)]
pub struct SentimentIntensityAnalyzer {
    lexicon: Lexicon,
    boosters: HashMap<&'static str, f64>,
}

impl SentimentIntensityAnalyzer {
    /// Creates an analyzer with the built-in English lexicon.
    pub fn new() -> Self {
        Self::with_lexicon(Lexicon::english())
    }

    /// Creates an analyzer with the given lexicon.
    pub fn with_lexicon(lexicon: Lexicon) -> Self {
        Self {
            lexicon,
            boosters: BOOSTERS.iter().copied().collect(),
        }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    fn scalar_inc_dec(&self, word: &str, valence: f64, is_cap_diff: bool) -> f64 {
        let mut scalar = match self.boosters.get(word.to_lowercase().as_str()) {
            Some(&scalar) => scalar,
            None => return 0.0,
        };
        if valence < 0.0 {
            scalar = -scalar;
        }
        if is_upper(word) && is_cap_diff {
            if valence > 0.0 {
                scalar += C_INCR;
            } else {
                scalar -= C_INCR;
            }
        }
        scalar
    }

    fn sentiment_valence(
        &self,
        words: &[String],
        lower: &[String],
        i: usize,
        cap_diff: bool,
    ) -> f64 {
        let item = &lower[i];
        let base = match self.lexicon.valence(item) {
            Some(base) => base,
            None => return 0.0,
        };
        let mut valence = base;

        // "no" directly before another lexicon word acts as a negation, not as a sentiment word.
        if item == "no" && i + 1 < lower.len() && self.lexicon.contains(&lower[i + 1]) {
            valence = 0.0;
        }
        if (i > 0 && lower[i - 1] == "no")
            || (i > 1 && lower[i - 2] == "no")
            || (i > 2 && lower[i - 3] == "no" && matches!(lower[i - 1].as_str(), "or" | "nor"))
        {
            valence = base * N_SCALAR;
        }

        if is_upper(&words[i]) && cap_diff {
            if valence > 0.0 {
                valence += C_INCR;
            } else {
                valence -= C_INCR;
            }
        }

        for start_i in 0..3 {
            if i > start_i && !self.lexicon.contains(&lower[i - (start_i + 1)]) {
                let mut s = self.scalar_inc_dec(&words[i - (start_i + 1)], valence, cap_diff);
                if start_i == 1 && s != 0.0 {
                    s *= 0.95;
                }
                if start_i == 2 && s != 0.0 {
                    s *= 0.9;
                }
                valence += s;
                valence = negation_check(valence, lower, start_i, i);
            }
        }

        least_check(valence, lower, i, |w| self.lexicon.contains(w))
    }
}

impl Default for SentimentIntensityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityScorer for SentimentIntensityAnalyzer {
    fn polarity(&self, text: &str) -> f64 {
        let words: Vec<String> = text.split_whitespace().map(strip_punctuation).collect();
        if words.is_empty() {
            return 0.0;
        }
        let lower: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
        let cap_diff = allcap_differential(&words);

        let mut sentiments = Vec::with_capacity(words.len());
        for i in 0..words.len() {
            let item = lower[i].as_str();
            if self.boosters.contains_key(item)
                || (item == "kind" && lower.get(i + 1).map_or(false, |w| w == "of"))
            {
                sentiments.push(0.0);
                continue;
            }
            sentiments.push(self.sentiment_valence(&words, &lower, i, cap_diff));
        }

        but_check(&lower, &mut sentiments);

        let mut sum: f64 = sentiments.iter().sum();
        let amplifier = punctuation_emphasis(text);
        if sum > 0.0 {
            sum += amplifier;
        } else if sum < 0.0 {
            sum -= amplifier;
        }
        normalize(sum)
    }
}

fn is_upper(word: &str) -> bool {
    word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase)
}

fn strip_punctuation(token: &str) -> String {
    let stripped = token.trim_matches(|c: char| c.is_ascii_punctuation());
    // short tokens are kept intact to preserve emoticons such as ":)"
    if stripped.chars().count() <= 2 {
        token.to_string()
    } else {
        stripped.to_string()
    }
}

fn allcap_differential(words: &[String]) -> bool {
    let n_allcap = words.iter().filter(|w| is_upper(w)).count();
    n_allcap > 0 && n_allcap < words.len()
}

fn negated(word: &str) -> bool {
    NEGATIONS.contains(&word) || word.contains("n't")
}

fn negation_check(valence: f64, lower: &[String], start_i: usize, i: usize) -> f64 {
    match start_i {
        0 => {
            if negated(&lower[i - 1]) {
                return valence * N_SCALAR;
            }
        }
        1 => {
            if lower[i - 2] == "never" && matches!(lower[i - 1].as_str(), "so" | "this") {
                return valence * 1.25;
            } else if lower[i - 2] == "without" && lower[i - 1] == "doubt" {
                return valence;
            } else if negated(&lower[i - 2]) {
                return valence * N_SCALAR;
            }
        }
        _ => {
            if (lower[i - 3] == "never" && matches!(lower[i - 2].as_str(), "so" | "this"))
                || matches!(lower[i - 1].as_str(), "so" | "this")
            {
                return valence * 1.25;
            } else if lower[i - 3] == "without"
                && (lower[i - 2] == "doubt" || lower[i - 1] == "doubt")
            {
                return valence;
            } else if negated(&lower[i - 3]) {
                return valence * N_SCALAR;
            }
        }
    }
    valence
}

fn least_check<F>(valence: f64, lower: &[String], i: usize, in_lexicon: F) -> f64
where
    F: Fn(&str) -> bool,
{
    if i > 1 && !in_lexicon(&lower[i - 1]) && lower[i - 1] == "least" {
        if lower[i - 2] != "at" && lower[i - 2] != "very" {
            return valence * N_SCALAR;
        }
    } else if i > 0 && !in_lexicon(&lower[i - 1]) && lower[i - 1] == "least" {
        return valence * N_SCALAR;
    }
    valence
}

/// Halves the sentiment before "but" and boosts the sentiment after it by half.
fn but_check(lower: &[String], sentiments: &mut [f64]) {
    if let Some(bi) = lower.iter().position(|w| w == "but") {
        for (si, sentiment) in sentiments.iter_mut().enumerate() {
            if si < bi {
                *sentiment *= 0.5;
            } else if si > bi {
                *sentiment *= 1.5;
            }
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let ep_count = text.matches('!').count().min(4);
    let ep_amplifier = ep_count as f64 * 0.292;
    let qm_count = text.matches('?').count();
    let qm_amplifier = match qm_count {
        0 | 1 => 0.0,
        2..=3 => qm_count as f64 * 0.18,
        _ => 0.96,
    };
    ep_amplifier + qm_amplifier
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(expected: f64, actual: f64) {
        assert!(
            (expected - actual).abs() < 1e-4,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_single_word() {
        let analyzer = SentimentIntensityAnalyzer::new();
        // 3.1 / sqrt(3.1^2 + 15)
        assert_close(0.6249, analyzer.polarity("great"));
        assert_close(-0.4767, analyzer.polarity("terrible"));
    }

    #[test]
    fn test_no_sentiment_words() {
        let analyzer = SentimentIntensityAnalyzer::new();
        assert_eq!(0.0, analyzer.polarity(""));
        assert_eq!(0.0, analyzer.polarity("the box arrived"));
    }

    #[test]
    fn test_booster_increases_intensity() {
        let analyzer = SentimentIntensityAnalyzer::new();
        assert!(analyzer.polarity("very good") > analyzer.polarity("good"));
        assert!(analyzer.polarity("slightly good") < analyzer.polarity("good"));
        assert!(analyzer.polarity("very bad") < analyzer.polarity("bad"));
    }

    #[test]
    fn test_negation_flips_sign() {
        let analyzer = SentimentIntensityAnalyzer::new();
        assert!(analyzer.polarity("not good") < 0.0);
        assert!(analyzer.polarity("isn't good") < 0.0);
        assert!(analyzer.polarity("never really bad") > 0.0);
    }

    #[test]
    fn test_without_doubt_is_not_negation() {
        let analyzer = SentimentIntensityAnalyzer::new();
        assert!(analyzer.polarity("without doubt good") > 0.0);
        assert!(analyzer.polarity("without doubt it good") > 0.0);
        assert!(analyzer.polarity("without it good") < 0.0);
    }

    #[test]
    fn test_but_shifts_weight() {
        let analyzer = SentimentIntensityAnalyzer::new();
        assert!(analyzer.polarity("good but terrible") < 0.0);
        assert!(analyzer.polarity("terrible but great") > 0.0);
    }

    #[test]
    fn test_caps_and_punctuation_emphasis() {
        let analyzer = SentimentIntensityAnalyzer::new();
        assert!(analyzer.polarity("good!!!") > analyzer.polarity("good"));
        assert!(analyzer.polarity("it is GOOD") > analyzer.polarity("it is good"));
    }

    #[test]
    fn test_score_range() {
        let analyzer = SentimentIntensityAnalyzer::new();
        let text = "great great great great great great great great amazing love best!!!!";
        let score = analyzer.polarity(text);
        assert!(score <= 1.0 && score > 0.9);
    }

    #[test]
    fn test_closure_scorer() {
        let stub = |text: &str| if text.is_empty() { 0.0 } else { 0.5 };
        assert_eq!(0.5, stub.polarity("anything"));
    }
}
