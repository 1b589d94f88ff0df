//! Sentiment lexicon.

use std::io::Read;

use hashbrown::HashMap;

use crate::errors::{PolarityError, Result};

/// Word valences on the `[-4, 4]` scale.
///
/// Lemmatized forms are listed alongside the inflected ones because the labeler usually sees
/// normalized text.
const DEFAULT_VALENCES: &[(&str, f64)] = &[
    ("abandon", -1.9),
    ("abuse", -3.2),
    ("accept", 1.6),
    ("adorable", 2.2),
    ("advantage", 1.0),
    ("afraid", -2.2),
    ("agree", 1.5),
    ("alarm", -1.4),
    ("amaze", 2.5),
    ("amazed", 2.2),
    ("amazing", 2.8),
    ("angry", -2.3),
    ("annoy", -1.9),
    ("annoyed", -1.6),
    ("annoying", -1.7),
    ("appreciate", 1.7),
    ("approve", 1.9),
    ("ashamed", -2.1),
    ("attractive", 1.9),
    ("awesome", 3.1),
    ("awful", -2.0),
    ("awkward", -0.6),
    ("bad", -2.5),
    ("badly", -2.1),
    ("beautiful", 2.9),
    ("benefit", 2.0),
    ("best", 3.2),
    ("better", 1.9),
    ("bitter", -1.8),
    ("bland", -1.1),
    ("bless", 1.8),
    ("bonus", 2.5),
    ("bore", -1.0),
    ("bored", -1.1),
    ("boring", -1.3),
    ("brilliant", 2.8),
    ("broke", -1.8),
    ("broken", -2.1),
    ("bug", -0.8),
    ("burden", -1.9),
    ("care", 2.2),
    ("careful", 0.6),
    ("careless", -1.5),
    ("charm", 1.7),
    ("charming", 2.8),
    ("cheap", -0.6),
    ("cheat", -2.0),
    ("clean", 1.7),
    ("clever", 2.0),
    ("comfort", 1.5),
    ("comfortable", 2.3),
    ("complain", -1.5),
    ("complaint", -1.2),
    ("confused", -1.3),
    ("confusing", -0.9),
    ("cool", 1.3),
    ("crap", -1.6),
    ("crappy", -2.5),
    ("crash", -1.7),
    ("cry", -2.1),
    ("cute", 2.0),
    ("damage", -2.2),
    ("damaged", -1.9),
    ("danger", -2.4),
    ("dead", -3.3),
    ("defect", -1.4),
    ("defective", -1.9),
    ("delay", -1.3),
    ("delight", 2.9),
    ("delighted", 2.3),
    ("delightful", 2.8),
    ("dirty", -1.9),
    ("disappoint", -2.3),
    ("disappointed", -1.9),
    ("disappointing", -2.2),
    ("disappointment", -2.3),
    ("disaster", -3.1),
    ("dislike", -1.6),
    ("dull", -1.7),
    ("durable", 1.1),
    ("easy", 1.9),
    ("effective", 2.1),
    ("efficient", 1.8),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("error", -1.7),
    ("excellent", 2.7),
    ("excited", 1.4),
    ("exciting", 2.2),
    ("expensive", -0.9),
    ("fabulous", 2.4),
    ("fail", -2.5),
    ("failed", -2.3),
    ("failure", -2.3),
    ("fake", -2.1),
    ("fantastic", 2.6),
    ("fault", -1.7),
    ("faulty", -1.7),
    ("favorite", 2.0),
    ("fine", 0.8),
    ("flaw", -1.4),
    ("flawless", 2.3),
    ("fortunate", 1.9),
    ("free", 2.3),
    ("frustrated", -2.4),
    ("frustrating", -1.9),
    ("frustration", -2.1),
    ("fun", 2.3),
    ("funny", 1.9),
    ("garbage", -1.5),
    ("generous", 2.3),
    ("gift", 1.9),
    ("glad", 2.0),
    ("good", 1.9),
    ("gorgeous", 3.0),
    ("great", 3.1),
    ("greatest", 3.2),
    ("happy", 2.7),
    ("hard", -0.4),
    ("harm", -2.5),
    ("hate", -2.7),
    ("hated", -3.2),
    ("helpful", 1.8),
    ("hope", 1.9),
    ("horrible", -2.5),
    ("hurt", -2.4),
    ("ideal", 2.4),
    ("impress", 1.9),
    ("impressed", 2.1),
    ("impressive", 2.3),
    ("improve", 1.9),
    ("improvement", 2.0),
    ("inferior", -1.7),
    ("interesting", 1.7),
    ("issue", -0.6),
    ("joy", 2.8),
    ("junk", -1.4),
    ("kind", 2.4),
    ("lack", -1.3),
    ("lame", -1.8),
    ("leak", -1.4),
    ("like", 2.0),
    ("liked", 1.8),
    ("lose", -1.7),
    ("loss", -1.3),
    ("lost", -1.3),
    ("love", 3.2),
    ("loved", 2.9),
    ("lovely", 2.8),
    ("loving", 2.9),
    ("luck", 2.0),
    ("lucky", 1.8),
    ("mess", -1.5),
    ("miss", -0.6),
    ("mistake", -1.4),
    ("nasty", -2.6),
    ("neat", 2.0),
    ("nice", 1.8),
    ("no", -1.2),
    ("noisy", -0.7),
    ("ok", 1.2),
    ("okay", 0.9),
    ("outstanding", 3.0),
    ("pain", -2.3),
    ("pathetic", -2.7),
    ("perfect", 2.7),
    ("perfectly", 3.2),
    ("pleasant", 2.3),
    ("please", 1.3),
    ("pleased", 1.9),
    ("poor", -2.1),
    ("poorly", -1.8),
    ("positive", 2.6),
    ("pretty", 2.2),
    ("problem", -1.7),
    ("quality", 0.8),
    ("recommend", 1.5),
    ("recommended", 0.8),
    ("refund", -0.4),
    ("regret", -1.9),
    ("reliable", 1.5),
    ("return", 0.0),
    ("ridiculous", -1.5),
    ("rubbish", -2.1),
    ("rude", -2.0),
    ("sad", -2.1),
    ("safe", 1.9),
    ("satisfied", 1.8),
    ("satisfy", 2.0),
    ("satisfying", 2.0),
    ("scam", -2.7),
    ("scratch", -0.8),
    ("shame", -2.0),
    ("sick", -2.3),
    ("simple", 0.8),
    ("slow", -0.9),
    ("smart", 1.7),
    ("smooth", 1.6),
    ("solid", 1.2),
    ("sorry", -0.3),
    ("special", 1.7),
    ("stable", 1.2),
    ("strong", 2.3),
    ("stuck", -1.0),
    ("stupid", -2.4),
    ("success", 2.7),
    ("suck", -1.5),
    ("sucks", -1.5),
    ("super", 2.9),
    ("superb", 3.1),
    ("support", 1.7),
    ("sweet", 2.0),
    ("terrible", -2.1),
    ("terrific", 2.1),
    ("thank", 1.5),
    ("thanks", 1.9),
    ("tired", -1.9),
    ("trouble", -1.7),
    ("trust", 2.3),
    ("ugly", -2.3),
    ("unable", -1.2),
    ("unhappy", -1.8),
    ("useful", 1.9),
    ("useless", -1.8),
    ("value", 1.4),
    ("waste", -1.8),
    ("wasted", -2.2),
    ("weak", -1.9),
    ("win", 2.8),
    ("wonderful", 2.7),
    ("worried", -1.2),
    ("worse", -2.1),
    ("worst", -3.1),
    ("worth", 0.9),
    ("worthless", -1.9),
    ("wow", 2.8),
    ("wrong", -2.1),
    ("yes", 1.7),
];

/// A mapping from lowercase tokens to sentiment valences.
#[derive(Debug, Clone)]
pub struct Lexicon {
    valences: HashMap<String, f64>,
}

impl Lexicon {
    /// Creates a lexicon from `(token, valence)` pairs. Tokens are lowercased.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        Self {
            valences: entries
                .into_iter()
                .map(|(token, valence)| (token.as_ref().to_lowercase(), valence))
                .collect(),
        }
    }

    /// Creates the built-in English lexicon.
    pub fn english() -> Self {
        Self::new(DEFAULT_VALENCES.iter().copied())
    }

    /// Reads a tab-separated lexicon.
    ///
    /// Each line holds a token and its mean valence. Any further columns (standard deviation,
    /// raw ratings) are ignored.
    ///
    /// # Arguments
    ///
    /// * `rdr` - A data source.
    ///
    /// # Errors
    ///
    /// When `rdr` generates an error, it will be returned as is. A line without a parsable
    /// valence produces [`PolarityError::InvalidArgument`].
    pub fn read<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(rdr);
        let mut valences = HashMap::new();
        for (i, record) in rdr.records().enumerate() {
            let record = record?;
            let token = match record.get(0) {
                Some(token) if !token.is_empty() => token,
                _ => continue,
            };
            let valence = record
                .get(1)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .ok_or_else(|| {
                    PolarityError::invalid_argument(
                        "lexicon",
                        format!("line {}: missing or invalid valence for {:?}", i + 1, token),
                    )
                })?;
            valences.insert(token.to_lowercase(), valence);
        }
        Ok(Self { valences })
    }

    /// Gets the valence of a lowercase token.
    pub fn valence(&self, token: &str) -> Option<f64> {
        self.valences.get(token).copied()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.valences.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_lexicon() {
        let lexicon = Lexicon::english();
        assert_eq!(Some(3.1), lexicon.valence("great"));
        assert_eq!(Some(-2.1), lexicon.valence("terrible"));
        assert_eq!(None, lexicon.valence("product"));
        assert_eq!(DEFAULT_VALENCES.len(), lexicon.len());
    }

    #[test]
    fn test_read_lexicon() {
        let data = "$:\t-1.5\t0.80623\t[-1, -1, -1, -1, -3, -1, -3, -1, -2, -1]\n\
                    Good\t1.9\t0.9434\t[2, 1, 1, 3, 2, 4, 2, 2, 1, 1]\n\
                    :\"(\t-2.0\t1.0\t[-2]\n";
        let lexicon = Lexicon::read(data.as_bytes()).unwrap();
        assert_eq!(3, lexicon.len());
        assert_eq!(Some(1.9), lexicon.valence("good"));
        assert_eq!(Some(-1.5), lexicon.valence("$:"));
        assert_eq!(Some(-2.0), lexicon.valence(":\"("));
    }

    #[test]
    fn test_read_lexicon_invalid_valence() {
        let result = Lexicon::read("good\tvery\n".as_bytes());
        assert!(result.is_err());
        assert_eq!(
            "InvalidArgumentError: lexicon: line 1: missing or invalid valence for \"good\"",
            result.err().unwrap().to_string()
        );
    }
}
