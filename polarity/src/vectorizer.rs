//! Bag-of-words vectorization.

use core::fmt;
use core::str::FromStr;

use hashbrown::HashMap;
use tracing::debug;

use crate::errors::{PolarityError, Result};
use crate::utils::{self, Indexer};

/// Feature weighting scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Weighting {
    /// Raw term counts.
    Counts,

    /// Term frequencies scaled by inverse document frequencies.
    TfIdf,
}

impl FromStr for Weighting {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "counts" => Ok(Self::Counts),
            "tfidf" => Ok(Self::TfIdf),
            _ => Err("Could not parse a weighting scheme"),
        }
    }
}

impl fmt::Display for Weighting {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(match self {
            Self::Counts => "counts",
            Self::TfIdf => "tfidf",
        })
    }
}

/// Settings of the TF-IDF scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TfIdfConfig {
    /// Adds one to every document frequency, as if an extra document contained every term.
    pub smooth_idf: bool,

    /// Replaces a term frequency `tf` with `1 + ln(tf)`.
    pub sublinear_tf: bool,

    /// Scales every row to unit L2 norm.
    pub normalize: bool,
}

impl Default for TfIdfConfig {
    fn default() -> Self {
        Self {
            smooth_idf: true,
            sublinear_tf: false,
            normalize: true,
        }
    }
}

/// A sparse row of feature values, sorted by feature index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(u32, f64)>,
}

impl SparseVector {
    /// Creates a vector from `(index, value)` pairs.
    ///
    /// Entries are sorted by index and values of duplicated indices are added up.
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (u32, f64)>,
    {
        let mut entries: Vec<_> = entries.into_iter().collect();
        entries.sort_by_key(|&(i, _)| i);
        let mut merged: Vec<(u32, f64)> = Vec::with_capacity(entries.len());
        for (i, v) in entries {
            match merged.last_mut() {
                Some((j, w)) if *j == i => *w += v,
                _ => merged.push((i, v)),
            }
        }
        Self { entries: merged }
    }

    /// Gets the non-zero entries.
    pub fn entries(&self) -> &[(u32, f64)] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().map(|&(i, v)| (i as usize, v))
    }

    /// Gets the value at `index`, which is zero for absent entries.
    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |&(i, _)| i as usize)
            .map_or(0.0, |pos| self.entries[pos].1)
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Gets the largest stored index plus one.
    pub fn dim_hint(&self) -> usize {
        self.entries.last().map_or(0, |&(i, _)| i as usize + 1)
    }

    /// Computes the inner product with a dense vector.
    ///
    /// Entries beyond the dense vector are ignored.
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.iter()
            .filter_map(|(i, v)| dense.get(i).map(|w| w * v))
            .sum()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|&(_, v)| v * v).sum::<f64>().sqrt()
    }
}

/// A sparse matrix with one row per document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureMatrix {
    rows: Vec<SparseVector>,
    n_features: usize,
}

impl FeatureMatrix {
    /// Creates a matrix from rows.
    ///
    /// # Errors
    ///
    /// [`PolarityError::DimensionMismatch`] is returned if a row stores an index not less than
    /// `n_features`.
    pub fn new(n_features: usize, rows: Vec<SparseVector>) -> Result<Self> {
        if let Some(dim) = rows.iter().map(SparseVector::dim_hint).max() {
            if dim > n_features {
                return Err(PolarityError::dimension_mismatch(n_features, dim));
            }
        }
        Ok(Self { rows, n_features })
    }

    pub fn rows(&self) -> &[SparseVector] {
        &self.rows
    }

    pub fn row(&self, i: usize) -> Option<&SparseVector> {
        self.rows.get(i)
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Copies the rows at the given positions.
    ///
    /// # Panics
    ///
    /// Panics if a position is out of bounds.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
            n_features: self.n_features,
        }
    }
}

/// Terms learned from a training partition.
#[derive(Clone, Debug, PartialEq)]
pub struct Vocabulary {
    terms: Vec<String>,
    ids: HashMap<String, u32>,
    df: Vec<usize>,
    n_docs: usize,
    idf: Option<Vec<f64>>,
}

impl Vocabulary {
    fn new(terms: Vec<String>, df: Vec<usize>, n_docs: usize, idf: Option<Vec<f64>>) -> Self {
        let ids = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i as u32))
            .collect();
        Self {
            terms,
            ids,
            df,
            n_docs,
            idf,
        }
    }

    /// Gets the terms in feature-index order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Gets the feature index of a term.
    pub fn get(&self, term: &str) -> Option<usize> {
        self.ids.get(term).map(|&i| i as usize)
    }

    /// Gets the number of training documents containing each term.
    pub fn document_frequencies(&self) -> &[usize] {
        &self.df
    }

    /// Gets the number of training documents.
    pub fn n_docs(&self) -> usize {
        self.n_docs
    }

    /// Gets the inverse document frequencies, if the vocabulary was fitted for TF-IDF.
    pub fn idf(&self) -> Option<&[f64]> {
        self.idf.as_deref()
    }

    pub fn weighting(&self) -> Weighting {
        if self.idf.is_some() {
            Weighting::TfIdf
        } else {
            Weighting::Counts
        }
    }

    pub fn n_features(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Turns whitespace-tokenized texts into sparse feature rows.
///
/// # Examples
///
/// ```
/// use polarity::{Vectorizer, Weighting};
///
/// let mut vectorizer = Vectorizer::new(Weighting::TfIdf);
/// vectorizer.fit(["a b c", "b c d"]);
///
/// let features = vectorizer.transform(["a b c"]).unwrap();
/// let row = features.row(0).unwrap();
/// let vocab = vectorizer.vocabulary().unwrap();
/// assert_eq!(0.0, row.get(vocab.get("d").unwrap()));
/// assert!(row.get(vocab.get("a").unwrap()) > 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct Vectorizer {
    weighting: Weighting,
    tfidf: TfIdfConfig,
    vocabulary: Option<Vocabulary>,
}

impl Vectorizer {
    /// Creates an unfitted vectorizer.
    pub fn new(weighting: Weighting) -> Self {
        Self {
            weighting,
            tfidf: TfIdfConfig::default(),
            vocabulary: None,
        }
    }

    /// Sets the TF-IDF settings. They have no effect on the counts scheme.
    pub fn tfidf_config(mut self, config: TfIdfConfig) -> Self {
        self.tfidf = config;
        self
    }

    pub fn weighting(&self) -> Weighting {
        self.weighting
    }

    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.vocabulary.as_ref()
    }

    /// Installs a previously fitted vocabulary.
    ///
    /// # Errors
    ///
    /// [`PolarityError::InvalidArgument`] is returned if the vocabulary was fitted for the other
    /// weighting scheme.
    pub fn set_vocabulary(&mut self, vocabulary: Vocabulary) -> Result<()> {
        if vocabulary.weighting() != self.weighting {
            return Err(PolarityError::invalid_argument(
                "vocabulary",
                format!(
                    "fitted for {} weighting, but the vectorizer uses {}",
                    vocabulary.weighting(),
                    self.weighting
                ),
            ));
        }
        self.vocabulary = Some(vocabulary);
        Ok(())
    }

    /// Learns the vocabulary, and document frequencies when needed, from training texts.
    ///
    /// Any previous vocabulary is replaced. Terms are indexed in lexicographic order.
    pub fn fit<I, S>(&mut self, texts: I) -> &Vocabulary
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut indexer = Indexer::<String>::new();
        let mut df = vec![];
        let mut n_docs = 0usize;
        let mut seen = vec![];
        for text in texts {
            n_docs += 1;
            seen.clear();
            for token in utils::tokens(text.as_ref()) {
                let id = indexer.get_id(token);
                if id == df.len() {
                    df.push(0usize);
                }
                seen.push(id);
            }
            seen.sort_unstable();
            seen.dedup();
            for &id in &seen {
                df[id] += 1;
            }
        }

        let mut order: Vec<usize> = (0..indexer.len()).collect();
        let keys = indexer.into_keys();
        order.sort_unstable_by(|&a, &b| keys[a].cmp(&keys[b]));
        let terms: Vec<String> = order.iter().map(|&i| keys[i].clone()).collect();
        let term_df: Vec<usize> = order.iter().map(|&i| df[i]).collect();

        let idf = match self.weighting {
            Weighting::Counts => None,
            Weighting::TfIdf => {
                let smooth = if self.tfidf.smooth_idf { 1.0 } else { 0.0 };
                let n = n_docs as f64 + smooth;
                Some(
                    term_df
                        .iter()
                        .map(|&d| (n / (d as f64 + smooth)).ln() + 1.0)
                        .collect(),
                )
            }
        };
        debug!(
            n_docs,
            n_features = terms.len(),
            weighting = %self.weighting,
            "fitted vocabulary"
        );
        self.vocabulary
            .insert(Vocabulary::new(terms, term_df, n_docs, idf))
    }

    /// Vectorizes one text. Tokens outside the vocabulary are ignored.
    ///
    /// # Errors
    ///
    /// [`PolarityError::VocabularyNotFitted`] is returned if the vectorizer has not been fitted.
    pub fn transform_one(&self, text: &str) -> Result<SparseVector> {
        let vocab = self
            .vocabulary
            .as_ref()
            .ok_or_else(PolarityError::vocabulary_not_fitted)?;

        let mut ids: Vec<u32> = utils::tokens(text)
            .filter_map(|token| vocab.ids.get(token).copied())
            .collect();
        ids.sort_unstable();
        let mut entries: Vec<(u32, f64)> = Vec::with_capacity(ids.len());
        for id in ids {
            match entries.last_mut() {
                Some((j, tf)) if *j == id => *tf += 1.0,
                _ => entries.push((id, 1.0)),
            }
        }

        if let Some(idf) = vocab.idf.as_ref() {
            for (id, v) in &mut entries {
                if self.tfidf.sublinear_tf {
                    *v = 1.0 + v.ln();
                }
                *v *= idf[*id as usize];
            }
            if self.tfidf.normalize {
                let norm = entries.iter().map(|&(_, v)| v * v).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for (_, v) in &mut entries {
                        *v /= norm;
                    }
                }
            }
        }
        Ok(SparseVector { entries })
    }

    /// Vectorizes texts into a matrix with one row per text.
    ///
    /// # Errors
    ///
    /// [`PolarityError::VocabularyNotFitted`] is returned if the vectorizer has not been fitted.
    pub fn transform<I, S>(&self, texts: I) -> Result<FeatureMatrix>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let n_features = self
            .vocabulary
            .as_ref()
            .ok_or_else(PolarityError::vocabulary_not_fitted)?
            .n_features();
        let rows = texts
            .into_iter()
            .map(|text| self.transform_one(text.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(FeatureMatrix { rows, n_features })
    }
}
