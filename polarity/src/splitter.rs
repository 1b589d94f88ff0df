use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::document::{Corpus, Label};
use crate::errors::{PolarityError, Result};

/// Labeled texts taken from a corpus.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    indices: Vec<usize>,
    texts: Vec<String>,
    labels: Vec<Label>,
}

impl Partition {
    /// Gets the positions of the samples in the source corpus.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    fn push(&mut self, index: usize, text: &str, label: Label) {
        self.indices.push(index);
        self.texts.push(text.to_string());
        self.labels.push(label);
    }
}

/// Training and test partitions.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train: Partition,
    pub test: Partition,
}

impl Split {
    /// Concatenates the training and the test partitions.
    pub fn all(&self) -> Partition {
        let mut all = self.train.clone();
        all.indices.extend_from_slice(&self.test.indices);
        all.texts.extend_from_slice(&self.test.texts);
        all.labels.extend_from_slice(&self.test.labels);
        all
    }
}

/// Seeded train/test splitter.
///
/// # Examples
///
/// ```
/// use polarity::{Corpus, DatasetSplitter, Document, Label};
///
/// let corpus: Corpus = (0..8)
///     .map(|i| {
///         let label = if i % 2 == 0 { Label::Positive } else { Label::Negative };
///         Document::new(format!("review {}", i)).with_label(label)
///     })
///     .collect();
///
/// let split = DatasetSplitter::new().split(&corpus).unwrap();
/// assert_eq!(6, split.train.len());
/// assert_eq!(2, split.test.len());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DatasetSplitter {
    test_size: f64,
    seed: u64,
}

impl DatasetSplitter {
    /// Default fraction of samples put into the test partition.
    pub const DEFAULT_TEST_SIZE: f64 = 0.25;

    /// Default seed of the shuffle.
    pub const DEFAULT_SEED: u64 = 42;

    pub const fn new() -> Self {
        Self {
            test_size: Self::DEFAULT_TEST_SIZE,
            seed: Self::DEFAULT_SEED,
        }
    }

    /// Sets the fraction of samples put into the test partition.
    pub const fn test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    /// Sets the seed of the shuffle.
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Splits the labeled documents of a corpus.
    ///
    /// Documents without text or without label are dropped first. The remaining positions are
    /// shuffled; the first `ceil(test_size * n)` go to the test partition and the rest to the
    /// training partition, both in shuffled order.
    ///
    /// # Errors
    ///
    /// [`PolarityError::InsufficientData`] is returned if fewer than two distinct labels
    /// remain. [`PolarityError::InvalidArgument`] is returned if `test_size` is not in `(0, 1)`
    /// or one of the partitions would be empty.
    pub fn split(&self, corpus: &Corpus) -> Result<Split> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(PolarityError::invalid_argument(
                "test_size",
                format!("must be in (0, 1), got {}", self.test_size),
            ));
        }

        let samples: Vec<(usize, &str, Label)> = corpus
            .iter()
            .enumerate()
            .filter_map(|(i, doc)| Some((i, doc.text()?, doc.label()?)))
            .collect();

        let mut seen = [false; 2];
        for &(_, _, label) in &samples {
            seen[label as usize] = true;
        }
        let n_classes = seen.iter().filter(|&&s| s).count();
        if n_classes < 2 {
            return Err(PolarityError::insufficient_data(format!(
                "{} labeled documents with {} distinct label(s); at least 2 labels are required",
                samples.len(),
                n_classes,
            )));
        }

        let n = samples.len();
        let n_test = (self.test_size * n as f64).ceil() as usize;
        let n_train = n - n_test.min(n);
        if n_test == 0 || n_train == 0 {
            return Err(PolarityError::invalid_argument(
                "test_size",
                format!(
                    "{} gives {} training and {} test samples out of {}",
                    self.test_size, n_train, n_test, n
                ),
            ));
        }

        let mut order: Vec<usize> = (0..n).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        order.shuffle(&mut rng);

        let mut test = Partition::default();
        let mut train = Partition::default();
        for (k, &j) in order.iter().enumerate() {
            let (i, text, label) = samples[j];
            if k < n_test {
                test.push(i, text, label);
            } else {
                train.push(i, text, label);
            }
        }
        info!(
            n_dropped = corpus.len() - n,
            n_train = train.len(),
            n_test = test.len(),
            "split dataset"
        );
        Ok(Split { train, test })
    }
}

impl Default for DatasetSplitter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::document::Document;

    fn labeled(texts: &[(&str, Label)]) -> Corpus {
        texts
            .iter()
            .map(|&(text, label)| Document::new(text).with_label(label))
            .collect()
    }

    #[test]
    fn test_split_sizes() {
        let corpus: Corpus = (0..10)
            .map(|i| {
                Document::new(i.to_string()).with_label(if i < 5 {
                    Label::Positive
                } else {
                    Label::Negative
                })
            })
            .collect();
        let split = DatasetSplitter::new().split(&corpus).unwrap();
        assert_eq!(7, split.train.len());
        assert_eq!(3, split.test.len());

        let mut indices: Vec<_> = split.all().indices().to_vec();
        indices.sort_unstable();
        assert_eq!((0..10).collect::<Vec<_>>(), indices);
    }

    #[test]
    fn test_split_reproducible() {
        let corpus = labeled(&[
            ("great product loved it", Label::Positive),
            ("terrible waste of money", Label::Negative),
            ("okay experience nothing special", Label::Negative),
        ]);
        let splitter = DatasetSplitter::new().test_size(1.0 / 3.0).seed(42);
        let first = splitter.split(&corpus).unwrap();
        let second = splitter.split(&corpus).unwrap();
        assert_eq!(first, second);
        assert_eq!(2, first.train.len());
        assert_eq!(1, first.test.len());
        for (i, text) in first.train.indices().iter().zip(first.train.texts()) {
            assert_eq!(corpus.documents()[*i].text(), Some(text.as_str()));
        }
    }

    #[test]
    fn test_split_drops_unlabeled_and_missing() {
        let corpus = Corpus::new(vec![
            Document::new("a").with_label(Label::Positive),
            Document::new("b"),
            Document::missing().with_label(Label::Negative),
            Document::new("c").with_label(Label::Negative),
        ]);
        let split = DatasetSplitter::new().test_size(0.5).split(&corpus).unwrap();
        let mut indices = split.all().indices().to_vec();
        indices.sort_unstable();
        assert_eq!(vec![0, 3], indices);
    }

    #[test]
    fn test_split_single_class() {
        let corpus = labeled(&[("a", Label::Positive), ("b", Label::Positive)]);
        let result = DatasetSplitter::new().split(&corpus);
        assert!(matches!(result, Err(PolarityError::InsufficientData(_))));
    }

    #[test]
    fn test_split_invalid_test_size() {
        let corpus = labeled(&[("a", Label::Positive), ("b", Label::Negative)]);
        for test_size in [0.0, 1.0, -0.5, f64::NAN] {
            let result = DatasetSplitter::new().test_size(test_size).split(&corpus);
            assert!(matches!(result, Err(PolarityError::InvalidArgument(_))));
        }
        let result = DatasetSplitter::new().test_size(0.9).split(&corpus);
        assert!(matches!(result, Err(PolarityError::InvalidArgument(_))));
    }
}
