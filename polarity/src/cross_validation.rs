//! K-fold cross-validation.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::info;

use crate::classifier::{predict, Classifier};
use crate::document::Label;
use crate::errors::{PolarityError, Result};
use crate::vectorizer::FeatureMatrix;

/// How samples are assigned to folds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FoldStrategy {
    /// Consecutive blocks of samples. The first `n % folds` folds get one extra sample.
    Contiguous,

    /// Samples of each class dealt to the folds in turn, which keeps the class ratio of every
    /// fold close to the overall ratio.
    Stratified,
}

impl Default for FoldStrategy {
    fn default() -> Self {
        Self::Stratified
    }
}

impl FromStr for FoldStrategy {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contiguous" => Ok(Self::Contiguous),
            "stratified" => Ok(Self::Stratified),
            _ => Err("Could not parse a fold strategy"),
        }
    }
}

impl fmt::Display for FoldStrategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(match self {
            Self::Contiguous => "contiguous",
            Self::Stratified => "stratified",
        })
    }
}

/// Cross-validation settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrossValidation {
    folds: usize,
    strategy: FoldStrategy,
    parallel: bool,
}

impl CrossValidation {
    pub const fn new(folds: usize) -> Self {
        Self {
            folds,
            strategy: FoldStrategy::Stratified,
            parallel: true,
        }
    }

    pub const fn strategy(mut self, strategy: FoldStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Fits the folds on the rayon thread pool. Has no effect without the `parallel` feature.
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub const fn folds(&self) -> usize {
        self.folds
    }

    /// Assigns samples to folds.
    ///
    /// # Returns
    ///
    /// The held-out sample positions of each fold, in ascending order.
    ///
    /// # Errors
    ///
    /// [`PolarityError::InvalidFoldCount`] is returned unless `2 <= folds <= labels.len()`.
    pub fn split(&self, labels: &[Label]) -> Result<Vec<Vec<usize>>> {
        let n = labels.len();
        if self.folds < 2 || self.folds > n {
            return Err(PolarityError::invalid_fold_count(self.folds, n));
        }
        let mut test_folds = vec![vec![]; self.folds];
        match self.strategy {
            FoldStrategy::Contiguous => {
                let fold_size = n / self.folds;
                let remainder = n % self.folds;
                let mut start = 0;
                for (i, fold) in test_folds.iter_mut().enumerate() {
                    let end = start + fold_size + usize::from(i < remainder);
                    fold.extend(start..end);
                    start = end;
                }
            }
            FoldStrategy::Stratified => {
                let mut k = 0;
                for class in Label::ALL {
                    for (i, _) in labels.iter().enumerate().filter(|&(_, &l)| l == class) {
                        test_folds[k % self.folds].push(i);
                        k += 1;
                    }
                }
                for fold in &mut test_folds {
                    fold.sort_unstable();
                }
            }
        }
        Ok(test_folds)
    }
}

/// Per-fold accuracies.
#[derive(Clone, Debug, PartialEq)]
pub struct CrossValidationScores {
    scores: Vec<f64>,
}

impl CrossValidationScores {
    /// Gets the scores in fold order.
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn mean(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.iter().sum::<f64>() / self.scores.len() as f64
    }

    /// Gets the population standard deviation.
    pub fn std(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let var = self.scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>()
            / self.scores.len() as f64;
        var.sqrt()
    }
}

fn score_fold(
    classifier: &dyn Classifier,
    features: &FeatureMatrix,
    labels: &[Label],
    test_idx: &[usize],
) -> Result<f64> {
    let mut is_test = vec![false; labels.len()];
    for &i in test_idx {
        is_test[i] = true;
    }
    let train_idx: Vec<usize> = (0..labels.len()).filter(|&i| !is_test[i]).collect();
    let train_labels: Vec<Label> = train_idx.iter().map(|&i| labels[i]).collect();
    let model = classifier.fit(&features.select(&train_idx), &train_labels)?;
    let predicted = predict(model.as_ref(), &features.select(test_idx))?;
    let n_correct = predicted
        .iter()
        .zip(test_idx)
        .filter(|&(&p, &i)| p == labels[i])
        .count();
    Ok(n_correct as f64 / test_idx.len() as f64)
}

/// Fits the classifier on all folds but one and measures the accuracy on the held-out fold, for
/// every fold.
///
/// # Errors
///
/// [`PolarityError::LengthMismatch`] is returned if `features` and `labels` have different
/// lengths, and [`PolarityError::InvalidFoldCount`] if the fold count is out of range. Errors of
/// the classifier are passed through.
pub fn cross_validate(
    classifier: &dyn Classifier,
    features: &FeatureMatrix,
    labels: &[Label],
    cv: &CrossValidation,
) -> Result<CrossValidationScores> {
    if features.n_rows() != labels.len() {
        return Err(PolarityError::length_mismatch(
            "features",
            features.n_rows(),
            "labels",
            labels.len(),
        ));
    }
    let test_folds = cv.split(labels)?;

    #[cfg(feature = "parallel")]
    let scores = if cv.parallel {
        test_folds
            .par_iter()
            .map(|test_idx| score_fold(classifier, features, labels, test_idx))
            .collect::<Result<Vec<_>>>()?
    } else {
        test_folds
            .iter()
            .map(|test_idx| score_fold(classifier, features, labels, test_idx))
            .collect::<Result<Vec<_>>>()?
    };

    #[cfg(not(feature = "parallel"))]
    let scores = test_folds
        .iter()
        .map(|test_idx| score_fold(classifier, features, labels, test_idx))
        .collect::<Result<Vec<_>>>()?;

    let scores = CrossValidationScores { scores };
    info!(
        classifier = classifier.name(),
        folds = cv.folds,
        scores = ?scores.scores(),
        mean = scores.mean(),
        "cross-validated"
    );
    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::classifier::{ConstantModel, Model};
    use crate::document::Label::{Negative as N, Positive as P};
    use crate::vectorizer::SparseVector;

    struct Majority;

    impl Classifier for Majority {
        fn name(&self) -> &'static str {
            "majority"
        }

        fn fit(&self, features: &FeatureMatrix, labels: &[Label]) -> Result<Box<dyn Model>> {
            let n_pos = labels.iter().filter(|&&l| l == P).count();
            let label = if 2 * n_pos > labels.len() { P } else { N };
            Ok(Box::new(ConstantModel::new(label, features.n_features())))
        }
    }

    fn empty_rows(n: usize) -> FeatureMatrix {
        FeatureMatrix::new(1, vec![SparseVector::default(); n]).unwrap()
    }

    #[test]
    fn test_invalid_fold_count() {
        let labels = [P, N, P];
        for folds in [0, 1, 4] {
            assert!(matches!(
                CrossValidation::new(folds).split(&labels),
                Err(PolarityError::InvalidFoldCount(_))
            ));
        }
        assert!(CrossValidation::new(3).split(&labels).is_ok());
    }

    #[test]
    fn test_contiguous_split() {
        let labels = [P; 7];
        let folds = CrossValidation::new(3)
            .strategy(FoldStrategy::Contiguous)
            .split(&labels)
            .unwrap();
        assert_eq!(vec![vec![0, 1, 2], vec![3, 4], vec![5, 6]], folds);
    }

    #[test]
    fn test_stratified_split() {
        let labels = [P, P, P, P, N, N];
        let folds = CrossValidation::new(2).split(&labels).unwrap();
        assert_eq!(vec![vec![0, 2, 4], vec![1, 3, 5]], folds);
    }

    #[test]
    fn test_cross_validate_scores() {
        let labels = [P, P, P, P, N, N];
        let features = empty_rows(labels.len());
        let cv = CrossValidation::new(2).parallel(false);
        let scores = cross_validate(&Majority, &features, &labels, &cv).unwrap();
        // Each training fold holds two positives and one negative.
        assert_eq!(&[2.0 / 3.0, 2.0 / 3.0], scores.scores());
        assert!((scores.mean() - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(0.0, scores.std());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let labels = [P, N, P, N, P, N, N, P, P, N];
        let features = empty_rows(labels.len());
        let cv = CrossValidation::new(5).strategy(FoldStrategy::Contiguous);
        let parallel = cross_validate(&Majority, &features, &labels, &cv).unwrap();
        let sequential =
            cross_validate(&Majority, &features, &labels, &cv.parallel(false)).unwrap();
        assert_eq!(parallel, sequential);
        assert_eq!(5, parallel.scores().len());
    }

    #[test]
    fn test_length_mismatch() {
        let features = empty_rows(3);
        assert!(matches!(
            cross_validate(&Majority, &features, &[P, N], &CrossValidation::new(2)),
            Err(PolarityError::LengthMismatch(_))
        ));
    }
}
