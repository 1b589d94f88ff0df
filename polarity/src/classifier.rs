//! Common interface of the sentiment classifiers.

use tracing::debug;

use crate::document::Label;
use crate::errors::{PolarityError, Result};
use crate::vectorizer::{FeatureMatrix, SparseVector, Vectorizer};

/// A learning algorithm.
pub trait Classifier: Sync {
    /// Gets a short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Trains a model.
    ///
    /// # Errors
    ///
    /// [`PolarityError::LengthMismatch`] is returned if `features` and `labels` have different
    /// lengths, and [`PolarityError::InsufficientData`] if they are empty.
    fn fit(&self, features: &FeatureMatrix, labels: &[Label]) -> Result<Box<dyn Model>>;
}

/// A trained model.
pub trait Model: Send + Sync {
    /// Gets the number of features the model was trained with.
    fn n_features(&self) -> usize;

    /// Predicts the label of one row. Indices beyond [`Model::n_features()`] are ignored.
    fn predict_row(&self, row: &SparseVector) -> Label;
}

/// A model predicting the only class it has seen.
#[derive(Clone, Debug)]
pub struct ConstantModel {
    label: Label,
    n_features: usize,
}

impl ConstantModel {
    pub const fn new(label: Label, n_features: usize) -> Self {
        Self { label, n_features }
    }

    pub const fn label(&self) -> Label {
        self.label
    }
}

impl Model for ConstantModel {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_row(&self, _row: &SparseVector) -> Label {
        self.label
    }
}

/// Validates a training set.
///
/// Returns the class if the labels contain a single one.
pub(crate) fn check_training_set(
    features: &FeatureMatrix,
    labels: &[Label],
) -> Result<Option<Label>> {
    if features.n_rows() != labels.len() {
        return Err(PolarityError::length_mismatch(
            "features",
            features.n_rows(),
            "labels",
            labels.len(),
        ));
    }
    let first = *labels
        .first()
        .ok_or_else(|| PolarityError::insufficient_data("the training set is empty"))?;
    if labels.iter().all(|&label| label == first) {
        debug!(label = %first, "training set has a single class");
        Ok(Some(first))
    } else {
        Ok(None)
    }
}

/// Predicts the labels of every row.
///
/// # Errors
///
/// [`PolarityError::DimensionMismatch`] is returned if the matrix width differs from the one the
/// model was trained with.
pub fn predict(model: &dyn Model, features: &FeatureMatrix) -> Result<Vec<Label>> {
    if features.n_features() != model.n_features() {
        return Err(PolarityError::dimension_mismatch(
            model.n_features(),
            features.n_features(),
        ));
    }
    Ok(features
        .rows()
        .iter()
        .map(|row| model.predict_row(row))
        .collect())
}

/// Vectorizes one text and predicts its label.
///
/// The text is used as given; it is not normalized. An empty text becomes an all-zero row and
/// still receives a label.
///
/// # Errors
///
/// [`PolarityError::VocabularyNotFitted`] is returned if the vectorizer has not been fitted, and
/// [`PolarityError::DimensionMismatch`] if its vocabulary size differs from the model's.
pub fn predict_single(model: &dyn Model, vectorizer: &Vectorizer, text: &str) -> Result<Label> {
    let features = vectorizer.transform([text])?;
    let labels = predict(model, &features)?;
    labels
        .first()
        .copied()
        .ok_or_else(|| PolarityError::insufficient_data("no row was produced"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::forest::{ForestConfig, RandomForest};
    use crate::logistic::{LogisticRegression, QuietOutput};
    use crate::vectorizer::Weighting;

    fn fitted_vectorizer() -> (Vectorizer, FeatureMatrix, Vec<Label>) {
        let texts = [
            "great love",
            "great quality",
            "love excellent",
            "terrible waste",
            "waste broken",
            "awful terrible",
        ];
        let labels = vec![
            Label::Positive,
            Label::Positive,
            Label::Positive,
            Label::Negative,
            Label::Negative,
            Label::Negative,
        ];
        let mut vectorizer = Vectorizer::new(Weighting::TfIdf);
        vectorizer.fit(texts);
        let features = vectorizer.transform(texts).unwrap();
        (vectorizer, features, labels)
    }

    #[test]
    fn test_check_training_set() {
        let features = FeatureMatrix::new(2, vec![SparseVector::default(); 2]).unwrap();
        assert!(matches!(
            check_training_set(&features, &[Label::Positive]),
            Err(PolarityError::LengthMismatch(_))
        ));
        assert_eq!(
            Some(Label::Negative),
            check_training_set(&features, &[Label::Negative, Label::Negative]).unwrap()
        );
        assert_eq!(
            None,
            check_training_set(&features, &[Label::Negative, Label::Positive]).unwrap()
        );

        let empty = FeatureMatrix::new(2, vec![]).unwrap();
        assert!(matches!(
            check_training_set(&empty, &[]),
            Err(PolarityError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_predict_dimension_mismatch() {
        let model = ConstantModel::new(Label::Positive, 3);
        let features = FeatureMatrix::new(2, vec![SparseVector::default()]).unwrap();
        assert!(matches!(
            predict(&model, &features),
            Err(PolarityError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_predict_single_empty_text() {
        let mut vectorizer = Vectorizer::new(Weighting::Counts);
        vectorizer.fit(["good", "bad"]);
        let model = ConstantModel::new(Label::Negative, 2);
        assert_eq!(
            Label::Negative,
            predict_single(&model, &vectorizer, "").unwrap()
        );
    }

    #[test]
    fn test_predict_single_empty_text_logistic() {
        let (vectorizer, features, labels) = fitted_vectorizer();
        let _quiet = QuietOutput::new();
        let model = LogisticRegression::new()
            .fit_linear(&features, &labels)
            .unwrap();
        let expected = if model.bias() > 0.0 {
            Label::Positive
        } else {
            Label::Negative
        };
        assert_eq!(expected, predict_single(&model, &vectorizer, "").unwrap());

        let boxed = LogisticRegression::new().fit(&features, &labels).unwrap();
        assert_eq!(
            expected,
            predict_single(boxed.as_ref(), &vectorizer, "").unwrap()
        );
    }

    #[test]
    fn test_predict_single_empty_text_forest() {
        let (vectorizer, features, labels) = fitted_vectorizer();
        let forest = RandomForest::new(ForestConfig {
            n_trees: 10,
            ..ForestConfig::default()
        });
        let model = forest.fit_forest(&features, &labels).unwrap();
        let expected = if model.predict_proba(&SparseVector::default()) > 0.5 {
            Label::Positive
        } else {
            Label::Negative
        };
        assert_eq!(expected, predict_single(&model, &vectorizer, "").unwrap());

        let boxed = forest.fit(&features, &labels).unwrap();
        assert_eq!(
            expected,
            predict_single(boxed.as_ref(), &vectorizer, "").unwrap()
        );
        assert!(labels.contains(&expected));
    }
}
