//! Linear classifiers trained with LIBLINEAR.

use core::fmt;
use core::str::FromStr;

use liblinear::LibLinearModel;
use tracing::debug;

use crate::classifier::{self, Classifier, ConstantModel, Model};
use crate::document::Label;
use crate::errors::{PolarityError, Result};
use crate::vectorizer::{FeatureMatrix, SparseVector};

/// Solver type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverType {
    /// L2-regularized logistic regression (primal).
    L2RegularizedLogistic = 0,

    /// L2-regularized L2-loss support vector classification (dual).
    L2RegularizedL2LossSVCDual = 1,

    /// L2-regularized L2-loss support vector classification (primal).
    L2RegularizedL2LossSVC = 2,

    /// L2-regularized L1-loss support vector classification (dual)
    L2RegularizedL1LossSVCDual = 3,

    /// L1-regularized L2-loss support vector classification
    L1RegularizedL2LossSVC = 5,

    /// L1-regularized logistic regression
    L1RegularizedLogistic = 6,

    /// L2-regularized logistic regression (dual).
    L2RegularizedLogisticDual = 7,
}

impl Default for SolverType {
    fn default() -> Self {
        Self::L2RegularizedLogistic
    }
}

impl FromStr for SolverType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(Self::L2RegularizedLogistic),
            "1" => Ok(Self::L2RegularizedL2LossSVCDual),
            "2" => Ok(Self::L2RegularizedL2LossSVC),
            "3" => Ok(Self::L2RegularizedL1LossSVCDual),
            "5" => Ok(Self::L1RegularizedL2LossSVC),
            "6" => Ok(Self::L1RegularizedLogistic),
            "7" => Ok(Self::L2RegularizedLogisticDual),
            _ => Err("Unsupported solver type."),
        }
    }
}

impl fmt::Display for SolverType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

impl From<SolverType> for liblinear::SolverType {
    fn from(solver: SolverType) -> Self {
        match solver {
            SolverType::L2RegularizedLogistic => Self::L2R_LR,
            SolverType::L2RegularizedL2LossSVCDual => Self::L2R_L2LOSS_SVC_DUAL,
            SolverType::L2RegularizedL2LossSVC => Self::L2R_L2LOSS_SVC,
            SolverType::L2RegularizedL1LossSVCDual => Self::L2R_L1LOSS_SVC_DUAL,
            SolverType::L1RegularizedL2LossSVC => Self::L1R_L2LOSS_SVC,
            SolverType::L1RegularizedLogistic => Self::L1R_LR,
            SolverType::L2RegularizedLogisticDual => Self::L2R_LR_DUAL,
        }
    }
}

/// A dense linear decision function: `w . x + b > 0` means positive.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearModel {
    weights: Vec<f64>,
    bias: f64,
}

impl LinearModel {
    pub fn new(weights: Vec<f64>, bias: f64) -> Self {
        Self { weights, bias }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Computes the signed distance of a row from the decision boundary.
    pub fn decision_function(&self, row: &SparseVector) -> f64 {
        row.dot(&self.weights) + self.bias
    }
}

impl Model for LinearModel {
    fn n_features(&self) -> usize {
        self.weights.len()
    }

    fn predict_row(&self, row: &SparseVector) -> Label {
        if self.decision_function(row) > 0.0 {
            Label::Positive
        } else {
            Label::Negative
        }
    }
}

/// Silences LIBLINEAR's console output until dropped.
///
/// LIBLINEAR's print function is process-global, so create one guard around a batch of fits
/// instead of one per fit.
#[must_use]
pub struct QuietOutput(());

impl QuietOutput {
    pub fn new() -> Self {
        liblinear::toggle_liblinear_stdout_output(false);
        Self(())
    }
}

impl Default for QuietOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for QuietOutput {
    fn drop(&mut self) {
        liblinear::toggle_liblinear_stdout_output(true);
    }
}

/// Logistic regression (or another LIBLINEAR solver) over sparse features.
///
/// # Examples
///
/// ```
/// use polarity::{predict, Classifier, Label, LogisticRegression, Vectorizer, Weighting};
///
/// let mut vectorizer = Vectorizer::new(Weighting::Counts);
/// vectorizer.fit(["good good", "bad bad"]);
/// let features = vectorizer.transform(["good good", "bad bad"]).unwrap();
///
/// let model = LogisticRegression::new()
///     .cost(10.0)
///     .fit(&features, &[Label::Positive, Label::Negative])
///     .unwrap();
///
/// let test = vectorizer.transform(["good", "bad"]).unwrap();
/// assert_eq!(
///     vec![Label::Positive, Label::Negative],
///     predict(model.as_ref(), &test).unwrap(),
/// );
/// ```
#[derive(Clone, Copy, Debug)]
pub struct LogisticRegression {
    solver: SolverType,
    cost: f64,
    epsilon: f64,
    bias: f64,
}

impl LogisticRegression {
    pub const DEFAULT_COST: f64 = 1.0;
    pub const DEFAULT_EPSILON: f64 = 0.01;
    pub const DEFAULT_BIAS: f64 = 1.0;

    pub fn new() -> Self {
        Self {
            solver: SolverType::default(),
            cost: Self::DEFAULT_COST,
            epsilon: Self::DEFAULT_EPSILON,
            bias: Self::DEFAULT_BIAS,
        }
    }

    pub const fn solver(mut self, solver: SolverType) -> Self {
        self.solver = solver;
        self
    }

    /// Sets the parameter C.
    pub const fn cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    /// Sets the tolerance of the termination criterion.
    pub const fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the value of the synthetic bias feature. A negative value disables it.
    pub const fn bias(mut self, bias: f64) -> Self {
        self.bias = bias;
        self
    }

    /// Trains a linear model.
    ///
    /// # Errors
    ///
    /// See [`Classifier::fit()`]. Failures reported by LIBLINEAR become
    /// [`PolarityError::InvalidModel`].
    pub fn fit_linear(&self, features: &FeatureMatrix, labels: &[Label]) -> Result<LinearModel> {
        if let Some(label) = classifier::check_training_set(features, labels)? {
            let bias = if label == Label::Positive { 1.0 } else { -1.0 };
            return Ok(LinearModel::new(vec![0.0; features.n_features()], bias));
        }
        let n_features = i32::try_from(features.n_features()).map_err(|_| {
            PolarityError::invalid_argument("features", "too many features for LIBLINEAR")
        })?;

        // LIBLINEAR expects 1-based feature ids.
        let xs: Vec<Vec<(u32, f64)>> = features
            .rows()
            .iter()
            .map(|row| row.entries().iter().map(|&(i, v)| (i + 1, v)).collect())
            .collect();
        let ys: Vec<f64> = labels.iter().map(|label| label.class_id()).collect();

        let mut builder = liblinear::Builder::new();
        let training_input = liblinear::util::TrainingInput::from_sparse_features(ys, xs)
            .map_err(|e| PolarityError::invalid_model(format!("liblinear error: {e:?}")))?;
        builder.problem().input_data(training_input).bias(self.bias);
        builder
            .parameters()
            .solver_type(self.solver.into())
            .stopping_criterion(self.epsilon)
            .constraints_violation_cost(self.cost);
        let model = builder
            .build_model()
            .map_err(|e| PolarityError::invalid_model(e.to_string()))?;

        let pos_class = Label::Positive.class_id() as i32;
        let pos_idx = model
            .labels()
            .iter()
            .position(|&cls| cls == pos_class)
            .ok_or_else(|| PolarityError::invalid_model("the positive class is not learned"))?;
        let pos_idx = pos_idx as i32;

        let weights = (1..=n_features)
            .map(|fid| model.feature_coefficient(fid, pos_idx))
            .collect();
        let bias = if self.bias >= 0.0 {
            model.label_bias(pos_idx)
        } else {
            0.0
        };
        debug!(
            solver = %self.solver,
            n_samples = labels.len(),
            n_features,
            bias,
            "trained linear model"
        );
        Ok(LinearModel::new(weights, bias))
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for LogisticRegression {
    fn name(&self) -> &'static str {
        "logistic"
    }

    fn fit(&self, features: &FeatureMatrix, labels: &[Label]) -> Result<Box<dyn Model>> {
        if let Some(label) = classifier::check_training_set(features, labels)? {
            return Ok(Box::new(ConstantModel::new(label, features.n_features())));
        }
        Ok(Box::new(self.fit_linear(features, labels)?))
    }
}
