//! Definition of errors.

use std::error::Error;
use std::fmt;

pub type Result<T, E = PolarityError> = core::result::Result<T, E>;

#[derive(Debug)]
pub enum PolarityError {
    InsufficientData(InsufficientDataError),
    DimensionMismatch(DimensionMismatchError),
    LengthMismatch(LengthMismatchError),
    InvalidFoldCount(InvalidFoldCountError),
    VocabularyNotFitted(VocabularyNotFittedError),
    InvalidArgument(InvalidArgumentError),
    InvalidModel(InvalidModelError),
    CsvError(csv::Error),
    IOError(std::io::Error),
}

impl PolarityError {
    pub(crate) fn insufficient_data<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InsufficientData(InsufficientDataError { msg: msg.into() })
    }

    pub(crate) const fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch(DimensionMismatchError { expected, actual })
    }

    pub(crate) const fn length_mismatch(
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    ) -> Self {
        Self::LengthMismatch(LengthMismatchError {
            left,
            left_len,
            right,
            right_len,
        })
    }

    pub(crate) const fn invalid_fold_count(folds: usize, n_samples: usize) -> Self {
        Self::InvalidFoldCount(InvalidFoldCountError { folds, n_samples })
    }

    pub(crate) const fn vocabulary_not_fitted() -> Self {
        Self::VocabularyNotFitted(VocabularyNotFittedError)
    }

    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    pub(crate) fn invalid_model<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidModel(InvalidModelError { msg: msg.into() })
    }
}

impl fmt::Display for PolarityError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InsufficientData(e) => e.fmt(f),
            Self::DimensionMismatch(e) => e.fmt(f),
            Self::LengthMismatch(e) => e.fmt(f),
            Self::InvalidFoldCount(e) => e.fmt(f),
            Self::VocabularyNotFitted(e) => e.fmt(f),
            Self::InvalidArgument(e) => e.fmt(f),
            Self::InvalidModel(e) => e.fmt(f),
            Self::CsvError(e) => e.fmt(f),
            Self::IOError(e) => e.fmt(f),
        }
    }
}

impl Error for PolarityError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CsvError(e) => Some(e),
            Self::IOError(e) => Some(e),
            _ => None,
        }
    }
}

/// Error used when too few labeled documents or label classes remain.
#[derive(Debug)]
pub struct InsufficientDataError {
    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InsufficientDataError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InsufficientDataError: {}", self.msg)
    }
}

impl Error for InsufficientDataError {}

/// Error used when a feature vector does not match the dimensionality of a model.
#[derive(Debug)]
pub struct DimensionMismatchError {
    /// Dimensionality the model was trained with.
    pub(crate) expected: usize,

    /// Dimensionality of the given features.
    pub(crate) actual: usize,
}

impl fmt::Display for DimensionMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "DimensionMismatchError: expected {} features, got {}",
            self.expected, self.actual
        )
    }
}

impl Error for DimensionMismatchError {}

/// Error used when two sequences that must be aligned have different lengths.
#[derive(Debug)]
pub struct LengthMismatchError {
    pub(crate) left: &'static str,
    pub(crate) left_len: usize,
    pub(crate) right: &'static str,
    pub(crate) right_len: usize,
}

impl fmt::Display for LengthMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "LengthMismatchError: `{}` has {} elements but `{}` has {}",
            self.left, self.left_len, self.right, self.right_len
        )
    }
}

impl Error for LengthMismatchError {}

/// Error used when the number of cross-validation folds is out of range.
#[derive(Debug)]
pub struct InvalidFoldCountError {
    pub(crate) folds: usize,
    pub(crate) n_samples: usize,
}

impl fmt::Display for InvalidFoldCountError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "InvalidFoldCountError: {} folds requested for {} samples (must be in 2..={})",
            self.folds, self.n_samples, self.n_samples
        )
    }
}

impl Error for InvalidFoldCountError {}

/// Error used when a vectorizer is used before fitting.
#[derive(Debug)]
pub struct VocabularyNotFittedError;

impl fmt::Display for VocabularyNotFittedError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "VocabularyNotFittedError: the vectorizer must be fitted before transform"
        )
    }
}

impl Error for VocabularyNotFittedError {}

/// Error used when the argument is invalid.
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// Name of the argument.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// Error used when a classifier cannot be trained.
#[derive(Debug)]
pub struct InvalidModelError {
    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidModelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidModelError: {}", self.msg)
    }
}

impl Error for InvalidModelError {}

impl From<csv::Error> for PolarityError {
    fn from(error: csv::Error) -> Self {
        Self::CsvError(error)
    }
}

impl From<std::io::Error> for PolarityError {
    fn from(error: std::io::Error) -> Self {
        Self::IOError(error)
    }
}
