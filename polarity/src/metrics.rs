//! Classification metrics.

use core::fmt;

use crate::document::Label;
use crate::errors::{PolarityError, Result};

/// Scores of one class, or an average over classes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClassScores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Counts of one confusion matrix, with the positive class as reference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    pub n_tp: usize,
    pub n_tn: usize,
    pub n_fp: usize,
    pub n_fn: usize,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

impl ConfusionMatrix {
    fn scores(&self, label: Label) -> ClassScores {
        // Negative-class scores swap the roles of the two classes.
        let (n_tp, n_fp, n_fn) = match label {
            Label::Positive => (self.n_tp, self.n_fp, self.n_fn),
            Label::Negative => (self.n_tn, self.n_fn, self.n_fp),
        };
        let precision = ratio(n_tp, n_tp + n_fp);
        let recall = ratio(n_tp, n_tp + n_fn);
        let f1 = if precision + recall > 0.0 {
            2. * precision * recall / (precision + recall)
        } else {
            0.0
        };
        ClassScores {
            precision,
            recall,
            f1,
            support: n_tp + n_fn,
        }
    }
}

/// A classification report.
///
/// [`Display`](fmt::Display) renders it as a text table.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub confusion: ConfusionMatrix,
    pub classes: [(Label, ClassScores); 2],
    pub accuracy: f64,
    pub macro_avg: ClassScores,
    pub weighted_avg: ClassScores,
}

impl Report {
    /// Gets the scores of one class.
    pub fn class(&self, label: Label) -> &ClassScores {
        &self.classes[label.index()].1
    }

    pub fn support(&self) -> usize {
        self.classes.iter().map(|(_, s)| s.support).sum()
    }
}

/// Compares predicted labels with true labels.
///
/// Zero divisions produce zero scores.
///
/// # Errors
///
/// [`PolarityError::LengthMismatch`] is returned if the two slices have different lengths.
pub fn evaluate(predicted: &[Label], actual: &[Label]) -> Result<Report> {
    if predicted.len() != actual.len() {
        return Err(PolarityError::length_mismatch(
            "predicted",
            predicted.len(),
            "actual",
            actual.len(),
        ));
    }
    let mut confusion = ConfusionMatrix::default();
    for (&p, &a) in predicted.iter().zip(actual) {
        match (p, a) {
            (Label::Positive, Label::Positive) => confusion.n_tp += 1,
            (Label::Negative, Label::Negative) => confusion.n_tn += 1,
            (Label::Positive, Label::Negative) => confusion.n_fp += 1,
            (Label::Negative, Label::Positive) => confusion.n_fn += 1,
        }
    }
    let classes = Label::ALL.map(|label| (label, confusion.scores(label)));

    let n = actual.len();
    let mut macro_avg = ClassScores {
        support: n,
        ..ClassScores::default()
    };
    let mut weighted_avg = macro_avg;
    for (_, s) in &classes {
        macro_avg.precision += s.precision / classes.len() as f64;
        macro_avg.recall += s.recall / classes.len() as f64;
        macro_avg.f1 += s.f1 / classes.len() as f64;
        let w = ratio(s.support, n);
        weighted_avg.precision += s.precision * w;
        weighted_avg.recall += s.recall * w;
        weighted_avg.f1 += s.f1 * w;
    }

    Ok(Report {
        confusion,
        classes,
        accuracy: ratio(confusion.n_tp + confusion.n_tn, n),
        macro_avg,
        weighted_avg,
    })
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "{:>12} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for (label, s) in &self.classes {
            writeln!(
                f,
                "{:>12} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                label, s.precision, s.recall, s.f1, s.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>12} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy",
            "",
            "",
            self.accuracy,
            self.support()
        )?;
        for (name, s) in [
            ("macro avg", &self.macro_avg),
            ("weighted avg", &self.weighted_avg),
        ] {
            writeln!(
                f,
                "{:>12} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                name, s.precision, s.recall, s.f1, s.support
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::document::Label::{Negative as N, Positive as P};

    #[test]
    fn test_evaluate() {
        let predicted = [P, P, N, N, P];
        let actual = [P, N, N, P, P];
        let report = evaluate(&predicted, &actual).unwrap();

        assert_eq!(
            ConfusionMatrix {
                n_tp: 2,
                n_tn: 1,
                n_fp: 1,
                n_fn: 1,
            },
            report.confusion
        );
        assert!((report.accuracy - 0.6).abs() < 1e-12);

        let pos = report.class(P);
        assert!((pos.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((pos.recall - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(3, pos.support);

        let neg = report.class(N);
        assert!((neg.precision - 0.5).abs() < 1e-12);
        assert!((neg.recall - 0.5).abs() < 1e-12);
        assert_eq!(2, neg.support);

        let expected_macro = (2.0 / 3.0 + 0.5) / 2.0;
        assert!((report.macro_avg.f1 - expected_macro).abs() < 1e-12);
        let expected_weighted = (2.0 / 3.0) * 0.6 + 0.5 * 0.4;
        assert!((report.weighted_avg.f1 - expected_weighted).abs() < 1e-12);
    }

    #[test]
    fn test_zero_division() {
        let report = evaluate(&[N, N], &[N, N]).unwrap();
        let pos = report.class(P);
        assert_eq!(0.0, pos.precision);
        assert_eq!(0.0, pos.recall);
        assert_eq!(0.0, pos.f1);
        assert_eq!(1.0, report.accuracy);

        let report = evaluate(&[], &[]).unwrap();
        assert_eq!(0.0, report.accuracy);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(matches!(
            evaluate(&[P], &[P, N]),
            Err(PolarityError::LengthMismatch(_))
        ));
    }

    #[test]
    fn test_display() {
        let report = evaluate(&[P, N], &[P, N]).unwrap();
        let text = report.to_string();
        assert!(text.contains("precision"));
        assert!(text.lines().any(|line| line.trim_start().starts_with("neg")));
        assert!(text.contains("weighted avg"));
        assert!(text.contains("1.00"));
    }
}
