use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SentimentError};
use crate::text::Label;

/// 2×2 table of actual (rows) versus predicted (columns) labels, ordered
/// `[negative, positive]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    counts: [[usize; 2]; 2],
}

impl ConfusionMatrix {
    pub fn from_predictions(actual: &[Label], predicted: &[Label]) -> Result<Self> {
        if actual.len() != predicted.len() {
            return Err(SentimentError::DataFormat(format!(
                "{} actual labels but {} predictions",
                actual.len(),
                predicted.len()
            )));
        }

        let mut counts = [[0usize; 2]; 2];
        for (a, p) in actual.iter().zip(predicted) {
            counts[a.index()][p.index()] += 1;
        }
        Ok(Self { counts })
    }

    pub fn true_negatives(&self) -> usize {
        self.counts[0][0]
    }

    pub fn false_positives(&self) -> usize {
        self.counts[0][1]
    }

    pub fn false_negatives(&self) -> usize {
        self.counts[1][0]
    }

    pub fn true_positives(&self) -> usize {
        self.counts[1][1]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn correct(&self) -> usize {
        self.true_negatives() + self.true_positives()
    }

    /// Fraction of correct predictions; zero when there are none.
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct(), self.total())
    }

    pub fn precision(&self, label: Label) -> f64 {
        let i = label.index();
        ratio(self.counts[i][i], self.counts[0][i] + self.counts[1][i])
    }

    pub fn recall(&self, label: Label) -> f64 {
        let i = label.index();
        ratio(self.counts[i][i], self.counts[i][0] + self.counts[i][1])
    }

    pub fn f1(&self, label: Label) -> f64 {
        let (p, r) = (self.precision(label), self.recall(label));
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .counts
            .iter()
            .flatten()
            .map(|c| c.to_string().len())
            .max()
            .unwrap_or(1);
        writeln!(f, "[[{:>w$} {:>w$}]", self.counts[0][0], self.counts[0][1], w = width)?;
        write!(f, " [{:>w$} {:>w$}]]", self.counts[1][0], self.counts[1][1], w = width)
    }
}

/// Scores for one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub confusion_matrix: ConfusionMatrix,
    pub accuracy: f64,
}

impl Evaluation {
    pub fn new(actual: &[Label], predicted: &[Label]) -> Result<Self> {
        let confusion_matrix = ConfusionMatrix::from_predictions(actual, predicted)?;
        Ok(Self {
            accuracy: confusion_matrix.accuracy(),
            confusion_matrix,
        })
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cm = &self.confusion_matrix;
        writeln!(f, "Confusion matrix (rows actual, columns predicted):")?;
        writeln!(f, "{}", cm)?;
        writeln!(f, "Accuracy: {:.4} ({}/{})", self.accuracy, cm.correct(), cm.total())?;
        for label in [Label::Negative, Label::Positive] {
            writeln!(
                f,
                "  {:<8}  precision {:.3}  recall {:.3}  f1 {:.3}",
                label.to_string(),
                cm.precision(label),
                cm.recall(label),
                cm.f1(label)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Label::{Negative as N, Positive as P};

    #[test]
    fn test_confusion_counts() {
        let actual = [N, N, N, P, P, P, P];
        let predicted = [N, N, P, P, P, N, P];
        let cm = ConfusionMatrix::from_predictions(&actual, &predicted).unwrap();

        assert_eq!(cm.true_negatives(), 2);
        assert_eq!(cm.false_positives(), 1);
        assert_eq!(cm.false_negatives(), 1);
        assert_eq!(cm.true_positives(), 3);
        assert_eq!(cm.total(), 7);
        assert!((cm.accuracy() - 5.0 / 7.0).abs() < 1e-12);
        assert!((cm.precision(P) - 0.75).abs() < 1e-12);
        assert!((cm.recall(N) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_and_degenerate() {
        let cm = ConfusionMatrix::from_predictions(&[], &[]).unwrap();
        assert_eq!(cm.accuracy(), 0.0);

        let cm = ConfusionMatrix::from_predictions(&[N, N], &[N, N]).unwrap();
        assert_eq!(cm.precision(P), 0.0);
        assert_eq!(cm.f1(P), 0.0);
        assert_eq!(cm.accuracy(), 1.0);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(ConfusionMatrix::from_predictions(&[N], &[]).is_err());
    }

    #[test]
    fn test_display() {
        let cm = ConfusionMatrix::from_predictions(&[N, P, P], &[N, P, N]).unwrap();
        assert_eq!(cm.to_string(), "[[1 0]\n [1 1]]");

        let evaluation = Evaluation::new(&[N, P, P], &[N, P, N]).unwrap();
        assert!(evaluation.to_string().contains("Accuracy: 0.6667 (2/3)"));
    }
}
