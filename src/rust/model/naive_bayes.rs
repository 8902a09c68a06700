use std::f64::consts::PI;

use log::{debug, info};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use super::utils::argmax;
use crate::error::{Result, SentimentError};
use crate::text::Label;

/// Settings for fitting a [`GaussianNb`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NaiveBayesConfig {
    /// Fraction of the largest feature variance added to every variance
    pub var_smoothing: f64,
}

impl Default for NaiveBayesConfig {
    fn default() -> Self {
        Self { var_smoothing: 1e-9 }
    }
}

impl NaiveBayesConfig {
    pub fn with_var_smoothing(mut self, var_smoothing: f64) -> Self {
        self.var_smoothing = var_smoothing;
        self
    }
}

/// Gaussian naive Bayes classifier.
///
/// Each feature is modeled as an independent normal distribution per
/// class. Prediction picks the class with the largest joint log likelihood
/// `ln P(c) + Σ ln N(x_j; μ_cj, σ²_cj)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaussianNb {
    classes: Vec<Label>,
    priors: Vec<f64>,
    /// classes × features
    means: Array2<f64>,
    /// classes × features, already smoothed
    variances: Array2<f64>,
    epsilon: f64,
}

impl GaussianNb {
    /// Fits class priors, means and variances on the training partition.
    ///
    /// # Errors
    /// `Fit` if the partition is empty, the row and label counts differ, or
    /// fewer than two distinct labels are present.
    pub fn fit(x: &Array2<f64>, y: &[Label], config: NaiveBayesConfig) -> Result<Self> {
        let (n_samples, n_features) = x.dim();
        if n_samples == 0 {
            return Err(SentimentError::Fit("training partition is empty".into()));
        }
        if y.len() != n_samples {
            return Err(SentimentError::Fit(format!(
                "{} training rows but {} labels",
                n_samples,
                y.len()
            )));
        }

        let mut classes = y.to_vec();
        classes.sort_unstable();
        classes.dedup();
        if classes.len() < 2 {
            return Err(SentimentError::Fit(format!(
                "need at least 2 distinct labels, found {:?}",
                classes
            )));
        }

        let max_variance = x
            .var_axis(Axis(0), 0.0)
            .iter()
            .fold(0.0f64, |acc, &v| acc.max(v));
        let epsilon = if max_variance > 0.0 {
            config.var_smoothing * max_variance
        } else {
            config.var_smoothing
        };

        let mut priors = Vec::with_capacity(classes.len());
        let mut means = Array2::zeros((classes.len(), n_features));
        let mut variances = Array2::zeros((classes.len(), n_features));

        for (c, &class) in classes.iter().enumerate() {
            let rows: Vec<usize> = y
                .iter()
                .enumerate()
                .filter_map(|(i, &label)| (label == class).then_some(i))
                .collect();
            let samples = x.select(Axis(0), &rows);

            priors.push(rows.len() as f64 / n_samples as f64);
            let mean = samples
                .mean_axis(Axis(0))
                .unwrap_or_else(|| Array1::zeros(n_features));
            means.row_mut(c).assign(&mean);
            variances
                .row_mut(c)
                .assign(&(samples.var_axis(Axis(0), 0.0) + epsilon));

            debug!("Class {}: {} rows, prior {:.3}", class, rows.len(), priors[c]);
        }

        info!(
            "Fitted Gaussian naive Bayes on {} rows × {} features (epsilon {:.3e})",
            n_samples, n_features, epsilon
        );

        Ok(Self {
            classes,
            priors,
            means,
            variances,
            epsilon,
        })
    }

    pub fn classes(&self) -> &[Label] {
        &self.classes
    }

    pub fn priors(&self) -> &[f64] {
        &self.priors
    }

    pub fn n_features(&self) -> usize {
        self.means.ncols()
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    fn check_dimensions(&self, x: &Array2<f64>) -> Result<()> {
        if x.ncols() != self.n_features() {
            return Err(SentimentError::DataFormat(format!(
                "expected {} features, got {}",
                self.n_features(),
                x.ncols()
            )));
        }
        Ok(())
    }

    fn row_log_likelihood(&self, row: ArrayView1<f64>) -> Vec<f64> {
        self.classes
            .iter()
            .enumerate()
            .map(|(c, _)| {
                let mean = self.means.row(c);
                let variance = self.variances.row(c);
                let log_density: f64 = row
                    .iter()
                    .zip(mean.iter().zip(variance.iter()))
                    .map(|(&x, (&mu, &var))| {
                        let diff = x - mu;
                        -0.5 * ((2.0 * PI * var).ln() + diff * diff / var)
                    })
                    .sum();
                self.priors[c].ln() + log_density
            })
            .collect()
    }

    /// Joint log likelihood of every row under every class (rows × classes).
    pub fn joint_log_likelihood(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_dimensions(x)?;
        let mut jll = Array2::zeros((x.nrows(), self.classes.len()));
        for (row, mut out) in x.rows().into_iter().zip(jll.rows_mut()) {
            out.assign(&Array1::from(self.row_log_likelihood(row)));
        }
        Ok(jll)
    }

    /// Class membership probabilities (rows × classes, columns follow
    /// [`classes`](Self::classes)).
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let mut jll = self.joint_log_likelihood(x)?;
        for mut row in jll.rows_mut() {
            let max = row.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
            let log_sum = max + row.mapv(|v| (v - max).exp()).sum().ln();
            row.mapv_inplace(|v| (v - log_sum).exp());
        }
        Ok(jll)
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<Label>> {
        self.check_dimensions(x)?;
        Ok(x
            .rows()
            .into_iter()
            .map(|row| {
                let scores = self.row_log_likelihood(row);
                argmax(&scores).map_or(self.classes[0], |c| self.classes[c])
            })
            .collect())
    }
}
