use std::collections::BTreeMap;

use log::info;
use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{Result, SentimentError};
use crate::text::Label;

/// How to partition the feature matrix into train and test rows.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitConfig {
    /// Fraction of rows held out for testing, in `(0, 1)`
    pub test_size: f64,
    /// Seed for the shuffle
    pub seed: u64,
    /// Keep each label's share equal in both partitions
    pub stratify: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            seed: 42,
            stratify: false,
        }
    }
}

impl SplitConfig {
    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_stratify(mut self, stratify: bool) -> Self {
        self.stratify = stratify;
        self
    }
}

/// Disjoint train and test partitions. `train_indices`/`test_indices` are
/// the original row numbers, in the order the rows appear in each partition.
#[derive(Debug, Clone)]
pub struct Split {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Vec<Label>,
    pub y_test: Vec<Label>,
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

/// Shuffles rows with a seeded RNG and holds out `ceil(n * test_size)` of them.
/// Features and labels always move under the same permutation.
pub fn train_test_split(features: &Array2<f64>, labels: &[Label], config: &SplitConfig) -> Result<Split> {
    let n = features.nrows();
    if labels.len() != n {
        return Err(SentimentError::DataFormat(format!(
            "feature matrix has {} rows but there are {} labels",
            n,
            labels.len()
        )));
    }
    if !(config.test_size > 0.0 && config.test_size < 1.0) {
        return Err(SentimentError::DataFormat(format!(
            "test size must be between 0 and 1, got {}",
            config.test_size
        )));
    }

    let n_test = (n as f64 * config.test_size).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(SentimentError::DataFormat(format!(
            "cannot split {} rows with test size {}: one partition would be empty",
            n, config.test_size
        )));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let (train_indices, test_indices) = if config.stratify {
        stratified_indices(labels, n_test, &mut rng)
    } else {
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(&mut rng);
        let train = order.split_off(n_test);
        (train, order)
    };

    info!(
        "Split {} rows into {} train / {} test (seed {}, stratified: {})",
        n,
        train_indices.len(),
        test_indices.len(),
        config.seed,
        config.stratify
    );

    Ok(Split {
        x_train: features.select(Axis(0), &train_indices),
        x_test: features.select(Axis(0), &test_indices),
        y_train: train_indices.iter().map(|&i| labels[i]).collect(),
        y_test: test_indices.iter().map(|&i| labels[i]).collect(),
        train_indices,
        test_indices,
    })
}

/// Allots the test rows to each label by largest remainder, then shuffles
/// each label's rows independently.
fn stratified_indices(labels: &[Label], n_test: usize, rng: &mut StdRng) -> (Vec<usize>, Vec<usize>) {
    let mut by_label: BTreeMap<Label, Vec<usize>> = BTreeMap::new();
    for (i, &label) in labels.iter().enumerate() {
        by_label.entry(label).or_default().push(i);
    }

    let n = labels.len() as f64;
    let mut quotas: Vec<(Label, usize, f64)> = by_label
        .iter()
        .map(|(&label, rows)| {
            let exact = rows.len() as f64 * n_test as f64 / n;
            (label, exact.floor() as usize, exact - exact.floor())
        })
        .collect();

    let assigned: usize = quotas.iter().map(|q| q.1).sum();
    let mut by_remainder: Vec<usize> = (0..quotas.len()).collect();
    by_remainder.sort_by(|&a, &b| {
        quotas[b]
            .2
            .partial_cmp(&quotas[a].2)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for &q in by_remainder.iter().take(n_test.saturating_sub(assigned)) {
        quotas[q].1 += 1;
    }

    let mut train = Vec::new();
    let mut test = Vec::new();
    for (label, quota, _) in quotas {
        let mut rows = by_label.remove(&label).unwrap_or_default();
        rows.shuffle(rng);
        let rest = rows.split_off(quota.min(rows.len()));
        test.extend(rows);
        train.extend(rest);
    }
    train.shuffle(rng);
    test.shuffle(rng);
    (train, test)
}
