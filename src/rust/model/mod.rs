//! Feature extraction, the classifier, evaluation and persistence.

pub mod metrics;
pub mod naive_bayes;
pub mod persistence;
mod sentiment;
pub mod split;
mod utils;
pub mod vectorizer;

pub use metrics::{ConfusionMatrix, Evaluation};
pub use naive_bayes::{GaussianNb, NaiveBayesConfig};
pub use persistence::{load_artifact, save_artifact, Artifact, ArtifactStore};
pub use sentiment::SentimentModel;
pub use split::{train_test_split, Split, SplitConfig};
pub use vectorizer::{TfidfVectorizer, VectorizerConfig};

use crate::text::Label;

/// Information about a fitted sentiment model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    /// Number of feature columns
    pub vocabulary_size: usize,
    /// Labels the classifier can predict
    pub classes: Vec<Label>,
    /// Class priors, aligned with `classes`
    pub priors: Vec<f64>,
}
