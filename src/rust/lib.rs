//! A movie-review sentiment classifier: WordNet-lemmatized text, TF-IDF
//! features and a Gaussian naive Bayes model, trained in one linear pass and
//! persisted as two independent artifacts.
//!
//! # Basic Usage
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use amygdala::{Pipeline, PipelineConfig};
//!
//! let report = Pipeline::new(
//!     PipelineConfig::new("imdb_labelled.tsv")
//!         .with_lexicon_dir("lexicon")
//!         .with_output_dir("model")
//!         .with_seed(42),
//! )
//! .run()?;
//!
//! println!("{}", report.evaluation);
//! # Ok(())
//! # }
//! ```
//!
//! # Reusing a trained model
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use amygdala::{Lexicon, Normalizer, SentimentModel};
//!
//! let normalizer = Normalizer::new(Lexicon::load("lexicon")?);
//! let model = SentimentModel::load("model")?;
//! let labels = model.predict_batch(&normalizer, &["Loved it", "Waste of time"])?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod model;
pub mod pipeline;
pub mod resources;
pub mod text;

pub use error::{SentimentError, Stage};
pub use model::{
    ArtifactStore, ConfusionMatrix, Evaluation, GaussianNb, ModelInfo, NaiveBayesConfig,
    SentimentModel, Split, SplitConfig, TfidfVectorizer, VectorizerConfig,
};
pub use pipeline::{Pipeline, PipelineConfig, TrainingReport};
pub use resources::{LexiconFile, ResourceError, ResourceManager};
pub use text::{Corpus, Label, Lexicon, Normalizer, Record, ReviewSchema};

pub fn init_logger() {
    env_logger::init();
}
