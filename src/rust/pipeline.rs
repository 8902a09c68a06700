use std::path::{Path, PathBuf};
use std::time::Instant;

use log::info;

use crate::error::{Result, Stage};
use crate::model::{
    train_test_split, Evaluation, GaussianNb, NaiveBayesConfig, SentimentModel, SplitConfig,
    TfidfVectorizer, VectorizerConfig,
};
use crate::text::{load_records, Lexicon, Normalizer, Record, ReviewSchema};

/// Everything a training run needs to know.
///
/// ```
/// use amygdala::PipelineConfig;
///
/// let config = PipelineConfig::new("imdb_labelled.tsv")
///     .with_output_dir("artifacts")
///     .with_seed(7)
///     .with_max_features(1500)
///     .with_stratify(true);
/// assert_eq!(config.split.seed, 7);
/// ```
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub data_path: PathBuf,
    pub output_dir: PathBuf,
    pub lexicon_dir: PathBuf,
    pub schema: ReviewSchema,
    pub vectorizer: VectorizerConfig,
    pub split: SplitConfig,
    pub naive_bayes: NaiveBayesConfig,
}

impl PipelineConfig {
    pub fn new<P: AsRef<Path>>(data_path: P) -> Self {
        Self {
            data_path: data_path.as_ref().to_path_buf(),
            output_dir: PathBuf::from("model"),
            lexicon_dir: crate::resources::ResourceManager::get_default_lexicon_dir(),
            schema: ReviewSchema::default(),
            vectorizer: VectorizerConfig::default(),
            split: SplitConfig::default(),
            naive_bayes: NaiveBayesConfig::default(),
        }
    }

    pub fn with_output_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_lexicon_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.lexicon_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_schema(mut self, schema: ReviewSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.vectorizer.max_features = max_features;
        self
    }

    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.split.test_size = test_size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.split.seed = seed;
        self
    }

    pub fn with_stratify(mut self, stratify: bool) -> Self {
        self.split.stratify = stratify;
        self
    }

    pub fn with_var_smoothing(mut self, var_smoothing: f64) -> Self {
        self.naive_bayes.var_smoothing = var_smoothing;
        self
    }
}

/// Outcome of a completed training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub model: SentimentModel,
    pub evaluation: Evaluation,
    pub corpus_size: usize,
    pub train_size: usize,
    pub test_size: usize,
    /// Original row numbers of the held-out reviews
    pub test_indices: Vec<usize>,
    pub vectorizer_path: PathBuf,
    pub classifier_path: PathBuf,
}

/// Runs load → normalize → vectorize → split → train → evaluate → persist.
/// The first failing stage aborts the run.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Reads the dataset and lexicon named in the config, then trains.
    pub fn run(&self) -> Result<TrainingReport> {
        let start = Instant::now();

        info!("=== Stage: {} ===", Stage::Load);
        let records = load_records(&self.config.data_path, &self.config.schema)
            .map_err(|e| e.in_stage(Stage::Load))?;

        let lexicon = Lexicon::load(&self.config.lexicon_dir).map_err(|e| e.in_stage(Stage::Normalize))?;
        let normalizer = Normalizer::new(lexicon);

        let report = self.run_on_records(&records, &normalizer)?;
        info!("=== Pipeline complete (took {:.2?}) ===", start.elapsed());
        Ok(report)
    }

    /// Trains on records that are already in memory.
    pub fn run_on_records(&self, records: &[Record], normalizer: &Normalizer) -> Result<TrainingReport> {
        info!("=== Stage: {} ({} reviews) ===", Stage::Normalize, records.len());
        let corpus = normalizer.normalize_records(records);
        let (documents, labels) = corpus.into_parts();

        info!("=== Stage: {} ===", Stage::Vectorize);
        let (vectorizer, features) = TfidfVectorizer::fit_transform(&documents, self.config.vectorizer.clone())
            .map_err(|e| e.in_stage(Stage::Vectorize))?;
        info!("Feature matrix: {} × {}", features.nrows(), features.ncols());

        info!("=== Stage: {} ===", Stage::Split);
        let split = train_test_split(&features, &labels, &self.config.split).map_err(|e| e.in_stage(Stage::Split))?;
        drop(features);

        info!("=== Stage: {} ===", Stage::Train);
        let classifier = GaussianNb::fit(&split.x_train, &split.y_train, self.config.naive_bayes)
            .map_err(|e| e.in_stage(Stage::Train))?;

        info!("=== Stage: {} ===", Stage::Evaluate);
        let predictions = classifier.predict(&split.x_test).map_err(|e| e.in_stage(Stage::Evaluate))?;
        let evaluation = Evaluation::new(&split.y_test, &predictions).map_err(|e| e.in_stage(Stage::Evaluate))?;
        info!(
            "Accuracy {:.4} on {} held-out reviews",
            evaluation.accuracy,
            split.y_test.len()
        );

        info!("=== Stage: {} ===", Stage::Persist);
        let model = SentimentModel::new(vectorizer, classifier).map_err(|e| e.in_stage(Stage::Persist))?;
        let (vectorizer_path, classifier_path) = model
            .save(&self.config.output_dir)
            .map_err(|e| e.in_stage(Stage::Persist))?;

        Ok(TrainingReport {
            model,
            evaluation,
            corpus_size: documents.len(),
            train_size: split.y_train.len(),
            test_size: split.y_test.len(),
            test_indices: split.test_indices,
            vectorizer_path,
            classifier_path,
        })
    }
}
