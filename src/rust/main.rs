use std::path::PathBuf;

use amygdala::{
    Lexicon, Normalizer, Pipeline, PipelineConfig, ResourceManager, ReviewSchema, SentimentError,
    SentimentModel,
};
use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download the stop-word list and lemmatization lexicon into the cache
    Fetch {
        /// Base URL serving stopwords/english, wordnet/index.noun and wordnet/noun.exc
        #[arg(long)]
        base_url: String,
        /// Force a fresh download of the lexicon files
        #[arg(short, long)]
        fresh: bool,
    },
    /// Copy the lexicon files from a local directory into the cache
    Install {
        #[arg(long)]
        from: PathBuf,
    },
    /// Train and evaluate the classifier, then save its artifacts
    Train {
        /// Tab-separated review file
        #[arg(long)]
        data: PathBuf,
        /// Directory the fitted vectorizer and classifier are written to
        #[arg(long, default_value = "model")]
        output: PathBuf,
        /// Lexicon directory (defaults to the cache)
        #[arg(long)]
        lexicon: Option<PathBuf>,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 2000)]
        max_features: usize,
        #[arg(long, default_value_t = 0.2)]
        test_size: f64,
        /// Keep label proportions equal in train and test
        #[arg(long)]
        stratify: bool,
        #[arg(long, default_value = "Review")]
        text_column: String,
        #[arg(long, default_value = "Liked")]
        label_column: String,
    },
    /// Classify texts with previously saved artifacts
    Predict {
        #[arg(long, default_value = "model")]
        model: PathBuf,
        #[arg(long)]
        lexicon: Option<PathBuf>,
        #[arg(required = true)]
        texts: Vec<String>,
    },
}

fn lexicon_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(ResourceManager::get_default_lexicon_dir)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Fetch { base_url, fresh } => {
            let manager = ResourceManager::new_default()?;
            if fresh {
                info!("Fresh download requested - removing any cached lexicon files...");
                manager.remove().map_err(SentimentError::from)?;
            }
            manager
                .ensure_downloaded(&base_url)
                .await
                .map_err(SentimentError::from)
                .with_context(|| format!("fetching lexicon from {}", base_url))?;
            println!("Lexicon ready in {}", manager.lexicon_dir().display());
        }
        Command::Install { from } => {
            let manager = ResourceManager::new_default()?;
            manager.install_from(&from).map_err(SentimentError::from)?;
            let lexicon = manager.load_lexicon()?;
            info!(
                "{} stop words, {} lemmas",
                lexicon.stop_words.len(),
                lexicon.lemmatizer.len()
            );
            println!("Lexicon installed in {}", manager.lexicon_dir().display());
        }
        Command::Train {
            data,
            output,
            lexicon,
            seed,
            max_features,
            test_size,
            stratify,
            text_column,
            label_column,
        } => {
            let config = PipelineConfig::new(&data)
                .with_output_dir(&output)
                .with_lexicon_dir(lexicon_dir(lexicon))
                .with_schema(ReviewSchema::new(text_column, label_column))
                .with_seed(seed)
                .with_max_features(max_features)
                .with_test_size(test_size)
                .with_stratify(stratify);

            let report = Pipeline::new(config)
                .run()
                .with_context(|| format!("training on {} failed", data.display()))?;

            println!(
                "Trained on {} reviews ({} train / {} test), vocabulary of {} terms",
                report.corpus_size,
                report.train_size,
                report.test_size,
                report.model.info().vocabulary_size
            );
            println!("{}", report.evaluation);
            println!("Vectorizer saved to {}", report.vectorizer_path.display());
            println!("Classifier saved to {}", report.classifier_path.display());
        }
        Command::Predict {
            model,
            lexicon,
            texts,
        } => {
            let lexicon = match lexicon {
                Some(dir) => Lexicon::load(dir)?,
                None => ResourceManager::new_default()?.load_lexicon()?,
            };
            let normalizer = Normalizer::new(lexicon);
            let model = SentimentModel::load(&model)?;
            let labels = model.predict_batch(&normalizer, texts.as_slice())?;
            for (text, label) in texts.iter().zip(labels) {
                println!("{}\t{}", label, text);
            }
        }
    }

    Ok(())
}
