use std::path::{Path, PathBuf};

use log::info;
use ndarray::Array2;

use super::naive_bayes::GaussianNb;
use super::persistence::ArtifactStore;
use super::vectorizer::TfidfVectorizer;
use super::ModelInfo;
use crate::error::{Result, SentimentError};
use crate::text::{Label, Normalizer};

/// A fitted vectorizer and the classifier trained on its output.
///
/// The two are only meaningful together: the classifier expects exactly the
/// columns the vectorizer produces.
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use amygdala::{Lexicon, Normalizer, SentimentModel};
///
/// let normalizer = Normalizer::new(Lexicon::load("lexicon")?);
/// let model = SentimentModel::load("model")?;
/// let label = model.predict(&normalizer, "What a wonderful film!")?;
/// println!("{}", label);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentModel {
    vectorizer: TfidfVectorizer,
    classifier: GaussianNb,
}

impl SentimentModel {
    pub fn new(vectorizer: TfidfVectorizer, classifier: GaussianNb) -> Result<Self> {
        if vectorizer.vocabulary_size() != classifier.n_features() {
            return Err(SentimentError::DataFormat(format!(
                "vectorizer produces {} features but classifier expects {}",
                vectorizer.vocabulary_size(),
                classifier.n_features()
            )));
        }
        Ok(Self {
            vectorizer,
            classifier,
        })
    }

    /// Loads both artifacts from a directory written by [`save`](Self::save).
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let store = ArtifactStore::new(dir);
        let vectorizer = store.load::<TfidfVectorizer>()?;
        let classifier = store.load::<GaussianNb>()?;
        info!("Loaded sentiment model from {:?}", store.dir());
        Self::new(vectorizer, classifier)
    }

    /// Writes the vectorizer and the classifier as two separate files.
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<(PathBuf, PathBuf)> {
        let store = ArtifactStore::new(dir);
        let vectorizer_path = store.save(&self.vectorizer)?;
        let classifier_path = store.save(&self.classifier)?;
        Ok((vectorizer_path, classifier_path))
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn classifier(&self) -> &GaussianNb {
        &self.classifier
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            vocabulary_size: self.vectorizer.vocabulary_size(),
            classes: self.classifier.classes().to_vec(),
            priors: self.classifier.priors().to_vec(),
        }
    }

    /// Vectorizes already-normalized documents.
    pub fn features<S: AsRef<str>>(&self, documents: &[S]) -> Array2<f64> {
        self.vectorizer.transform(documents)
    }

    /// Classifies already-normalized documents.
    pub fn predict_normalized<S: AsRef<str>>(&self, documents: &[S]) -> Result<Vec<Label>> {
        self.classifier.predict(&self.features(documents))
    }

    /// Normalizes and classifies raw texts.
    pub fn predict_batch<S: AsRef<str>>(&self, normalizer: &Normalizer, texts: &[S]) -> Result<Vec<Label>> {
        let documents: Vec<String> = texts.iter().map(|t| normalizer.normalize(t.as_ref())).collect();
        self.predict_normalized(&documents)
    }

    /// Normalizes and classifies a single raw text.
    pub fn predict(&self, normalizer: &Normalizer, text: &str) -> Result<Label> {
        self.predict_batch(normalizer, &[text])?
            .pop()
            .ok_or_else(|| SentimentError::DataFormat("no prediction produced".into()))
    }

    /// Class probabilities for raw texts, columns ordered as
    /// [`GaussianNb::classes`].
    pub fn predict_proba<S: AsRef<str>>(&self, normalizer: &Normalizer, texts: &[S]) -> Result<Array2<f64>> {
        let documents: Vec<String> = texts.iter().map(|t| normalizer.normalize(t.as_ref())).collect();
        self.classifier.predict_proba(&self.features(&documents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NaiveBayesConfig, VectorizerConfig};
    use crate::text::{Lemmatizer, Lexicon, StopWords};
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn normalizer() -> Normalizer {
        Normalizer::new(Lexicon::new(
            StopWords::new(["the", "was", "a"]),
            Lemmatizer::new(["film", "plot"], HashMap::new()),
        ))
    }

    fn fitted() -> SentimentModel {
        let docs: Vec<String> = ["great film", "great plot", "awful film", "awful plot"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let labels = [Label::Positive, Label::Positive, Label::Negative, Label::Negative];
        let (vectorizer, x) = TfidfVectorizer::fit_transform(&docs, VectorizerConfig::default()).unwrap();
        let classifier = GaussianNb::fit(&x, &labels, NaiveBayesConfig::default()).unwrap();
        SentimentModel::new(vectorizer, classifier).unwrap()
    }

    #[test]
    fn test_predict_raw_text() {
        let model = fitted();
        let normalizer = normalizer();
        assert_eq!(model.predict(&normalizer, "The film was GREAT!").unwrap(), Label::Positive);
        assert_eq!(model.predict(&normalizer, "An awful, awful plot.").unwrap(), Label::Negative);
    }

    #[test]
    fn test_save_and_load_reproduce_predictions() {
        let model = fitted();
        let normalizer = normalizer();
        let dir = TempDir::new().unwrap();
        model.save(dir.path()).unwrap();

        let loaded = SentimentModel::load(dir.path()).unwrap();
        assert_eq!(loaded, model);
        let texts = ["great", "awful film", "", "nothing known here"];
        assert_eq!(
            loaded.predict_batch(&normalizer, &texts).unwrap(),
            model.predict_batch(&normalizer, &texts).unwrap()
        );
    }

    #[test]
    fn test_mismatched_artifacts() {
        let model = fitted();
        let docs = vec!["only".to_string()];
        let other = TfidfVectorizer::fit(&docs, VectorizerConfig::default()).unwrap();
        let result = SentimentModel::new(other, model.classifier().clone());
        assert!(matches!(result, Err(SentimentError::DataFormat(_))));
    }

    #[test]
    fn test_info() {
        let info = fitted().info();
        assert_eq!(info.vocabulary_size, 4);
        assert_eq!(info.classes, vec![Label::Negative, Label::Positive]);
    }
}
