use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use log::info;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use super::naive_bayes::GaussianNb;
use super::vectorizer::TfidfVectorizer;
use crate::error::{Result, SentimentError};

/// A fitted object that is persisted as its own file.
pub trait Artifact: Serialize + DeserializeOwned {
    /// File name inside the artifact directory
    const FILE_NAME: &'static str;
}

impl Artifact for TfidfVectorizer {
    const FILE_NAME: &'static str = "tfidf_vectorizer.json";
}

impl Artifact for GaussianNb {
    const FILE_NAME: &'static str = "classifier.json";
}

/// Writes `bytes` to a temporary file next to `path` and renames it over
/// `path`, so readers only ever see the old file or the complete new one.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Serializes one artifact to `path` atomically.
pub fn save_artifact<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let bytes = serde_json::to_vec(value).map_err(|e| SentimentError::persistence(path, e))?;
    write_atomic(path, &bytes).map_err(|e| SentimentError::persistence(path, e))?;
    info!("Saved {} bytes to {:?}", bytes.len(), path);
    Ok(())
}

/// Reads one artifact back from `path`.
pub fn load_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|e| SentimentError::persistence(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| SentimentError::persistence(path, e))
}

/// Directory holding the fitted vectorizer and classifier.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of<T: Artifact>(&self) -> PathBuf {
        self.dir.join(T::FILE_NAME)
    }

    pub fn save<T: Artifact>(&self, artifact: &T) -> Result<PathBuf> {
        let path = self.path_of::<T>();
        save_artifact(artifact, &path)?;
        Ok(path)
    }

    pub fn load<T: Artifact>(&self) -> Result<T> {
        load_artifact(&self.path_of::<T>())
    }
}
