use std::env;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use crate::error::SentimentError;
use crate::model::persistence::write_atomic;
use crate::text::Lexicon;

/// Environment variable that overrides the cache root.
pub const CACHE_ENV_VAR: &str = "AMYGDALA_CACHE";

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("Lexicon resource not installed: {0}")]
    NotInstalled(String),
    #[error("Download error: {0}")]
    DownloadError(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Verification failed for {0}")]
    VerificationFailed(String),
    #[error("Hash mismatch: expected {expected}, got {actual} for {file}")]
    HashMismatch {
        file: String,
        expected: String,
        actual: String,
    },
}

/// The files that make up a lexicon directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexiconFile {
    /// English stop words, one per line
    StopWords,
    /// WordNet noun lemma index
    NounIndex,
    /// WordNet noun exception list
    NounExceptions,
}

impl LexiconFile {
    pub const ALL: [LexiconFile; 3] = [
        LexiconFile::StopWords,
        LexiconFile::NounIndex,
        LexiconFile::NounExceptions,
    ];

    /// Path of the file relative to the lexicon directory, also used as the
    /// URL suffix when downloading.
    pub fn relative_path(&self) -> &'static str {
        match self {
            Self::StopWords => "stopwords/english",
            Self::NounIndex => "wordnet/index.noun",
            Self::NounExceptions => "wordnet/noun.exc",
        }
    }
}

/// Owns the on-disk lexicon cache: installs, downloads and verifies the stop
/// word list and lemmatization files the normalizer needs.
#[derive(Clone)]
pub struct ResourceManager {
    lexicon_dir: PathBuf,
    download_lock: Arc<Mutex<()>>,
}

impl ResourceManager {
    /// Creates a new ResourceManager with the default lexicon directory
    pub fn new_default() -> io::Result<Self> {
        Self::new(Self::get_default_lexicon_dir())
    }

    /// Returns the default lexicon directory path
    pub fn get_default_lexicon_dir() -> PathBuf {
        Self::lexicon_dir_under(env::var_os(CACHE_ENV_VAR))
    }

    fn lexicon_dir_under(cache_root: Option<OsString>) -> PathBuf {
        if let Some(path) = cache_root {
            return PathBuf::from(path).join("lexicon");
        }

        if let Some(cache_dir) = dirs::cache_dir() {
            return cache_dir.join("amygdala").join("lexicon");
        }

        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(".cache").join("amygdala").join("lexicon");
        }

        env::temp_dir().join("amygdala").join("lexicon")
    }

    pub fn new<P: AsRef<Path>>(lexicon_dir: P) -> io::Result<Self> {
        let lexicon_dir = lexicon_dir.as_ref().to_path_buf();
        fs::create_dir_all(&lexicon_dir)?;
        Ok(Self {
            lexicon_dir,
            download_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn lexicon_dir(&self) -> &Path {
        &self.lexicon_dir
    }

    pub fn get_resource_path(&self, file: LexiconFile) -> PathBuf {
        self.lexicon_dir.join(file.relative_path())
    }

    fn checksum_path(&self, file: LexiconFile) -> PathBuf {
        let mut name = self.get_resource_path(file).into_os_string();
        name.push(".sha256");
        PathBuf::from(name)
    }

    pub fn is_installed(&self) -> bool {
        LexiconFile::ALL.iter().all(|&file| {
            let path = self.get_resource_path(file);
            log::debug!("  {:?} (exists: {})", path, path.exists());
            path.exists()
        })
    }

    /// Copies the lexicon files from a local directory laid out like the cache.
    pub fn install_from<P: AsRef<Path>>(&self, source_dir: P) -> Result<(), ResourceError> {
        let source_dir = source_dir.as_ref();
        log::info!("Installing lexicon from {:?} into {:?}", source_dir, self.lexicon_dir);

        for file in LexiconFile::ALL {
            let source = source_dir.join(file.relative_path());
            if !source.exists() {
                return Err(ResourceError::NotInstalled(format!(
                    "{} is missing from {:?}",
                    file.relative_path(),
                    source_dir
                )));
            }
            let bytes = fs::read(&source)?;
            self.store(file, &bytes)?;
        }

        log::info!("Lexicon installed");
        Ok(())
    }

    /// Downloads every lexicon file from `base_url`, which must serve the
    /// files under their relative paths (e.g. `<base_url>/wordnet/noun.exc`).
    pub async fn download(&self, base_url: &str) -> Result<(), ResourceError> {
        let _lock = self.download_lock.lock().await;
        let base_url = base_url.trim_end_matches('/');

        for file in LexiconFile::ALL {
            let url = format!("{}/{}", base_url, file.relative_path());
            if let Err(e) = self.download_file(&url, file).await {
                log::error!("Failed to download {}: {}", file.relative_path(), e);
                let _ = self.remove();
                return Err(e);
            }
        }

        log::info!("Lexicon ready to use");
        Ok(())
    }

    async fn download_file(&self, url: &str, file: LexiconFile) -> Result<(), ResourceError> {
        log::info!("Downloading {} from {}", file.relative_path(), url);
        let response = reqwest::get(url).await?.error_for_status()?;
        let bytes = response.bytes().await?;
        log::info!("Downloaded {} bytes", bytes.len());

        if bytes.is_empty() {
            return Err(ResourceError::VerificationFailed(format!(
                "{} (empty response)",
                file.relative_path()
            )));
        }

        self.store(file, &bytes)?;
        if !self.verify_file(file)? {
            return Err(ResourceError::VerificationFailed(file.relative_path().to_string()));
        }
        Ok(())
    }

    fn store(&self, file: LexiconFile, bytes: &[u8]) -> Result<(), ResourceError> {
        let path = self.get_resource_path(file);
        log::debug!("Writing {} bytes to {:?}", bytes.len(), path);
        write_atomic(&path, bytes)?;
        write_atomic(&self.checksum_path(file), sha256_hex(bytes).as_bytes())?;
        Ok(())
    }

    fn verify_file(&self, file: LexiconFile) -> Result<bool, ResourceError> {
        let path = self.get_resource_path(file);
        let checksum_path = self.checksum_path(file);
        if !path.exists() || !checksum_path.exists() {
            return Ok(false);
        }

        let expected = fs::read_to_string(&checksum_path)?.trim().to_string();
        let actual = sha256_hex(&fs::read(&path)?);
        log::debug!("{}: expected {}, got {}", file.relative_path(), expected, actual);
        Ok(actual == expected)
    }

    /// Recomputes the hash of every installed file and compares it with the
    /// checksum recorded at install time.
    pub fn verify(&self) -> Result<bool, ResourceError> {
        for file in LexiconFile::ALL {
            if !self.verify_file(file)? {
                log::warn!("Lexicon file {} failed verification", file.relative_path());
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Checks a specific file against an externally published hash.
    pub fn verify_against(&self, file: LexiconFile, expected: &str) -> Result<(), ResourceError> {
        let actual = sha256_hex(&fs::read(self.get_resource_path(file))?);
        if actual != expected {
            return Err(ResourceError::HashMismatch {
                file: file.relative_path().to_string(),
                expected: expected.to_string(),
                actual,
            });
        }
        Ok(())
    }

    pub fn remove(&self) -> Result<(), ResourceError> {
        for file in LexiconFile::ALL {
            for path in [self.get_resource_path(file), self.checksum_path(file)] {
                if path.exists() {
                    fs::remove_file(&path)?;
                }
            }
        }
        Ok(())
    }

    /// Loads the cached lexicon after checking every file against the hash
    /// recorded when it was installed.
    pub fn load_lexicon(&self) -> crate::error::Result<Lexicon> {
        if !self.verify()? {
            return Err(SentimentError::DataFormat(format!(
                "lexicon in {:?} is missing or failed verification",
                self.lexicon_dir
            )));
        }
        Lexicon::load(&self.lexicon_dir)
    }

    /// Downloads the lexicon unless a verified copy is already cached.
    pub async fn ensure_downloaded(&self, base_url: &str) -> Result<(), ResourceError> {
        if self.is_installed() && self.verify()? {
            log::info!("Lexicon verification successful");
            return Ok(());
        }
        log::info!("Lexicon missing or corrupt, downloading...");
        self.remove()?;
        self.download(base_url).await
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_source(dir: &Path) {
        for (file, contents) in [
            (LexiconFile::StopWords, "the\nis\n"),
            (LexiconFile::NounIndex, "movie n 1 0 1 0 01234567\n"),
            (LexiconFile::NounExceptions, "mice mouse\n"),
        ] {
            let path = dir.join(file.relative_path());
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }
    }

    #[test]
    fn test_install_and_verify() -> Result<(), ResourceError> {
        let source = TempDir::new()?;
        let cache = TempDir::new()?;
        write_source(source.path());

        let manager = ResourceManager::new(cache.path())?;
        assert!(!manager.is_installed());
        assert!(!manager.verify()?);

        manager.install_from(source.path())?;
        assert!(manager.is_installed());
        assert!(manager.verify()?);

        // Corrupt a file and verify
        fs::write(manager.get_resource_path(LexiconFile::NounExceptions), "corrupted data")?;
        assert!(!manager.verify()?);

        manager.remove()?;
        assert!(!manager.is_installed());
        Ok(())
    }

    #[test]
    fn test_install_from_incomplete_source() -> Result<(), ResourceError> {
        let source = TempDir::new()?;
        let cache = TempDir::new()?;
        let manager = ResourceManager::new(cache.path())?;

        let result = manager.install_from(source.path());
        assert!(matches!(result, Err(ResourceError::NotInstalled(_))));
        Ok(())
    }

    #[test]
    fn test_verify_against_published_hash() -> Result<(), ResourceError> {
        let source = TempDir::new()?;
        let cache = TempDir::new()?;
        write_source(source.path());
        let manager = ResourceManager::new(cache.path())?;
        manager.install_from(source.path())?;

        let expected = sha256_hex(b"the\nis\n");
        manager.verify_against(LexiconFile::StopWords, &expected)?;
        let result = manager.verify_against(LexiconFile::StopWords, "deadbeef");
        assert!(matches!(result, Err(ResourceError::HashMismatch { .. })));
        Ok(())
    }

    #[test]
    fn test_default_lexicon_dir() {
        let path = ResourceManager::lexicon_dir_under(Some("/tmp/test-amygdala-cache".into()));
        assert_eq!(path, PathBuf::from("/tmp/test-amygdala-cache/lexicon"));

        let path = ResourceManager::lexicon_dir_under(None);
        assert!(path.ends_with("amygdala/lexicon"));
    }

    #[test]
    fn test_load_lexicon_checks_hashes() -> Result<(), ResourceError> {
        let source = TempDir::new()?;
        let cache = TempDir::new()?;
        write_source(source.path());
        let manager = ResourceManager::new(cache.path())?;

        assert!(matches!(manager.load_lexicon(), Err(SentimentError::DataFormat(_))));

        manager.install_from(source.path())?;
        let lexicon = manager.load_lexicon().unwrap();
        assert!(lexicon.stop_words.contains("the"));

        fs::write(manager.get_resource_path(LexiconFile::StopWords), "tampered\n")?;
        assert!(matches!(manager.load_lexicon(), Err(SentimentError::DataFormat(_))));
        Ok(())
    }

    #[test]
    fn test_load_lexicon_surfaces_cache_io_errors() -> Result<(), ResourceError> {
        let source = TempDir::new()?;
        let cache = TempDir::new()?;
        write_source(source.path());
        let manager = ResourceManager::new(cache.path())?;
        manager.install_from(source.path())?;

        let checksum = manager.checksum_path(LexiconFile::NounIndex);
        fs::remove_file(&checksum)?;
        fs::create_dir(&checksum)?;

        let err = manager.load_lexicon().unwrap_err();
        assert!(matches!(
            err,
            SentimentError::Resource(ResourceError::IoError(_))
        ));
        Ok(())
    }

    #[test]
    fn test_resource_paths() -> io::Result<()> {
        let cache = TempDir::new()?;
        let manager = ResourceManager::new(cache.path())?;
        assert!(manager
            .get_resource_path(LexiconFile::NounIndex)
            .ends_with("wordnet/index.noun"));
        assert!(manager
            .checksum_path(LexiconFile::StopWords)
            .ends_with("stopwords/english.sha256"));
        Ok(())
    }
}
