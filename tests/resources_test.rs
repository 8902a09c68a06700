mod common;

use std::fs;

use amygdala::{Lexicon, LexiconFile, ResourceError, ResourceManager, SentimentError};
use tempfile::TempDir;

#[test]
fn test_installed_lexicon_loads() -> Result<(), Box<dyn std::error::Error>> {
    common::init_logger();
    let source = TempDir::new()?;
    let cache = TempDir::new()?;
    common::write_lexicon(source.path());

    let manager = ResourceManager::new(cache.path().join("lexicon"))?;
    assert!(!manager.is_installed());
    manager.install_from(source.path())?;
    assert!(manager.is_installed());
    assert!(manager.verify()?);

    let lexicon = Lexicon::load(manager.lexicon_dir())?;
    assert!(lexicon.stop_words.contains("the"));
    assert_eq!(lexicon.lemmatizer.lemmatize("mice"), "mouse");
    Ok(())
}

#[test]
fn test_missing_resource_is_a_data_format_error() -> Result<(), Box<dyn std::error::Error>> {
    let source = TempDir::new()?;
    common::write_lexicon(source.path());
    fs::remove_file(source.path().join(LexiconFile::NounExceptions.relative_path()))?;

    let result = Lexicon::load(source.path());
    assert!(matches!(result, Err(SentimentError::DataFormat(_))));

    let cache = TempDir::new()?;
    let manager = ResourceManager::new(cache.path())?;
    assert!(matches!(
        manager.install_from(source.path()),
        Err(ResourceError::NotInstalled(_))
    ));
    Ok(())
}

#[test]
fn test_corrupted_cache_fails_verification() -> Result<(), Box<dyn std::error::Error>> {
    let source = TempDir::new()?;
    let cache = TempDir::new()?;
    common::write_lexicon(source.path());

    let manager = ResourceManager::new(cache.path())?;
    manager.install_from(source.path())?;
    fs::write(manager.get_resource_path(LexiconFile::StopWords), "tampered\n")?;
    assert!(!manager.verify()?);
    Ok(())
}

#[tokio::test]
async fn test_ensure_downloaded_skips_verified_cache() -> Result<(), Box<dyn std::error::Error>> {
    let source = TempDir::new()?;
    let cache = TempDir::new()?;
    common::write_lexicon(source.path());

    let manager = ResourceManager::new(cache.path())?;
    manager.install_from(source.path())?;

    // The URL is never contacted because the cache verifies
    manager.ensure_downloaded("http://127.0.0.1:9/unreachable").await?;
    assert!(manager.verify()?);
    Ok(())
}

#[tokio::test]
async fn test_failed_download_leaves_no_partial_lexicon() -> Result<(), Box<dyn std::error::Error>> {
    let cache = TempDir::new()?;
    let manager = ResourceManager::new(cache.path())?;

    let result = manager.download("http://127.0.0.1:9/unreachable").await;
    assert!(matches!(result, Err(ResourceError::DownloadError(_))));
    assert!(!manager.is_installed());
    Ok(())
}
