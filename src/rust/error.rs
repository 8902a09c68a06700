use std::fmt;
use std::path::{Path, PathBuf};

use crate::resources::ResourceError;

/// The pipeline stages, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Normalize,
    Vectorize,
    Split,
    Train,
    Evaluate,
    Persist,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Load => "load",
            Self::Normalize => "normalize",
            Self::Vectorize => "vectorize",
            Self::Split => "split",
            Self::Train => "train",
            Self::Evaluate => "evaluate",
            Self::Persist => "persist",
        };
        f.write_str(name)
    }
}

/// Represents the different types of errors that can occur while training
/// or applying the sentiment classifier.
#[derive(Debug, thiserror::Error)]
pub enum SentimentError {
    /// Malformed or missing input data or linguistic resources
    #[error("Data format error: {0}")]
    DataFormat(String),
    /// Degenerate training data
    #[error("Fit error: {0}")]
    Fit(String),
    /// An artifact could not be written or read back
    #[error("Persistence error at {path:?}: {message}")]
    Persistence { path: PathBuf, message: String },
    /// Fetching or verifying lexicon resources failed
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),
    /// Any of the above, tagged with the stage that produced it
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<SentimentError>,
    },
}

impl SentimentError {
    pub(crate) fn persistence(path: &Path, message: impl fmt::Display) -> Self {
        Self::Persistence {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    /// Tags the error with the stage it came from. Already-tagged errors keep
    /// their original stage.
    pub fn in_stage(self, stage: Stage) -> Self {
        match self {
            tagged @ Self::Stage { .. } => tagged,
            other => Self::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// The stage the error was raised in, if it has been tagged.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// The underlying error with any stage tagging removed.
    pub fn root(&self) -> &SentimentError {
        match self {
            Self::Stage { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T, E = SentimentError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_tagging_keeps_first_stage() {
        let err = SentimentError::Fit("single class".into())
            .in_stage(Stage::Train)
            .in_stage(Stage::Persist);
        assert_eq!(err.stage(), Some(Stage::Train));
        assert!(matches!(err.root(), SentimentError::Fit(_)));
        assert_eq!(err.to_string(), "train stage failed: Fit error: single class");
    }

    #[test]
    fn test_untagged_error_has_no_stage() {
        let err = SentimentError::DataFormat("bad".into());
        assert_eq!(err.stage(), None);
        assert!(matches!(err.root(), SentimentError::DataFormat(_)));
    }
}
