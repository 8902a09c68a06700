use std::fs::File;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SentimentError};

/// Binary sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Label {
    Negative,
    Positive,
}

impl Label {
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Negative => 0,
            Self::Positive => 1,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Negative),
            1 => Some(Self::Positive),
            _ => None,
        }
    }

    /// Index of the label in `[Negative, Positive]` ordering.
    pub fn index(self) -> usize {
        self.as_u8() as usize
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negative => f.write_str("negative"),
            Self::Positive => f.write_str("positive"),
        }
    }
}

/// One labeled review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub text: String,
    pub label: Label,
}

impl Record {
    pub fn new(text: impl Into<String>, label: Label) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

/// Names of the header columns holding the review text and its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSchema {
    pub text_column: String,
    pub label_column: String,
}

impl Default for ReviewSchema {
    fn default() -> Self {
        Self {
            text_column: "Review".to_string(),
            label_column: "Liked".to_string(),
        }
    }
}

impl ReviewSchema {
    pub fn new(text_column: impl Into<String>, label_column: impl Into<String>) -> Self {
        Self {
            text_column: text_column.into(),
            label_column: label_column.into(),
        }
    }
}

/// Reads a tab-separated review file. Quotation marks inside the text are
/// literal characters, never field delimiters.
pub fn load_records<P: AsRef<Path>>(path: P, schema: &ReviewSchema) -> Result<Vec<Record>> {
    let path = path.as_ref();
    info!("Loading reviews from {:?}", path);

    let file = File::open(path)
        .map_err(|e| SentimentError::DataFormat(format!("cannot open {:?}: {}", path, e)))?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| SentimentError::DataFormat(format!("cannot read header of {:?}: {}", path, e)))?
        .clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| {
                SentimentError::DataFormat(format!(
                    "column '{}' not found in {:?} (header: {:?})",
                    name,
                    path,
                    headers.iter().collect::<Vec<_>>()
                ))
            })
    };
    let text_idx = column(&schema.text_column)?;
    let label_idx = column(&schema.label_column)?;
    debug!("Text column at {}, label column at {}", text_idx, label_idx);

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| SentimentError::DataFormat(format!("{:?}: {}", path, e)))?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();

        if row.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let (Some(text), Some(raw_label)) = (row.get(text_idx), row.get(label_idx)) else {
            return Err(SentimentError::DataFormat(format!(
                "line {} of {:?} has {} fields, expected at least {}",
                line,
                path,
                row.len(),
                text_idx.max(label_idx) + 1
            )));
        };

        let label = raw_label
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(Label::from_u8)
            .ok_or_else(|| {
                SentimentError::DataFormat(format!(
                    "line {} of {:?}: label '{}' is not 0 or 1",
                    line, path, raw_label
                ))
            })?;

        records.push(Record::new(text, label));
    }

    info!("Loaded {} reviews", records.len());
    Ok(records)
}
