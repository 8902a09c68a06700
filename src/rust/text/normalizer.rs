use log::{debug, info};

use super::lexicon::Lexicon;
use super::loader::{Label, Record};

/// Normalized review texts, index-aligned with their labels.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Corpus {
    documents: Vec<String>,
    labels: Vec<Label>,
}

impl Corpus {
    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Label>) {
        (self.documents, self.labels)
    }
}

/// Turns raw review text into a cleaned, lemmatized, stop-word-free string.
#[derive(Debug, Clone)]
pub struct Normalizer {
    lexicon: Lexicon,
}

impl Normalizer {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Normalizes a single text. Non-letters become spaces before lowercasing
    /// so adjacent words are never merged.
    ///
    /// A token is dropped if either the word itself or its lemma is a stop
    /// word: WordNet knows nouns such as `wa` and `ha`, which would otherwise
    /// let "was" and "has" through.
    pub fn normalize(&self, text: &str) -> String {
        let cleaned: String = text
            .chars()
            .map(|c| if c.is_ascii_alphabetic() { c.to_ascii_lowercase() } else { ' ' })
            .collect();

        let stop_words = &self.lexicon.stop_words;
        cleaned
            .split_whitespace()
            .filter(|token| !stop_words.contains(token))
            .map(|token| self.lexicon.lemmatizer.lemmatize(token))
            .filter(|lemma| !stop_words.contains(lemma))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Normalizes every record. Texts that normalize to nothing stay in the
    /// corpus as empty strings.
    pub fn normalize_records(&self, records: &[Record]) -> Corpus {
        let documents: Vec<String> = records.iter().map(|r| self.normalize(&r.text)).collect();
        let labels = records.iter().map(|r| r.label).collect();

        let empty = documents.iter().filter(|d| d.is_empty()).count();
        if empty > 0 {
            debug!("{} reviews normalized to empty text", empty);
        }
        info!("Normalized {} reviews", documents.len());

        Corpus { documents, labels }
    }
}
