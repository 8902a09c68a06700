use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use log::info;

use crate::error::{Result, SentimentError};
use crate::resources::LexiconFile;

/// WordNet noun detachment rules, tried in order.
const NOUN_RULES: [(&str, &str); 9] = [
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

/// Set of words dropped during normalization.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses a one-word-per-line list. Blank lines are ignored.
    pub fn parse(contents: &str) -> Self {
        Self::new(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_lowercase),
        )
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Noun lemmatizer backed by a WordNet lemma index and exception list.
#[derive(Debug, Clone, Default)]
pub struct Lemmatizer {
    lemmas: HashSet<String>,
    exceptions: HashMap<String, Vec<String>>,
}

impl Lemmatizer {
    pub fn new<I, S>(lemmas: I, exceptions: HashMap<String, Vec<String>>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lemmas: lemmas.into_iter().map(Into::into).collect(),
            exceptions,
        }
    }

    /// Parses a WordNet `index.*` file (license header lines start with a
    /// space) and the matching `*.exc` exception file.
    pub fn parse(index: &str, exceptions: &str) -> Self {
        let lemmas = index
            .lines()
            .filter(|line| !line.starts_with(' '))
            .filter_map(|line| line.split_whitespace().next())
            .map(str::to_string);

        let exceptions = exceptions
            .lines()
            .filter_map(|line| {
                let mut fields = line.split_whitespace();
                let inflected = fields.next()?;
                let bases: Vec<String> = fields.map(str::to_string).collect();
                (!bases.is_empty()).then(|| (inflected.to_string(), bases))
            })
            .collect();

        Self::new(lemmas, exceptions)
    }

    pub fn len(&self) -> usize {
        self.lemmas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lemmas.is_empty()
    }

    fn is_lemma(&self, candidate: &str) -> bool {
        !candidate.is_empty()
            && candidate.bytes().all(|b| b.is_ascii_lowercase())
            && self.lemmas.contains(candidate)
    }

    /// Reduces a lowercase word to its noun root form. Known lemmas are
    /// returned unchanged, which keeps the operation idempotent.
    pub fn lemmatize(&self, word: &str) -> String {
        if self.is_lemma(word) {
            return word.to_string();
        }

        if let Some(bases) = self.exceptions.get(word) {
            if let Some(base) = bases.iter().find(|base| self.is_lemma(base)) {
                return base.clone();
            }
        }

        NOUN_RULES
            .iter()
            .filter_map(|(suffix, ending)| {
                word.strip_suffix(suffix)
                    .map(|stem| format!("{}{}", stem, ending))
            })
            .find(|candidate| self.is_lemma(candidate))
            .unwrap_or_else(|| word.to_string())
    }
}

/// The two linguistic resources the normalizer depends on.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    pub stop_words: StopWords,
    pub lemmatizer: Lemmatizer,
}

impl Lexicon {
    pub fn new(stop_words: StopWords, lemmatizer: Lemmatizer) -> Self {
        Self {
            stop_words,
            lemmatizer,
        }
    }

    /// Loads the lexicon from a directory laid out like the resource cache.
    /// Missing or empty files are a data format error.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let read = |file: LexiconFile| -> Result<String> {
            let path = dir.join(file.relative_path());
            let contents = fs::read_to_string(&path).map_err(|e| {
                SentimentError::DataFormat(format!("lexicon file {:?} unavailable: {}", path, e))
            })?;
            if contents.trim().is_empty() {
                return Err(SentimentError::DataFormat(format!("lexicon file {:?} is empty", path)));
            }
            Ok(contents)
        };

        let stop_words = StopWords::parse(&read(LexiconFile::StopWords)?);
        let lemmatizer = Lemmatizer::parse(
            &read(LexiconFile::NounIndex)?,
            &read(LexiconFile::NounExceptions)?,
        );
        if lemmatizer.is_empty() {
            return Err(SentimentError::DataFormat(format!(
                "no lemmas found in {:?}",
                dir.join(LexiconFile::NounIndex.relative_path())
            )));
        }

        info!(
            "Loaded lexicon from {:?}: {} stop words, {} lemmas",
            dir,
            stop_words.len(),
            lemmatizer.len()
        );
        Ok(Self::new(stop_words, lemmatizer))
    }
}
