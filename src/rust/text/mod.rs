//! Reading reviews and turning them into normalized text.

pub mod lexicon;
pub mod loader;
pub mod normalizer;

pub use lexicon::{Lemmatizer, Lexicon, StopWords};
pub use loader::{load_records, Label, Record, ReviewSchema};
pub use normalizer::{Corpus, Normalizer};
