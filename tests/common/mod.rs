#![allow(dead_code)]

use std::fs;
use std::path::Path;

use amygdala::{Label, LexiconFile, Record};
use env_logger::{Builder, Env};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

pub const STOP_WORDS: &str = "i\nme\nmy\nwe\nthe\na\nan\nand\nis\nwas\nit\nthis\nthat\nof\nto\nin\nfor\non\nwith\nbut\nnot\nvery\nso\nat\nbe\nare\nwere\nhas\nhis\ndoes\n";

pub const NOUN_INDEX: &str = "  1 This software and database is being provided to you, the LICENSEE, by\n  2 Princeton University under the following license.\n\
movie n 1 1 @ 1 0 06613686\n\
film n 1 1 @ 1 0 06262567\n\
actor n 1 1 @ 1 0 09765278\n\
plot n 1 1 @ 1 0 06326797\n\
story n 1 1 @ 1 0 06369829\n\
scene n 1 1 @ 1 0 06876309\n\
character n 1 1 @ 1 0 09587565\n\
ending n 1 1 @ 1 0 07291312\n\
mouse n 2 2 @ ~ 2 0 02330245 03793489\n\
wife n 1 1 @ 1 0 10780632\n\
wa n 1 1 @ 1 0 09147437\n\
ha n 1 1 @ 1 0 13662703\n\
hi n 1 1 @ 1 0 09051837\n\
doe n 1 1 @ 1 0 02415971\n";

pub const NOUN_EXCEPTIONS: &str = "mice mouse\nwives wife\n";

const POSITIVE: &[&str] = &[
    "wonderful", "brilliant", "loved", "excellent", "moving", "superb", "charming", "great",
];
const NEGATIVE: &[&str] = &[
    "awful", "boring", "terrible", "waste", "dull", "horrible", "poor", "worst",
];
const NEUTRAL: &[&str] = &[
    "movie", "films", "actors", "plot", "stories", "scenes", "characters", "ending", "the", "was",
    "and", "it", "this",
];
const NOISE: &[&str] = &["!", "...", "\"", "10/10", "(really)", "--", "?", ",", "2023"];

pub fn init_logger() {
    let _ = Builder::from_env(Env::default().default_filter_or("warn")).try_init();
}

/// Writes a small WordNet-style lexicon into `dir`.
pub fn write_lexicon(dir: &Path) {
    for (file, contents) in [
        (LexiconFile::StopWords, STOP_WORDS),
        (LexiconFile::NounIndex, NOUN_INDEX),
        (LexiconFile::NounExceptions, NOUN_EXCEPTIONS),
    ] {
        let path = dir.join(file.relative_path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }
}

/// `n` reviews alternating positive and negative, reproducible from `seed`.
pub fn synthetic_reviews(n: usize, seed: u64) -> Vec<Record> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let (label, cue) = if i % 2 == 0 {
                (Label::Positive, POSITIVE)
            } else {
                (Label::Negative, NEGATIVE)
            };
            let mut words: Vec<&str> = Vec::new();
            for _ in 0..rng.gen_range(2..4) {
                words.push(cue.choose(&mut rng).unwrap());
            }
            for _ in 0..rng.gen_range(3..7) {
                words.push(NEUTRAL.choose(&mut rng).unwrap());
            }
            if rng.gen_bool(0.3) {
                words.push(NOISE.choose(&mut rng).unwrap());
            }
            words.shuffle(&mut rng);
            Record::new(words.join(" "), label)
        })
        .collect()
}

/// Writes records as a TSV file with the default header.
pub fn write_tsv(path: &Path, records: &[Record]) {
    let mut contents = String::from("Review\tLiked\n");
    for record in records {
        contents.push_str(&format!("{}\t{}\n", record.text, record.label.as_u8()));
    }
    fs::write(path, contents).unwrap();
}
