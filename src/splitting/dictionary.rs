use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::core::error::{Error, ErrorKind, Result};

/// Vocabulary the compound splitter works against, plus the scoring that
/// picks between competing splits of the same word.
pub trait SplitterDict: Send + Sync {
    /// Rates a candidate phrase. When a compound word can be split into
    /// several phrases, the highest-scoring one wins.
    fn score(&self, phrase: &[String]) -> f64;

    /// True if the word is part of the dictionary.
    fn contains(&self, word: &str) -> bool;
}

/// Dictionary backed by a preprocessed `word,occurrence` file, one entry
/// per line. The occurrences are kept around for scoring experiments even
/// though the default scorer only looks at lengths.
#[derive(Debug)]
pub struct FileDict {
    entries: HashMap<String, u64>,
}

impl FileDict {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|err| {
            Error::new(
                ErrorKind::Io,
                format!("can't open the splitter dictionary at {}: {}", path.display(), err),
            )
        })?;

        let mut entries = HashMap::new();
        for (number, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let (word, occurrence) = line.split_once(',').ok_or_else(|| {
                Error::new(
                    ErrorKind::CorruptIndex,
                    format!("dictionary line {} has no occurrence: '{}'", number + 1, line),
                )
            })?;

            let occurrence: u64 = occurrence.trim().parse().map_err(|err| {
                Error::new(
                    ErrorKind::CorruptIndex,
                    format!("dictionary line {}: bad occurrence: {}", number + 1, err),
                )
            })?;

            entries.insert(word.to_string(), occurrence);
        }

        Ok(FileDict { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SplitterDict for FileDict {
    /// Prefers long and few words: splits sharing most of their characters
    /// with the compound tend to stay closest to its meaning.
    fn score(&self, phrase: &[String]) -> f64 {
        let mut length_score: usize = phrase.iter().map(|word| word.len()).sum();

        // boost for fewer words
        if phrase.len() == 2 {
            length_score += 3;
        }
        if phrase.len() == 3 {
            length_score += 1;
        }

        length_score as f64
    }

    fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }
}

/// Dictionary with explicit per-word scores, for tests.
pub struct MapDict {
    scores: HashMap<String, f64>,
}

impl MapDict {
    pub fn new<I, S>(scores: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        MapDict {
            scores: scores.into_iter().map(|(word, score)| (word.into(), score)).collect(),
        }
    }
}

impl SplitterDict for MapDict {
    fn score(&self, phrase: &[String]) -> f64 {
        phrase
            .iter()
            .map(|word| self.scores.get(word).copied().unwrap_or(0.0))
            .sum()
    }

    fn contains(&self, word: &str) -> bool {
        self.scores.contains_key(word)
    }
}
