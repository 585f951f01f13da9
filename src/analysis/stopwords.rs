use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::core::error::{Error, ErrorKind, Result};

/// Set-backed stopword detector. The word list is fixed at construction.
#[derive(Debug)]
pub struct StopwordDetector {
    words: HashSet<String>,
}

impl StopwordDetector {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StopwordDetector {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Loads a stopword file: UTF-8 text, one word per line, `#` starts a
    /// comment line, surrounding whitespace is ignored.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|err| {
            Error::new(
                ErrorKind::Io,
                format!("can't open the stopword list at {}: {}", path.display(), err),
            )
        })?;

        let words = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| line.to_lowercase());

        Ok(Self::from_words(words))
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn detects_configured_words() {
        let detector = StopwordDetector::from_words(["is", "the", "a", "like"]);
        assert!(detector.is_stopword("is"));
        assert!(detector.is_stopword("like"));
        assert!(!detector.is_stopword("mercedes"));
    }

    #[test]
    fn loads_from_file_skipping_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# articles").unwrap();
        writeln!(file, "the").unwrap();
        writeln!(file, "  a  ").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "IS").unwrap();

        let detector = StopwordDetector::from_file(file.path()).unwrap();
        assert_eq!(detector.len(), 3);
        assert!(detector.is_stopword("the"));
        assert!(detector.is_stopword("a"));
        assert!(detector.is_stopword("is"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = StopwordDetector::from_file("/nonexistent/stopwords.txt").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Io);
    }
}
