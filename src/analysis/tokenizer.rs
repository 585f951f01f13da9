/// Splits corpora into lookup tokens.
///
/// A token is a maximal run of letters and digits; everything else
/// (punctuation, whitespace, symbols) separates tokens and is discarded.
/// Non-ASCII letters such as "ö" or "ş" survive. With `lowercase` set the
/// tokens come out normalized for index lookups.
#[derive(Debug, Clone)]
pub struct CorpusTokenizer {
    pub lowercase: bool,
}

impl Default for CorpusTokenizer {
    fn default() -> Self {
        CorpusTokenizer { lowercase: true }
    }
}

impl CorpusTokenizer {
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let source = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        source
            .split(|c: char| !c.is_alphanumeric())
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect()
    }
}
