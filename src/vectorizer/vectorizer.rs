use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::analysis::stopwords::StopwordDetector;
use crate::analysis::tokenizer::CorpusTokenizer;
use crate::core::config::{Config, WeightStrategy};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::vector::{compute_centroid, compute_weighted_centroid, Vector};
use crate::extensions::lookup::ExtensionLookup;
use crate::extensions::storer::Vectorizes;
use crate::index::VectorIndex;
use crate::splitting::splitter::CompoundSplitter;
use crate::vectorizer::cache::{CachedVector, VectorCache};
use crate::vectorizer::expression::Evaluator;
use crate::vectorizer::weights::weights_for_occurrences;

/// Provenance of one contribution to a corpus vector. Carried for
/// debugging; not authoritative.
#[derive(Debug, Clone, PartialEq)]
pub struct InputElement {
    pub concept: String,
    pub occurrence: u64,
    pub weight: f32,
}

/// Turns free-text corpora into vectors.
///
/// Per corpus: tokenize, greedily collapse neighboring tokens into known
/// underscore-compounds, resolve each unit (extension overlay first, then
/// the base index, then compound splitting), weight by occurrence, and
/// assemble the weighted centroid. Corpus vectors are averaged with equal
/// weight into the final result.
///
/// Reentrant; shared freely across request threads.
pub struct Vectorizer {
    index: Arc<dyn VectorIndex>,
    stopwords: Arc<StopwordDetector>,
    extensions: Option<Arc<ExtensionLookup>>,
    splitter: Box<dyn CompoundSplitter>,
    cache: VectorCache,
    tokenizer: CorpusTokenizer,
    weight_strategy: WeightStrategy,
    linear_factor: f32,
    max_compound_word_length: usize,
}

impl Vectorizer {
    pub fn new(
        index: Arc<dyn VectorIndex>,
        stopwords: Arc<StopwordDetector>,
        extensions: Option<Arc<ExtensionLookup>>,
        splitter: Box<dyn CompoundSplitter>,
        config: &Config,
    ) -> Self {
        Vectorizer {
            index,
            stopwords,
            extensions,
            splitter,
            cache: VectorCache::new(config.max_vector_cache_size),
            tokenizer: CorpusTokenizer::default(),
            weight_strategy: config.occurrence_weight_strategy,
            linear_factor: config.occurrence_weight_linear_factor,
            max_compound_word_length: config.max_compound_word_length,
        }
    }

    /// Vector for a set of corpora: the equal-weight mean of the per-corpus
    /// vectors. Fails with `NoUsableWords` when every token in every corpus
    /// was a stopword or unknown.
    pub fn vector_for_corpi(
        &self,
        corpi: &[String],
        overrides: &HashMap<String, String>,
    ) -> Result<(Vector, Vec<InputElement>)> {
        let mut corpus_vectors = Vec::new();
        let mut sources = Vec::new();

        for (position, corpus) in corpi.iter().enumerate() {
            let tokens = self.tokenizer.tokenize(corpus);
            if tokens.is_empty() {
                continue;
            }

            let resolved = self
                .vector_for_tokens(&tokens, overrides)
                .map_err(|err| Error::new(err.kind, format!("at corpus {}: {}", position, err.context)))?;

            if let Some((vector, elements)) = resolved {
                corpus_vectors.push(vector);
                sources.extend(elements);
            }
        }

        if corpus_vectors.is_empty() {
            return Err(Error::new(
                ErrorKind::NoUsableWords,
                "all words in corpus were either stopwords or not present in the \
                 contextionary, cannot build vector",
            ));
        }

        let centroid = compute_centroid(&corpus_vectors)?;
        Ok((centroid, sources))
    }

    fn vector_for_tokens(
        &self,
        tokens: &[String],
        overrides: &HashMap<String, String>,
    ) -> Result<Option<(Vector, Vec<InputElement>)>> {
        let mut vectors = Vec::new();
        let mut occurrences = Vec::new();
        let mut concepts = Vec::new();

        let max_extra = self.max_compound_word_length.saturating_sub(1);

        let mut position = 0;
        while position < tokens.len() {
            let mut matched = None;

            // widest window first: a compound hit swallows its tokens
            for extra in (0..=max_extra).rev() {
                if position + extra >= tokens.len() {
                    continue;
                }

                let concept = tokens[position..=position + extra].join("_");
                if let Some(resolved) = self.vector_for_word(&concept)? {
                    matched = Some((extra, concept, resolved));
                    break;
                }
            }

            match matched {
                Some((extra, concept, resolved)) => {
                    vectors.push(resolved.vector);
                    occurrences.push(resolved.occurrence);
                    concepts.push(concept);
                    position += extra + 1;
                }
                None => position += 1,
            }
        }

        if vectors.is_empty() {
            return Ok(None);
        }

        let mut weights =
            weights_for_occurrences(&occurrences, self.weight_strategy, self.linear_factor);

        for (at, concept) in concepts.iter().enumerate() {
            if let Some(expression) = overrides.get(concept) {
                weights[at] = Evaluator::new(expression, weights[at]).evaluate()?;
            }
        }

        let centroid = compute_weighted_centroid(&vectors, &weights)?;

        let elements = concepts
            .into_iter()
            .zip(occurrences)
            .zip(weights)
            .map(|((concept, occurrence), weight)| InputElement {
                concept,
                occurrence,
                weight,
            })
            .collect();

        Ok(Some((centroid, elements)))
    }

    /// Resolves a single lookup key, consulting in order: the extension
    /// overlay, the stopword list (which vetoes), the cache, the base
    /// index, and finally the compound splitter.
    pub fn vector_for_word(&self, word: &str) -> Result<Option<CachedVector>> {
        if let Some(extensions) = &self.extensions {
            if let Some(extension) = extensions.lookup(word) {
                return Ok(Some(CachedVector {
                    vector: Vector::new(extension.vector),
                    occurrence: extension.occurrence,
                    source: vec![extension.concept],
                }));
            }
        }

        if self.stopwords.is_stopword(word) {
            return Ok(None);
        }

        self.cache.purge_if_over_limit();
        if let Some(cached) = self.cache.get(word) {
            return Ok(Some(cached));
        }

        if let Some(item) = self.index.word_to_index(word) {
            let resolved = CachedVector {
                vector: self.index.vector_for_index(item)?,
                occurrence: self.index.index_to_occurrence(item)?,
                source: vec![word.to_string()],
            };
            self.cache.insert(word, resolved.clone());
            return Ok(Some(resolved));
        }

        let pieces = self.splitter.split(word);
        if pieces.is_empty() {
            return Ok(None);
        }

        self.vector_for_split_pieces(word, pieces)
    }

    /// Joins the vectors of a compound split. Every piece must be in the
    /// base vocabulary; a partial resolution means the splitter dictionary
    /// drifted from the vocabulary and the word stays unresolved.
    fn vector_for_split_pieces(
        &self,
        word: &str,
        pieces: Vec<String>,
    ) -> Result<Option<CachedVector>> {
        let mut vectors = Vec::with_capacity(pieces.len());
        let mut occurrence_sum = 0u64;

        for piece in &pieces {
            let Some(item) = self.index.word_to_index(piece) else {
                warn!(
                    word,
                    piece = piece.as_str(),
                    "compound split piece is missing from the vocabulary, the splitter \
                     dictionary has drifted"
                );
                return Ok(None);
            };

            vectors.push(self.index.vector_for_index(item)?);
            occurrence_sum += self.index.index_to_occurrence(item)?;
        }

        let resolved = CachedVector {
            vector: compute_centroid(&vectors)?,
            occurrence: occurrence_sum / pieces.len() as u64,
            source: pieces,
        };

        self.cache.insert(word, resolved.clone());
        Ok(Some(resolved))
    }

    #[cfg(test)]
    pub(crate) fn cache_len(&self) -> usize {
        self.cache.len()
    }
}

impl Vectorizes for Vectorizer {
    fn corpi(&self, corpi: &[String]) -> Result<Vector> {
        let (vector, _) = self.vector_for_corpi(corpi, &HashMap::new())?;
        Ok(vector)
    }
}
