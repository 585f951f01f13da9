use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use rayon::prelude::*;
use tracing::info;

use crate::analysis::stopwords::StopwordDetector;
use crate::core::config::Config;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::vector::Vector;
use crate::extensions::extension::ExtensionInput;
use crate::extensions::lookup::{ExtensionLookup, ExtensionStorer, ExtensionWatcher};
use crate::extensions::storer::Storer;
use crate::index::combined::CombinedIndex;
use crate::index::memory::MemoryIndex;
use crate::index::mmapped::MmappedIndex;
use crate::index::similar::{safe_similar_words, safe_similar_words_with_certainty};
use crate::index::VectorIndex;
use crate::schema::centroids::build_memory_index_from_schema;
use crate::schema::model::Schema;
use crate::schema::params::SearchParams;
use crate::schema::search::{schema_search, SearchResults};
use crate::splitting::dictionary::FileDict;
use crate::splitting::noop::NoopSplitter;
use crate::splitting::splitter::{CompoundSplitter, Splitter};
use crate::vectorizer::vectorizer::{InputElement, Vectorizer};

#[derive(Debug, Clone, PartialEq)]
pub struct Meta {
    pub version: String,
    pub word_count: usize,
}

/// One query of a nearest-neighbor batch.
#[derive(Debug, Clone)]
pub struct NearestParams {
    pub vector: Vector,
    pub n: usize,
    pub k: usize,
}

/// The service core: owns the loaded indices, the vectorizer, and the
/// extension overlay, and exposes every operation the transport layer
/// forwards.
///
/// The combined index is replaced wholesale on schema changes; readers
/// grab an `Arc` snapshot per request and never see a torn view.
pub struct Contextionary {
    config: Config,
    stopwords: Arc<StopwordDetector>,
    base: Arc<MmappedIndex>,
    combined: RwLock<Arc<CombinedIndex>>,
    extensions: Option<Arc<ExtensionLookup>>,
    storer: Option<Storer>,
    vectorizer: Arc<Vectorizer>,
    batch_pool: rayon::ThreadPool,
}

impl Contextionary {
    /// Loads the index files and stands the service up without an
    /// extension repository.
    pub fn new(config: Config) -> Result<Self> {
        Self::build(config, None)
    }

    /// Same as [`new`](Self::new), with user extensions backed by the given
    /// repository.
    pub fn with_extension_repo(
        config: Config,
        watcher: &dyn ExtensionWatcher,
        storer_repo: Arc<dyn ExtensionStorer>,
    ) -> Result<Self> {
        Self::build(config, Some((watcher, storer_repo)))
    }

    fn build(
        config: Config,
        repo: Option<(&dyn ExtensionWatcher, Arc<dyn ExtensionStorer>)>,
    ) -> Result<Self> {
        let stopwords = Arc::new(StopwordDetector::from_file(&config.stopwords_path)?);

        let base = Arc::new(MmappedIndex::open(&config.wordlist_path, &config.vector_path)?);

        let splitter: Box<dyn CompoundSplitter> = if config.enable_compound_splitting {
            let dict = FileDict::open(&config.compound_splitting_dictionary_path)?;
            Box::new(Splitter::new(Box::new(dict)))
        } else {
            Box::new(NoopSplitter)
        };

        let (extensions, storer_repo) = match repo {
            Some((watcher, storer_repo)) => {
                (Some(ExtensionLookup::new(watcher)), Some(storer_repo))
            }
            None => (None, None),
        };

        let vectorizer = Arc::new(Vectorizer::new(
            base.clone() as Arc<dyn VectorIndex>,
            stopwords.clone(),
            extensions.clone(),
            splitter,
            &config,
        ));

        let storer =
            storer_repo.map(|repo| Storer::new(vectorizer.clone(), repo));

        // start with an empty schema; the first use_schema call replaces it
        let memory = MemoryIndex::empty(base.vector_width());
        let combined = RwLock::new(Arc::new(CombinedIndex::new(base.clone(), memory)?));

        let batch_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.max_batch_size)
            .build()
            .map_err(|err| Error::new(ErrorKind::Internal, format!("batch pool: {}", err)))?;

        info!(
            words = base.number_of_items(),
            vector_width = base.vector_width(),
            "contextionary is ready"
        );

        Ok(Contextionary {
            config,
            stopwords,
            base,
            combined,
            extensions,
            storer,
            vectorizer,
            batch_pool,
        })
    }

    fn combined(&self) -> Arc<CombinedIndex> {
        self.combined.read().clone()
    }

    /// Rebuilds the schema centroids and republishes the combined index.
    /// Transactional from a reader's point of view: on failure the previous
    /// combined index stays in place.
    pub fn use_schema(&self, schema: &Schema) -> Result<()> {
        let memory = build_memory_index_from_schema(schema, &*self.base, &self.stopwords)?;
        let entries = memory.number_of_items();
        let combined = Arc::new(CombinedIndex::new(self.base.clone(), memory)?);

        *self.combined.write() = combined;
        info!(schema_entries = entries, "republished the combined index");
        Ok(())
    }

    pub fn meta(&self) -> Meta {
        Meta {
            version: env!("CARGO_PKG_VERSION").to_string(),
            word_count: self.base.number_of_items(),
        }
    }

    /// True if the word is a user extension or part of the (combined)
    /// vocabulary.
    pub fn is_word_present(&self, word: &str) -> bool {
        if let Some(extensions) = &self.extensions {
            if extensions.lookup(word).is_some() {
                return true;
            }
        }

        self.combined().word_to_index(word).is_some()
    }

    pub fn is_word_stopword(&self, word: &str) -> bool {
        self.stopwords.is_stopword(word)
    }

    /// Stored vector of a single word, extension overlay first. A word is
    /// looked up verbatim; resolution fallbacks like compound splitting
    /// belong to corpus vectorization.
    pub fn vector_for_word(&self, word: &str) -> Result<Vector> {
        if let Some(extensions) = &self.extensions {
            if let Some(extension) = extensions.lookup(word) {
                return Ok(Vector::new(extension.vector));
            }
        }

        let combined = self.combined();
        let item = combined.word_to_index(word).ok_or_else(|| {
            Error::new(
                ErrorKind::NotFound,
                format!("the word '{}' is not present in the contextionary", word),
            )
        })?;

        combined.vector_for_index(item)
    }

    /// Batch variant of [`vector_for_word`](Self::vector_for_word); missing
    /// words come back as empty vectors so results stay parallel to the
    /// input.
    pub fn multi_vector_for_word(&self, words: &[String]) -> Result<Vec<Vector>> {
        let vectors = self.batch_pool.install(|| {
            words
                .par_iter()
                .map(|word| match self.vector_for_word(word) {
                    Ok(vector) => Ok(vector),
                    Err(err) if err.kind == ErrorKind::NotFound => Ok(Vector::new(Vec::new())),
                    Err(err) => Err(err),
                })
                .collect::<Result<Vec<_>>>()
        })?;

        Ok(vectors)
    }

    /// Weighted-centroid vector over free-text corpora, with optional
    /// per-word weight override expressions.
    pub fn vector_for_corpi(
        &self,
        corpi: &[String],
        overrides: &HashMap<String, String>,
    ) -> Result<(Vector, Vec<InputElement>)> {
        self.vectorizer.vector_for_corpi(corpi, overrides)
    }

    pub fn nearest_words_by_vector(
        &self,
        vector: &Vector,
        n: usize,
        k: usize,
    ) -> Result<(Vec<String>, Vec<f32>)> {
        let combined = self.combined();
        let (items, distances) = combined.nns_by_vector(vector, n, k)?;

        let mut words = Vec::with_capacity(items.len());
        for item in items {
            words.push(combined.index_to_word(item)?);
        }

        Ok((words, distances))
    }

    pub fn multi_nearest_words_by_vector(
        &self,
        params: &[NearestParams],
    ) -> Result<Vec<(Vec<String>, Vec<f32>)>> {
        self.batch_pool.install(|| {
            params
                .par_iter()
                .map(|query| self.nearest_words_by_vector(&query.vector, query.n, query.k))
                .collect()
        })
    }

    /// Similar words with guaranteed results; see
    /// [`safe_similar_words`](crate::index::similar::safe_similar_words).
    pub fn safe_similar_words(&self, word: &str, n: usize, k: usize) -> (Vec<String>, Vec<f32>) {
        safe_similar_words(&*self.combined(), word, n, k)
    }

    /// Similar words above a certainty threshold, capped at 15, with rare
    /// neighbors filtered per the configured occurrence percentile.
    pub fn safe_similar_words_with_certainty(
        &self,
        word: &str,
        certainty: f32,
    ) -> Result<Vec<String>> {
        let min_occurrence = if self.config.neighbor_occurrence_ignore_percentile > 0 {
            self.base
                .occurrence_percentile(self.config.neighbor_occurrence_ignore_percentile)?
        } else {
            0
        };

        Ok(safe_similar_words_with_certainty(
            &*self.combined(),
            word,
            certainty,
            min_occurrence,
        ))
    }

    pub fn schema_search(&self, params: &SearchParams) -> Result<SearchResults> {
        schema_search(&*self.combined(), params)
    }

    /// Validates, vectorizes, and stores a user extension. The overlay
    /// picks it up through the repository's watch stream.
    pub fn add_extension(&self, concept: &str, input: ExtensionInput) -> Result<()> {
        let storer = self.storer.as_ref().ok_or_else(|| {
            Error::new(ErrorKind::Internal, "no extension storage is configured")
        })?;

        storer.put(concept, input)
    }
}
