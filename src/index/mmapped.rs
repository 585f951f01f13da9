use std::path::Path;
use std::time::Instant;

use tracing::info;

use crate::core::error::{Error, ErrorKind, Result};
use crate::core::vector::{euclidean_distance, Vector};
use crate::index::ann::AnnIndex;
use crate::index::vector_file::VectorFile;
use crate::index::wordlist::Wordlist;
use crate::index::{ItemIndex, VectorIndex};

/// The base index: the mmapped wordlist and vector table plus the ANN
/// structure built over them at load time. Immutable until shutdown;
/// unmapped on drop.
#[derive(Debug)]
pub struct MmappedIndex {
    wordlist: Wordlist,
    vectors: VectorFile,
    ann: AnnIndex,
}

impl MmappedIndex {
    pub fn open(wordlist_path: impl AsRef<Path>, vector_path: impl AsRef<Path>) -> Result<Self> {
        let started = Instant::now();

        let wordlist = Wordlist::open(wordlist_path)?;
        let dimensions = wordlist.vector_width() as usize;
        let number_of_words = wordlist.number_of_words() as usize;

        let vectors = VectorFile::open(vector_path, dimensions, number_of_words)?;

        let mut items = Vec::with_capacity(number_of_words);
        for index in 0..number_of_words {
            items.push((index, vectors.vector_for(index)?));
        }
        let ann = AnnIndex::build(dimensions, items)?;

        info!(
            words = number_of_words,
            vector_width = dimensions,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "vector index loaded"
        );

        Ok(MmappedIndex {
            wordlist,
            vectors,
            ann,
        })
    }

    /// Opaque build metadata from the wordlist header.
    pub fn metadata(&self) -> &serde_json::Value {
        self.wordlist.metadata()
    }
}

impl VectorIndex for MmappedIndex {
    fn number_of_items(&self) -> usize {
        self.wordlist.number_of_words() as usize
    }

    fn vector_width(&self) -> usize {
        self.wordlist.vector_width() as usize
    }

    fn word_to_index(&self, word: &str) -> Option<ItemIndex> {
        self.wordlist.find(word)
    }

    fn index_to_word(&self, item: ItemIndex) -> Result<String> {
        let (word, _) = self.wordlist.get(item)?;
        Ok(word.to_string())
    }

    fn index_to_occurrence(&self, item: ItemIndex) -> Result<u64> {
        let (_, occurrence) = self.wordlist.get(item)?;
        Ok(occurrence)
    }

    fn occurrence_percentile(&self, percentile: usize) -> Result<u64> {
        self.wordlist.occurrence_percentile(percentile)
    }

    fn vector_for_index(&self, item: ItemIndex) -> Result<Vector> {
        self.vectors.vector_for(item)
    }

    fn distance(&self, a: ItemIndex, b: ItemIndex) -> Result<f32> {
        let va = self.vector_for_index(a)?;
        let vb = self.vector_for_index(b)?;
        euclidean_distance(&va, &vb)
    }

    fn nns_by_item(
        &self,
        item: ItemIndex,
        n: usize,
        k: usize,
    ) -> Result<(Vec<ItemIndex>, Vec<f32>)> {
        if item >= self.number_of_items() {
            return Err(Error::new(
                ErrorKind::OutOfBounds,
                format!("item {} out of bounds for {} items", item, self.number_of_items()),
            ));
        }

        let vector = self.vector_for_index(item)?;
        self.ann.nns_by_vector(&vector, n, k)
    }

    fn nns_by_vector(
        &self,
        vector: &Vector,
        n: usize,
        k: usize,
    ) -> Result<(Vec<ItemIndex>, Vec<f32>)> {
        self.ann.nns_by_vector(vector, n, k)
    }
}
