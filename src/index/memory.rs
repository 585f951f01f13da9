use std::collections::HashMap;

use crate::core::error::{Error, ErrorKind, Result};
use crate::core::vector::{euclidean_distance, Vector};
use crate::index::ann::AnnIndex;
use crate::index::{occurrence_percentiles, ItemIndex, VectorIndex};

/// Collects synthetic entries (schema centroids) before freezing them into
/// a queryable [`MemoryIndex`]. Adding a word twice replaces the earlier
/// entry.
pub struct MemoryIndexBuilder {
    dimensions: usize,
    words: Vec<String>,
    vectors: Vec<Vector>,
    occurrences: Vec<u64>,
    by_word: HashMap<String, ItemIndex>,
}

impl MemoryIndexBuilder {
    pub fn new(dimensions: usize) -> Self {
        MemoryIndexBuilder {
            dimensions,
            words: Vec::new(),
            vectors: Vec::new(),
            occurrences: Vec::new(),
            by_word: HashMap::new(),
        }
    }

    pub fn add_word(&mut self, word: &str, vector: Vector, occurrence: u64) -> Result<()> {
        if vector.len() != self.dimensions {
            return Err(Error::new(
                ErrorKind::WrongDimension,
                format!(
                    "'{}' has width {} but the index expects {}",
                    word,
                    vector.len(),
                    self.dimensions
                ),
            ));
        }

        if let Some(&existing) = self.by_word.get(word) {
            self.vectors[existing] = vector;
            self.occurrences[existing] = occurrence;
            return Ok(());
        }

        self.by_word.insert(word.to_string(), self.words.len());
        self.words.push(word.to_string());
        self.vectors.push(vector);
        self.occurrences.push(occurrence);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn build(self) -> Result<MemoryIndex> {
        let ann = if self.words.is_empty() {
            None
        } else {
            let items = self
                .vectors
                .iter()
                .cloned()
                .enumerate()
                .collect::<Vec<_>>();
            Some(AnnIndex::build(self.dimensions, items)?)
        };

        let percentiles = occurrence_percentiles(self.occurrences.clone());

        Ok(MemoryIndex {
            dimensions: self.dimensions,
            words: self.words,
            vectors: self.vectors,
            occurrences: self.occurrences,
            by_word: self.by_word,
            ann,
            percentiles,
        })
    }
}

/// In-memory sibling of the mmapped index, holding the synthetic entries
/// a schema rebuild produces. Frozen after build.
#[derive(Debug)]
pub struct MemoryIndex {
    dimensions: usize,
    words: Vec<String>,
    vectors: Vec<Vector>,
    occurrences: Vec<u64>,
    by_word: HashMap<String, ItemIndex>,
    ann: Option<AnnIndex>,
    percentiles: Vec<u64>,
}

impl MemoryIndex {
    /// An index with no entries, used before the first schema arrives.
    pub fn empty(dimensions: usize) -> Self {
        MemoryIndexBuilder::new(dimensions)
            .build()
            .expect("empty build can't fail")
    }

    fn check_bounds(&self, item: ItemIndex) -> Result<()> {
        if item >= self.words.len() {
            return Err(Error::new(
                ErrorKind::OutOfBounds,
                format!("item {} out of bounds for {} items", item, self.words.len()),
            ));
        }
        Ok(())
    }
}

impl VectorIndex for MemoryIndex {
    fn number_of_items(&self) -> usize {
        self.words.len()
    }

    fn vector_width(&self) -> usize {
        self.dimensions
    }

    fn word_to_index(&self, word: &str) -> Option<ItemIndex> {
        self.by_word.get(word).copied()
    }

    fn index_to_word(&self, item: ItemIndex) -> Result<String> {
        self.check_bounds(item)?;
        Ok(self.words[item].clone())
    }

    fn index_to_occurrence(&self, item: ItemIndex) -> Result<u64> {
        self.check_bounds(item)?;
        Ok(self.occurrences[item])
    }

    fn occurrence_percentile(&self, percentile: usize) -> Result<u64> {
        if percentile > 100 {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                format!("occurrence percentile must be between 0 and 100, got {}", percentile),
            ));
        }
        Ok(self.percentiles[percentile])
    }

    fn vector_for_index(&self, item: ItemIndex) -> Result<Vector> {
        self.check_bounds(item)?;
        Ok(self.vectors[item].clone())
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
        let vector = self.vector_for_index(item)?;
        self.nns_by_vector(&vector, n, k)
    }

    fn nns_by_vector(
        &self,
        vector: &Vector,
        n: usize,
        k: usize,
    ) -> Result<(Vec<ItemIndex>, Vec<f32>)> {
        if vector.len() != self.dimensions {
            return Err(Error::new(
                ErrorKind::WrongDimension,
                format!(
                    "wrong vector length provided: got {}, index holds {}-dimensional vectors",
                    vector.len(),
                    self.dimensions
                ),
            ));
        }

        match &self.ann {
            Some(ann) => ann.nns_by_vector(vector, n, k),
            None => Ok((Vec::new(), Vec::new())),
        }
    }
}
