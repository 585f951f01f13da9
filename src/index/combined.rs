use std::sync::Arc;

use crate::core::error::{Error, ErrorKind, Result};
use crate::core::vector::{euclidean_distance, Vector};
use crate::index::memory::MemoryIndex;
use crate::index::mmapped::MmappedIndex;
use crate::index::{ItemIndex, VectorIndex};

/// Read-only composition of the mmapped base index with the in-memory
/// index of synthetic entries.
///
/// Item indices form a disjoint union by offset: indices below the base
/// item count address the base, anything above addresses the memory layer
/// shifted down by that count. Word lookups consult the memory layer first.
/// kNN queries run against both layers and merge the distance-sorted
/// results, which keeps schema rebuilds cheap: a new combination is a new
/// value, published by swapping a pointer.
#[derive(Debug)]
pub struct CombinedIndex {
    base: Arc<MmappedIndex>,
    memory: MemoryIndex,
}

impl CombinedIndex {
    pub fn new(base: Arc<MmappedIndex>, memory: MemoryIndex) -> Result<Self> {
        if base.vector_width() != memory.vector_width() {
            return Err(Error::new(
                ErrorKind::WrongDimension,
                format!(
                    "can't combine a {}-dimensional base with a {}-dimensional memory index",
                    base.vector_width(),
                    memory.vector_width()
                ),
            ));
        }

        Ok(CombinedIndex { base, memory })
    }

    fn base_items(&self) -> usize {
        self.base.number_of_items()
    }
}

impl VectorIndex for CombinedIndex {
    fn number_of_items(&self) -> usize {
        self.base.number_of_items() + self.memory.number_of_items()
    }

    fn vector_width(&self) -> usize {
        self.base.vector_width()
    }

    fn word_to_index(&self, word: &str) -> Option<ItemIndex> {
        if let Some(item) = self.memory.word_to_index(word) {
            return Some(self.base_items() + item);
        }
        self.base.word_to_index(word)
    }

    fn index_to_word(&self, item: ItemIndex) -> Result<String> {
        if item < self.base_items() {
            self.base.index_to_word(item)
        } else {
            self.memory.index_to_word(item - self.base_items())
        }
    }

    fn index_to_occurrence(&self, item: ItemIndex) -> Result<u64> {
        if item < self.base_items() {
            self.base.index_to_occurrence(item)
        } else {
            self.memory.index_to_occurrence(item - self.base_items())
        }
    }

    fn occurrence_percentile(&self, percentile: usize) -> Result<u64> {
        self.base.occurrence_percentile(percentile)
    }

    fn vector_for_index(&self, item: ItemIndex) -> Result<Vector> {
        if item < self.base_items() {
            self.base.vector_for_index(item)
        } else {
            self.memory.vector_for_index(item - self.base_items())
        }
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
        let (base_items, base_distances) = self.base.nns_by_vector(vector, n, k)?;
        let (memory_items, memory_distances) = self.memory.nns_by_vector(vector, n, k)?;

        let mut hits: Vec<(ItemIndex, f32)> = base_items
            .into_iter()
            .zip(base_distances)
            .chain(
                memory_items
                    .into_iter()
                    .map(|item| item + self.base_items())
                    .zip(memory_distances),
            )
            .collect();

        hits.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(n);

        Ok(hits.into_iter().unzip())
    }
}
