pub mod ann;
pub mod combined;
pub mod memory;
pub mod mmapped;
pub mod similar;
pub mod vector_file;
pub mod wordlist;

use crate::core::error::Result;
use crate::core::vector::Vector;

/// Identifies a row in both the wordlist and the vector table. Assigned at
/// index build time; equal to the word's lexicographic rank.
pub type ItemIndex = usize;

/// Query surface shared by the mmapped base index, the in-memory index of
/// synthetic entries, and their combination. Decouples the kNN interface
/// consumers need from any concrete storage.
pub trait VectorIndex: Send + Sync {
    /// Number of items stored in the index.
    fn number_of_items(&self) -> usize;

    /// Width of every vector in the index.
    fn vector_width(&self) -> usize;

    /// Look up a word; `None` if the index doesn't know it.
    fn word_to_index(&self, word: &str) -> Option<ItemIndex>;

    fn index_to_word(&self, item: ItemIndex) -> Result<String>;

    fn index_to_occurrence(&self, item: ItemIndex) -> Result<u64>;

    /// Occurrence of the given percentile (0-100) over the ascending
    /// occurrence distribution.
    fn occurrence_percentile(&self, percentile: usize) -> Result<u64>;

    fn vector_for_index(&self, item: ItemIndex) -> Result<Vector>;

    /// Euclidean distance between two stored items.
    fn distance(&self, a: ItemIndex, b: ItemIndex) -> Result<f32>;

    /// The n nearest neighbors of a stored item, examining k probes.
    /// Parallel arrays sorted ascending by distance.
    fn nns_by_item(
        &self,
        item: ItemIndex,
        n: usize,
        k: usize,
    ) -> Result<(Vec<ItemIndex>, Vec<f32>)>;

    /// The n nearest neighbors of an arbitrary vector, examining k probes.
    fn nns_by_vector(
        &self,
        vector: &Vector,
        n: usize,
        k: usize,
    ) -> Result<(Vec<ItemIndex>, Vec<f32>)>;
}

/// 101-entry table (percentiles 0..=100 inclusive) over an occurrence
/// distribution: 0 maps to 0, 100 to the maximum observed, anything between
/// to the element at rank `p/100 * len` of the ascending array.
pub(crate) fn occurrence_percentiles(mut occurrences: Vec<u64>) -> Vec<u64> {
    let mut table = vec![0u64; 101];
    if occurrences.is_empty() {
        return table;
    }

    occurrences.sort_unstable();

    for (percentile, slot) in table.iter_mut().enumerate().skip(1) {
        if percentile == 100 {
            *slot = *occurrences.last().expect("non-empty");
            continue;
        }

        let rank = (percentile as f64 / 100.0 * occurrences.len() as f64) as usize;
        *slot = occurrences[rank.min(occurrences.len() - 1)];
    }

    table
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::fs;
    use std::path::{Path, PathBuf};

    /// Writes a wordlist file and the matching fixed-stride vector file for
    /// the given `(word, occurrence, vector)` entries. Entries are sorted by
    /// word bytes first, so item indices equal lexicographic ranks as the
    /// on-disk format requires.
    pub fn write_index_files(
        dir: &Path,
        entries: &[(&str, u64, Vec<f32>)],
    ) -> (PathBuf, PathBuf) {
        let mut entries: Vec<_> = entries.to_vec();
        entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

        let width = entries.first().map(|e| e.2.len()).unwrap_or(0);

        let metadata = b"{}";
        let mut header = Vec::new();
        header.extend_from_slice(&(entries.len() as u64).to_le_bytes());
        header.extend_from_slice(&(width as u64).to_le_bytes());
        header.extend_from_slice(&(metadata.len() as u64).to_le_bytes());
        header.extend_from_slice(metadata);

        let mut start_of_table = header.len();
        start_of_table += 4 - (start_of_table % 4);
        header.resize(start_of_table, 0);

        let mut pointers = Vec::new();
        let mut payload = Vec::new();
        let payload_base = start_of_table + 8 * entries.len();
        for (word, occurrence, _) in &entries {
            pointers.extend_from_slice(&((payload_base + payload.len()) as u64).to_le_bytes());
            payload.extend_from_slice(&occurrence.to_le_bytes());
            payload.extend_from_slice(word.as_bytes());
            payload.push(0);
        }

        let mut wordlist = header;
        wordlist.extend_from_slice(&pointers);
        wordlist.extend_from_slice(&payload);

        let wordlist_path = dir.join("words.idx");
        fs::write(&wordlist_path, wordlist).unwrap();

        let mut vectors = Vec::new();
        for (_, _, vector) in &entries {
            vectors.extend_from_slice(&[0u8; 16]);
            for component in vector {
                vectors.extend_from_slice(&component.to_le_bytes());
            }
        }

        let vector_path = dir.join("vectors.knn");
        fs::write(&vector_path, vectors).unwrap();

        (wordlist_path, vector_path)
    }
}
