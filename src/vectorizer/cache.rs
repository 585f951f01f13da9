use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::core::vector::Vector;

/// A resolved word ready for centroid assembly. `source` lists the base
/// words that contributed: the word itself for a direct hit, the pieces
/// for a compound split.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedVector {
    pub vector: Vector,
    pub occurrence: u64,
    pub source: Vec<String>,
}

/// Shared per-word lookup cache for the vectorizer.
///
/// Eviction is deliberately catastrophic: once the size counter climbs
/// strictly above the limit, the next purge check wipes everything. That
/// keeps the per-request bookkeeping at a single atomic load instead of
/// LRU accounting. The counter approximates the map size; it is corrected
/// on every wipe.
pub struct VectorCache {
    entries: Mutex<HashMap<String, CachedVector>>,
    count: AtomicUsize,
    max_size: usize,
}

impl VectorCache {
    pub fn new(max_size: usize) -> Self {
        VectorCache {
            entries: Mutex::new(HashMap::new()),
            count: AtomicUsize::new(0),
            max_size,
        }
    }

    pub fn get(&self, word: &str) -> Option<CachedVector> {
        self.entries.lock().get(word).cloned()
    }

    pub fn insert(&self, word: &str, value: CachedVector) {
        let previous = self.entries.lock().insert(word.to_string(), value);
        if previous.is_none() {
            self.count.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Wipes the cache when it has grown strictly beyond the limit.
    /// Returns whether a purge happened.
    pub fn purge_if_over_limit(&self) -> bool {
        if self.count.load(Ordering::Relaxed) <= self.max_size {
            return false;
        }

        let mut entries = self.entries.lock();
        entries.clear();
        self.count.store(0, Ordering::Relaxed);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
