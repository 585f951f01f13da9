use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::vector::distance_to_certainty;
use crate::index::VectorIndex;

/// Hard cap on certainty-filtered similar-word results.
const SIMILAR_WORDS_LIMIT: usize = 15;

/// Synthetic class/property centroids carry a leading dollar sign, which
/// makes them easy to drop from word-level results.
static SYNTHETIC_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\$").expect("valid pattern"));

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_]+").expect("valid pattern"));

/// Returns n similar words, examining k probes. Guaranteed to have results
/// even if the word is not in the index; in that case the list contains
/// only the word itself, so it can still feed exact-match or
/// Levenshtein-based lookups downstream. Surviving neighbors come back
/// stripped of non-alphanumeric characters.
pub fn safe_similar_words(
    index: &dyn VectorIndex,
    word: &str,
    n: usize,
    k: usize,
) -> (Vec<String>, Vec<f32>) {
    let Some(item) = index.word_to_index(word) else {
        return (vec![word.to_string()], vec![1.0]);
    };

    let Ok((items, distances)) = index.nns_by_item(item, n, k) else {
        return (vec![word.to_string()], vec![1.0]);
    };

    let mut words = Vec::with_capacity(items.len());
    let mut kept_distances = Vec::with_capacity(items.len());
    for (neighbor, distance) in items.into_iter().zip(distances) {
        let Ok(neighbor_word) = index.index_to_word(neighbor) else {
            continue;
        };

        if SYNTHETIC_NAME.is_match(&neighbor_word) {
            continue;
        }

        words.push(NON_ALPHANUMERIC.replace_all(&neighbor_word, "").into_owned());
        kept_distances.push(distance);
    }

    (words, kept_distances)
}

/// Similar words that are close enough to match the required certainty,
/// capped at 15 results. Neighbors rarer than `min_occurrence` are dropped
/// so that noise words from the long tail of the vocabulary don't surface;
/// pass 0 to keep everything.
pub fn safe_similar_words_with_certainty(
    index: &dyn VectorIndex,
    word: &str,
    certainty: f32,
    min_occurrence: u64,
) -> Vec<String> {
    let (words, distances) = safe_similar_words(index, word, 100, 32);

    let mut matching = Vec::new();
    for (candidate, distance) in words.into_iter().zip(distances) {
        if matching.len() >= SIMILAR_WORDS_LIMIT {
            break;
        }

        if distance_to_certainty(distance) < certainty {
            continue;
        }

        if min_occurrence > 0 {
            if let Some(item) = index.word_to_index(&candidate) {
                match index.index_to_occurrence(item) {
                    Ok(occurrence) if occurrence < min_occurrence => continue,
                    _ => {}
                }
            }
        }

        matching.push(candidate);
    }

    matching
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vector::Vector;
    use crate::index::memory::MemoryIndexBuilder;

    /// Small in-memory index standing in for the mmapped one; the helpers
    /// only see the `VectorIndex` trait.
    fn sample_index() -> impl VectorIndex {
        let mut builder = MemoryIndexBuilder::new(2);
        let entries: Vec<(&str, u64, Vec<f32>)> = vec![
            ("car", 20000, vec![1.0, 0.0]),
            ("mercedes", 100, vec![0.95, 0.05]),
            ("taxi", 3, vec![0.9, 0.1]),
            ("$OBJECT[Car]", 1, vec![0.98, 0.02]),
            ("steam", 100, vec![0.0, 1.0]),
        ];
        for (word, occurrence, vector) in entries {
            builder.add_word(word, Vector::new(vector), occurrence).unwrap();
        }
        builder.build().unwrap()
    }

    #[test]
    fn absent_word_falls_back_to_itself() {
        let index = sample_index();
        let (words, distances) = safe_similar_words(&index, "bicycle", 10, 3);
        assert_eq!(words, vec!["bicycle"]);
        assert_eq!(distances, vec![1.0]);
    }

    #[test]
    fn synthetic_names_are_filtered() {
        let index = sample_index();
        let (words, _) = safe_similar_words(&index, "car", 10, 3);
        assert!(words.contains(&"car".to_string()));
        assert!(words.contains(&"mercedes".to_string()));
        assert!(!words.iter().any(|w| w.starts_with('$')));
    }

    #[test]
    fn certainty_threshold_and_cap_apply() {
        let index = sample_index();

        let words = safe_similar_words_with_certainty(&index, "car", 0.9, 0);
        assert!(words.len() <= 15);
        assert!(words.contains(&"car".to_string()));
        assert!(words.contains(&"mercedes".to_string()));
        // "steam" is sqrt(2) away: certainty ~0.88, below the threshold
        assert!(!words.contains(&"steam".to_string()));
    }

    #[test]
    fn rare_neighbors_are_dropped_below_min_occurrence() {
        let index = sample_index();

        let with_rare = safe_similar_words_with_certainty(&index, "car", 0.9, 0);
        assert!(with_rare.contains(&"taxi".to_string()));

        let without_rare = safe_similar_words_with_certainty(&index, "car", 0.9, 50);
        assert!(!without_rare.contains(&"taxi".to_string()));
        assert!(without_rare.contains(&"mercedes".to_string()));
    }
}
