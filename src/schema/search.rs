use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::camelcase;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::vector::{compute_weighted_centroid, distance_to_certainty, Vector};
use crate::index::VectorIndex;
use crate::schema::params::{SearchParams, SearchType};

/// How many raw neighbors the kNN pass pulls before the synthetic-name
/// filter reduces them to classes or properties.
const KNN_POOL: usize = 10_000;
const KNN_PROBES: usize = 3;

static CLASS_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$OBJECT\[([A-Za-z]+)\]$").expect("valid pattern"));

static PROPERTY_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$[A-Za-z]+\[[A-Za-z]+\]\[([A-Za-z]+)\]$").expect("valid pattern"));

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub name: String,
    pub certainty: f32,
}

#[derive(Debug, Clone)]
pub struct SearchResults {
    pub search_type: SearchType,
    pub results: Vec<SearchResult>,
}

impl SearchResults {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Scores the schema's class or property names against a query by vector
/// distance. The query centroid is built from the camelCase parts of the
/// name, optionally combined with weighted keywords.
pub fn schema_search(index: &dyn VectorIndex, params: &SearchParams) -> Result<SearchResults> {
    params
        .validate()
        .map_err(|err| Error::new(err.kind, format!("invalid search params: {}", err.context)))?;

    let centroid = centroid_from_name_and_keywords(index, params).map_err(|err| {
        Error::new(
            err.kind,
            format!("could not build centroid from name and keywords: {}", err.context),
        )
    })?;

    let raw = knn_search(index, &centroid)?;

    let results = match params.search_type {
        SearchType::Class => extract_class_names(&raw, params),
        SearchType::Property => extract_property_names(&raw, params),
    };

    Ok(SearchResults {
        search_type: params.search_type,
        results,
    })
}

fn centroid_from_name_and_keywords(
    index: &dyn VectorIndex,
    params: &SearchParams,
) -> Result<Vector> {
    let name_vector = camel_case_word_to_vector(index, &params.name)
        .map_err(|err| Error::new(err.kind, format!("invalid name in search: {}", err.context)))?;

    if params.keywords.is_empty() {
        return Ok(name_vector);
    }

    let mut vectors = Vec::with_capacity(params.keywords.len() + 1);
    let mut weights = Vec::with_capacity(params.keywords.len() + 1);

    for keyword in &params.keywords {
        let vector = word_to_vector(index, &keyword.keyword).map_err(|err| {
            Error::new(err.kind, format!("invalid keyword in search: {}", err.context))
        })?;
        vectors.push(vector);
        weights.push(keyword.weight);
    }

    // the name always contributes with full weight
    vectors.push(name_vector);
    weights.push(1.0);

    compute_weighted_centroid(&vectors, &weights)
}

fn camel_case_word_to_vector(index: &dyn VectorIndex, word: &str) -> Result<Vector> {
    let parts = camelcase::split(word);
    if parts.len() == 1 {
        // no camelcasing, no need to build a centroid
        return word_to_vector(index, word);
    }

    let mut vectors = Vec::with_capacity(parts.len());
    for part in &parts {
        let vector = word_to_vector(index, part).map_err(|err| {
            Error::new(err.kind, format!("invalid camelCased compound word: {}", err.context))
        })?;
        vectors.push(vector);
    }

    // on camel-casing all parts are weighted equally
    let weights = vec![1.0; vectors.len()];
    compute_weighted_centroid(&vectors, &weights)
}

fn word_to_vector(index: &dyn VectorIndex, word: &str) -> Result<Vector> {
    let word = word.to_lowercase();
    let item = index.word_to_index(&word).ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidArgument,
            format!("the word '{}' is not present in the vocabulary and therefore not a valid search term", word),
        )
    })?;

    index.vector_for_index(item)
}

struct RawResult {
    name: String,
    distance: f32,
}

fn knn_search(index: &dyn VectorIndex, centroid: &Vector) -> Result<Vec<RawResult>> {
    let (items, distances) = index
        .nns_by_vector(centroid, KNN_POOL, KNN_PROBES)
        .map_err(|err| {
            Error::new(ErrorKind::Internal, format!("could not perform knn search: {}", err))
        })?;

    let mut results = Vec::with_capacity(items.len());
    for (item, distance) in items.into_iter().zip(distances) {
        let name = index.index_to_word(item).map_err(|err| {
            Error::new(
                ErrorKind::Internal,
                format!("got a result from knn search, but don't have a word for this index: {}", err),
            )
        })?;
        results.push(RawResult { name, distance });
    }

    Ok(results)
}

fn extract_class_names(raw: &[RawResult], params: &SearchParams) -> Vec<SearchResult> {
    let mut results = Vec::new();

    for hit in raw {
        let Some(captures) = CLASS_NAME.captures(&hit.name) else {
            continue;
        };

        let certainty = distance_to_certainty(hit.distance);
        if certainty < params.certainty {
            continue;
        }

        results.push(SearchResult {
            name: captures[1].to_string(),
            certainty,
        });
    }

    results
}

fn extract_property_names(raw: &[RawResult], params: &SearchParams) -> Vec<SearchResult> {
    let mut per_name: HashMap<String, Vec<f32>> = HashMap::new();

    for hit in raw {
        let Some(captures) = PROPERTY_NAME.captures(&hit.name) else {
            continue;
        };

        let certainty = distance_to_certainty(hit.distance);
        if certainty < params.certainty {
            continue;
        }

        per_name.entry(captures[1].to_string()).or_default().push(certainty);
    }

    // the same property name can appear under many classes; group them and
    // report the mean certainty per name
    let mut results: Vec<SearchResult> = per_name
        .into_iter()
        .map(|(name, certainties)| {
            let mean = certainties.iter().sum::<f32>() / certainties.len() as f32;
            SearchResult {
                name,
                certainty: mean,
            }
        })
        .collect();

    results.sort_by(|a, b| {
        b.certainty
            .partial_cmp(&a.certainty)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::memory::MemoryIndexBuilder;
    use crate::schema::params::Keyword;

    /// Base words plus synthetic schema entries in one in-memory index,
    /// shaped like the combined index the service queries.
    fn search_index() -> impl VectorIndex {
        let mut builder = MemoryIndexBuilder::new(2);
        let entries: Vec<(&str, Vec<f32>)> = vec![
            ("car", vec![1.0, 0.0]),
            ("fast", vec![0.8, 0.2]),
            ("city", vec![0.0, 1.0]),
            ("$OBJECT[Car]", vec![1.0, 0.0]),
            ("$OBJECT[City]", vec![0.0, 1.0]),
            ("$OBJECT[Car][speed]", vec![0.9, 0.1]),
            ("$OBJECT[City][name]", vec![0.1, 0.9]),
            ("$OBJECT[City][speed]", vec![0.7, 0.3]),
        ];
        for (word, vector) in entries {
            builder.add_word(word, Vector::new(vector), 100).unwrap();
        }
        builder.build().unwrap()
    }

    fn class_params(name: &str, certainty: f32) -> SearchParams {
        SearchParams {
            search_type: SearchType::Class,
            name: name.to_string(),
            keywords: vec![],
            certainty,
        }
    }

    #[test]
    fn finds_the_matching_class() {
        let index = search_index();
        let results = schema_search(&index, &class_params("Car", 0.8)).unwrap();

        assert_eq!(results.search_type, SearchType::Class);
        assert!(!results.is_empty());
        assert_eq!(results.results[0].name, "Car");
        assert!(results.results[0].certainty >= 0.8);
    }

    #[test]
    fn plain_words_never_show_up_as_classes() {
        let index = search_index();
        let results = schema_search(&index, &class_params("Car", 0.0)).unwrap();
        assert!(results.results.iter().all(|r| r.name == "Car" || r.name == "City"));
    }

    #[test]
    fn certainty_threshold_filters_classes() {
        let index = search_index();
        let results = schema_search(&index, &class_params("Car", 0.999)).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results.results[0].name, "Car");
    }

    #[test]
    fn property_results_are_deduplicated_with_mean_certainty() {
        let index = search_index();
        let params = SearchParams {
            search_type: SearchType::Property,
            name: "fast".to_string(),
            keywords: vec![],
            certainty: 0.0,
        };

        let results = schema_search(&index, &params).unwrap();

        let speed_entries: Vec<_> = results
            .results
            .iter()
            .filter(|r| r.name == "speed")
            .collect();
        assert_eq!(speed_entries.len(), 1);

        // mean of the two $OBJECT[..][speed] certainties sits strictly
        // between the individual values
        let close = distance_to_certainty(
            crate::core::vector::euclidean_distance(
                &Vector::new(vec![0.8, 0.2]),
                &Vector::new(vec![0.9, 0.1]),
            )
            .unwrap(),
        );
        let far = distance_to_certainty(
            crate::core::vector::euclidean_distance(
                &Vector::new(vec![0.8, 0.2]),
                &Vector::new(vec![0.7, 0.3]),
            )
            .unwrap(),
        );
        let mean = (close + far) / 2.0;
        assert!((speed_entries[0].certainty - mean).abs() < 1e-5);
    }

    #[test]
    fn camel_cased_name_builds_a_part_centroid() {
        let index = search_index();
        let results = schema_search(&index, &class_params("FastCar", 0.5)).unwrap();
        assert!(results.results.iter().any(|r| r.name == "Car"));
    }

    #[test]
    fn keywords_pull_the_centroid() {
        let index = search_index();
        let params = SearchParams {
            search_type: SearchType::Class,
            name: "Car".to_string(),
            keywords: vec![Keyword {
                keyword: "city".to_string(),
                weight: 1.0,
            }],
            certainty: 0.0,
        };

        let results = schema_search(&index, &params).unwrap();
        // pulled halfway between car and city, both classes clear the bar
        assert!(results.results.iter().any(|r| r.name == "City"));
    }

    #[test]
    fn unknown_name_is_invalid() {
        let index = search_index();
        let err = schema_search(&index, &class_params("Bicycle", 0.5)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }

    #[test]
    fn invalid_params_are_rejected_before_searching() {
        let index = search_index();
        let err = schema_search(&index, &class_params("", 0.5)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }
}
