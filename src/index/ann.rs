use hora::core::ann_index::ANNIndex;
use hora::core::metrics::Metric;
use hora::index::hnsw_idx::HNSWIndex;
use hora::index::hnsw_params::HNSWParams;

use crate::core::error::{Error, ErrorKind, Result};
use crate::core::vector::Vector;
use crate::index::ItemIndex;

/// Approximate nearest-neighbor queries over a set of item vectors,
/// Euclidean metric. Built once, read-only afterwards.
///
/// The `k` probe parameter of the query methods is part of the public kNN
/// contract; HNSW fixes its search breadth at build time, so the value is
/// accepted but not consulted.
#[derive(Debug)]
pub struct AnnIndex {
    index: HNSWIndex<f32, usize>,
    dimensions: usize,
    items: usize,
}

impl AnnIndex {
    pub fn build<I>(dimensions: usize, vectors: I) -> Result<Self>
    where
        I: IntoIterator<Item = (ItemIndex, Vector)>,
    {
        let mut index = HNSWIndex::<f32, usize>::new(dimensions, &HNSWParams::<f32>::default());

        let mut inserted = 0usize;
        for (item, vector) in vectors {
            if vector.len() != dimensions {
                return Err(Error::new(
                    ErrorKind::WrongDimension,
                    format!(
                        "item {} has width {} but the index expects {}",
                        item,
                        vector.len(),
                        dimensions
                    ),
                ));
            }

            index
                .add(vector.as_slice(), item)
                .map_err(|err| Error::new(ErrorKind::Internal, format!("ann insert: {}", err)))?;
            inserted += 1;
        }

        if inserted > 0 {
            index
                .build(Metric::Euclidean)
                .map_err(|err| Error::new(ErrorKind::Internal, format!("ann build: {}", err)))?;
        }

        Ok(AnnIndex {
            index,
            dimensions,
            items: inserted,
        })
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// The n nearest stored items to the given vector, ascending by
    /// distance. Parallel arrays of item indices and distances.
    pub fn nns_by_vector(
        &self,
        vector: &Vector,
        n: usize,
        _k: usize,
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

        if self.items == 0 {
            return Ok((Vec::new(), Vec::new()));
        }

        let mut hits: Vec<(ItemIndex, f32)> = self
            .index
            .search_nodes(vector.as_slice(), n)
            .into_iter()
            .filter_map(|(node, distance)| node.idx().as_ref().map(|&item| (item, distance)))
            .collect();

        hits.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(n);

        Ok(hits.into_iter().unzip())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis_vectors() -> Vec<(ItemIndex, Vector)> {
        vec![
            (0, Vector::new(vec![1.0, 0.0, 0.0])),
            (1, Vector::new(vec![0.0, 1.0, 0.0])),
            (2, Vector::new(vec![0.0, 0.0, 1.0])),
            (3, Vector::new(vec![0.9, 0.1, 0.0])),
        ]
    }

    #[test]
    fn neighbors_come_back_sorted_by_distance() {
        let ann = AnnIndex::build(3, axis_vectors()).unwrap();

        let (items, distances) = ann
            .nns_by_vector(&Vector::new(vec![1.0, 0.0, 0.0]), 3, 3)
            .unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0], 0);
        assert_eq!(items[1], 3);
        assert!(distances[0] <= distances[1] && distances[1] <= distances[2]);
        assert!(distances[0] < 1e-6);
    }

    #[test]
    fn wrong_width_queries_are_rejected() {
        let ann = AnnIndex::build(3, axis_vectors()).unwrap();
        let err = ann
            .nns_by_vector(&Vector::new(vec![1.0, 0.0]), 3, 3)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::WrongDimension);
    }

    #[test]
    fn mismatched_insert_width_is_rejected() {
        let err = AnnIndex::build(3, vec![(0, Vector::new(vec![1.0]))]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::WrongDimension);
    }

    #[test]
    fn empty_index_returns_no_neighbors() {
        let ann = AnnIndex::build(3, Vec::new()).unwrap();
        let (items, distances) = ann
            .nns_by_vector(&Vector::new(vec![0.0, 0.0, 0.0]), 5, 3)
            .unwrap();
        assert!(items.is_empty());
        assert!(distances.is_empty());
    }
}
