use crate::core::error::{Error, ErrorKind, Result};

/// A dense float32 embedding. Every vector handed out by an index has
/// exactly the width announced in the wordlist header.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector(pub Vec<f32>);

impl Vector {
    pub fn new(components: Vec<f32>) -> Self {
        Vector(components)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn into_components(self) -> Vec<f32> {
        self.0
    }
}

impl From<Vec<f32>> for Vector {
    fn from(components: Vec<f32>) -> Self {
        Vector(components)
    }
}

/// Arithmetic mean of a non-empty set of equal-length vectors.
pub fn compute_centroid(vectors: &[Vector]) -> Result<Vector> {
    let weights = vec![1.0; vectors.len()];
    compute_weighted_centroid(vectors, &weights)
}

/// Weighted mean `sum(w_i * v_i) / sum(w_i)` of a non-empty set of
/// equal-length vectors.
pub fn compute_weighted_centroid(vectors: &[Vector], weights: &[f32]) -> Result<Vector> {
    if vectors.is_empty() {
        return Err(Error::new(
            ErrorKind::InvalidArgument,
            "can not compute the centroid of an empty list of vectors",
        ));
    }

    if vectors.len() != weights.len() {
        return Err(Error::new(
            ErrorKind::InvalidArgument,
            format!(
                "got {} vectors but {} weights",
                vectors.len(),
                weights.len()
            ),
        ));
    }

    let width = vectors[0].len();
    let mut sums = vec![0.0f32; width];
    let mut weight_sum = 0.0f32;

    for (vector, &weight) in vectors.iter().zip(weights) {
        if vector.len() != width {
            return Err(Error::new(
                ErrorKind::WrongDimension,
                format!(
                    "can not compute centroid of vectors of width {} and {}",
                    width,
                    vector.len()
                ),
            ));
        }

        for (sum, component) in sums.iter_mut().zip(vector.as_slice()) {
            *sum += component * weight;
        }
        weight_sum += weight;
    }

    if weight_sum == 0.0 {
        return Err(Error::new(
            ErrorKind::InvalidArgument,
            "weights sum to zero, centroid is undefined",
        ));
    }

    for sum in sums.iter_mut() {
        *sum /= weight_sum;
    }

    Ok(Vector(sums))
}

pub fn euclidean_distance(a: &Vector, b: &Vector) -> Result<f32> {
    if a.len() != b.len() {
        return Err(Error::new(
            ErrorKind::WrongDimension,
            format!("distance of vectors of width {} and {}", a.len(), b.len()),
        ));
    }

    let sum: f32 = a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(x, y)| (x - y) * (x - y))
        .sum();

    Ok(sum.sqrt())
}

/// Converts a vector distance to a certainty. A linear scale for now.
pub fn distance_to_certainty(distance: f32) -> f32 {
    1.0 - distance / 12.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centroid_of_single_vector_is_identity() {
        let v = Vector::new(vec![1.0, 2.0, 3.0]);
        let centroid = compute_centroid(std::slice::from_ref(&v)).unwrap();
        assert_eq!(centroid, v);
    }

    #[test]
    fn centroid_of_duplicated_vector_is_identity() {
        let v = Vector::new(vec![0.5, -1.0, 4.0]);
        let centroid = compute_centroid(&[v.clone(), v.clone()]).unwrap();
        assert_eq!(centroid, v);

        let weighted = compute_weighted_centroid(&[v.clone(), v.clone()], &[0.3, 2.7]).unwrap();
        assert_eq!(weighted, v);
    }

    #[test]
    fn weighted_centroid_skews_toward_heavier_vector() {
        let a = Vector::new(vec![1.0, 2.0, 0.0, 0.0]);
        let b = Vector::new(vec![1.0, 0.0, 0.0, 4.0]);

        let centroid = compute_weighted_centroid(&[a.clone(), b.clone()], &[0.0, 1.0]).unwrap();
        assert_eq!(centroid, b);

        let centroid = compute_weighted_centroid(&[a, b], &[0.5, 1.0]).unwrap();
        assert_eq!(centroid.as_slice(), &[1.0, 2.0 / 3.0, 0.0, 8.0 / 3.0]);
    }

    #[test]
    fn centroid_of_nothing_is_an_error() {
        let err = compute_centroid(&[]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }

    #[test]
    fn centroid_rejects_mismatched_widths() {
        let a = Vector::new(vec![1.0, 2.0]);
        let b = Vector::new(vec![1.0, 2.0, 3.0]);
        let err = compute_centroid(&[a, b]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::WrongDimension);
    }

    #[test]
    fn distance_and_certainty() {
        let a = Vector::new(vec![0.0, 0.0]);
        let b = Vector::new(vec![3.0, 4.0]);
        assert_eq!(euclidean_distance(&a, &b).unwrap(), 5.0);
        assert_eq!(distance_to_certainty(0.0), 1.0);
        assert_eq!(distance_to_certainty(12.0), 0.0);
    }
}
