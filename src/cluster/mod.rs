//! Pixel clustering over fixed-dimension feature vectors
//!
//! Two interchangeable algorithms ([`KMeans`] and [`Dbscan`]) partition
//! points in a normalized feature space, accelerated by a [`KdTree`]. Both
//! produce the same [`Cluster`] shape so the extractor can stay agnostic of
//! which one ran.

pub mod dbscan;
pub mod kdtree;
pub mod kmeans;

pub use dbscan::Dbscan;
pub use kdtree::{KdTree, Neighbor};
pub use kmeans::{Initializer, KMeans, KMeansPlusPlus};

use rand::rngs::StdRng;

use crate::cancel::CancelToken;
use crate::error::{ExtractionError, Result};

/// Distance between two points; the clustering routines are parameterized
/// over this so callers can swap the metric
pub type DistanceFn<const D: usize> = fn(&[f64; D], &[f64; D]) -> f64;

/// Squared Euclidean distance, the default clustering metric
pub fn squared_euclidean<const D: usize>(a: &[f64; D], b: &[f64; D]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum()
}

/// Euclidean distance
pub fn euclidean<const D: usize>(a: &[f64; D], b: &[f64; D]) -> f64 {
    squared_euclidean(a, b).sqrt()
}

/// A group of input points represented by their arithmetic mean
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster<const D: usize> {
    /// Stable id in first-discovery order
    pub id: usize,
    /// Arithmetic mean of the member vectors
    pub centroid: [f64; D],
    /// Indices into the input point slice
    pub members: Vec<usize>,
}

impl<const D: usize> Cluster<D> {
    /// Number of member points
    pub fn population(&self) -> usize {
        self.members.len()
    }
}

/// A clustering algorithm over D-dimensional points
///
/// Implementations must be deterministic for a given input order and RNG
/// state, and must honor the cancel token at their outer loop boundaries.
pub trait Clusterer<const D: usize> {
    fn cluster(
        &self,
        points: &[[f64; D]],
        rng: &mut StdRng,
        cancel: &CancelToken,
    ) -> Result<Vec<Cluster<D>>>;
}

/// Reject point sets carrying NaN or infinite coordinates
///
/// Clustering distance math silently propagates non-finite values, so both
/// algorithms validate their input up front and name the offending point.
pub(crate) fn validate_finite<const D: usize>(points: &[[f64; D]]) -> Result<()> {
    for point in points {
        if point.iter().any(|v| !v.is_finite()) {
            return Err(ExtractionError::non_finite(point));
        }
    }
    Ok(())
}

/// Arithmetic mean of the selected points
pub(crate) fn centroid_of<const D: usize>(points: &[[f64; D]], members: &[usize]) -> [f64; D] {
    let mut sum = [0.0; D];
    for &index in members {
        for (axis, value) in points[index].iter().enumerate() {
            sum[axis] += value;
        }
    }
    let count = members.len() as f64;
    sum.map(|v| v / count)
}
