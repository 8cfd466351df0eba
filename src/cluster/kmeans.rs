//! K-means clustering with k-means++ seeding
//!
//! Lloyd-style iteration: assign every point to its nearest center through a
//! KD-tree built over the current centers, then recompute each centroid as
//! the mean of its members. Iteration stops once every cluster's centroid
//! displacement falls below the tolerance, or at the iteration cap. The
//! whole run is deterministic for a given RNG state.

use rand::rngs::StdRng;
use rand::Rng;

use crate::cancel::CancelToken;
use crate::cluster::{
    centroid_of, squared_euclidean, validate_finite, Cluster, Clusterer, DistanceFn, KdTree,
};
use crate::constants::clustering;
use crate::error::{ExtractionError, Result};

/// Strategy for choosing the initial cluster centers
pub trait Initializer<const D: usize> {
    /// Pick up to `k` starting centers from the input points
    ///
    /// May return fewer than `k` centers when the input does not contain
    /// `k` distinct points.
    fn select(
        &self,
        points: &[[f64; D]],
        k: usize,
        distance: DistanceFn<D>,
        rng: &mut StdRng,
    ) -> Vec<[f64; D]>;
}

/// k-means++ seeding
///
/// The first center is drawn uniformly; each subsequent center is drawn with
/// probability proportional to its distance from the nearest already-chosen
/// center (the D^2 weighting under the default squared-Euclidean metric).
/// Selection stops early once every remaining point coincides with a chosen
/// center, which returns exactly the set of unique input points.
pub struct KMeansPlusPlus;

impl<const D: usize> Initializer<D> for KMeansPlusPlus {
    fn select(
        &self,
        points: &[[f64; D]],
        k: usize,
        distance: DistanceFn<D>,
        rng: &mut StdRng,
    ) -> Vec<[f64; D]> {
        if points.is_empty() || k == 0 {
            return Vec::new();
        }

        let mut centers = Vec::with_capacity(k);
        let first = rng.gen_range(0..points.len());
        centers.push(points[first]);

        // Running distance from each point to its nearest chosen center
        let mut weights: Vec<f64> = points.iter().map(|p| distance(p, &points[first])).collect();

        while centers.len() < k {
            let total: f64 = weights.iter().sum();
            if total <= 0.0 {
                // Every point coincides with a chosen center: the centers
                // are exactly the unique input points
                break;
            }

            let threshold = rng.gen::<f64>() * total;
            let mut cumulative = 0.0;
            let mut chosen = None;
            for (index, &weight) in weights.iter().enumerate() {
                cumulative += weight;
                if cumulative >= threshold && weight > 0.0 {
                    chosen = Some(index);
                    break;
                }
            }
            // Guard against accumulated rounding leaving the loop without a
            // pick: fall back to the largest remaining weight
            let chosen = match chosen {
                Some(index) => index,
                None => {
                    match weights
                        .iter()
                        .enumerate()
                        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
                    {
                        Some((index, _)) => index,
                        None => break,
                    }
                }
            };

            centers.push(points[chosen]);
            for (weight, point) in weights.iter_mut().zip(points.iter()) {
                let d = distance(point, &points[chosen]);
                if d < *weight {
                    *weight = d;
                }
            }
        }

        centers
    }
}

/// Partitional clusterer with seeded centers
pub struct KMeans<const D: usize> {
    k: usize,
    max_iterations: usize,
    tolerance: f64,
    distance: DistanceFn<D>,
    initializer: Box<dyn Initializer<D>>,
}

impl<const D: usize> KMeans<D> {
    /// Create a clusterer for `k` clusters with the default iteration cap,
    /// tolerance, squared-Euclidean metric and k-means++ seeding
    pub fn new(k: usize) -> Result<Self> {
        Self::with_params(
            k,
            clustering::DEFAULT_MAX_ITERATIONS,
            clustering::DEFAULT_TOLERANCE,
        )
    }

    /// Create a clusterer with explicit iteration and convergence parameters
    ///
    /// # Errors
    ///
    /// Fails eagerly with a validation error when `k` or `max_iterations`
    /// is zero, or `tolerance` is negative or non-finite.
    pub fn with_params(k: usize, max_iterations: usize, tolerance: f64) -> Result<Self> {
        if k == 0 {
            return Err(ExtractionError::invalid_parameter("k", k));
        }
        if max_iterations == 0 {
            return Err(ExtractionError::invalid_parameter(
                "max_iterations",
                max_iterations,
            ));
        }
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ExtractionError::invalid_parameter("tolerance", tolerance));
        }
        Ok(Self {
            k,
            max_iterations,
            tolerance,
            distance: squared_euclidean,
            initializer: Box::new(KMeansPlusPlus),
        })
    }

    /// Replace the distance function
    pub fn with_distance(mut self, distance: DistanceFn<D>) -> Self {
        self.distance = distance;
        self
    }

    /// Replace the center initializer
    pub fn with_initializer(mut self, initializer: Box<dyn Initializer<D>>) -> Self {
        self.initializer = initializer;
        self
    }
}

impl<const D: usize> Clusterer<D> for KMeans<D> {
    fn cluster(
        &self,
        points: &[[f64; D]],
        rng: &mut StdRng,
        cancel: &CancelToken,
    ) -> Result<Vec<Cluster<D>>> {
        validate_finite(points)?;
        if points.is_empty() {
            return Ok(Vec::new());
        }

        // Degenerate case: no more points than clusters, every point is its
        // own singleton and no iteration runs
        if points.len() <= self.k {
            return Ok(points
                .iter()
                .enumerate()
                .map(|(id, point)| Cluster {
                    id,
                    centroid: *point,
                    members: vec![id],
                })
                .collect());
        }

        let mut centers = self.initializer.select(points, self.k, self.distance, rng);
        let mut members: Vec<Vec<usize>> = vec![Vec::new(); centers.len()];

        for _ in 0..self.max_iterations {
            cancel.check()?;

            let index = KdTree::build(&centers);
            for list in &mut members {
                list.clear();
            }
            for (point_id, point) in points.iter().enumerate() {
                if let Some(hit) = index.nearest(point) {
                    members[hit.index].push(point_id);
                }
            }

            // An empty cluster keeps its previous centroid and counts as
            // converged for this round
            let mut max_shift = 0.0_f64;
            for (center, member) in centers.iter_mut().zip(members.iter()) {
                if member.is_empty() {
                    continue;
                }
                let updated = centroid_of(points, member);
                let shift = (self.distance)(center, &updated);
                max_shift = max_shift.max(shift);
                *center = updated;
            }

            if max_shift < self.tolerance {
                break;
            }
        }

        Ok(centers
            .iter()
            .zip(members)
            .filter(|(_, member)| !member.is_empty())
            .enumerate()
            .map(|(id, (center, member))| Cluster {
                id,
                centroid: *center,
                members: member,
            })
            .collect())
    }
}
