//! DBSCAN density clustering
//!
//! Grows clusters from core points (at least `min_points` neighbors within
//! `radius`) by breadth-first expansion over a queue. Points reachable from
//! no core are noise and never appear in the output. Cluster ids follow the
//! order the outer scan first discovers a core point, so output is
//! deterministic for a given input order.

use std::collections::VecDeque;

use rand::rngs::StdRng;

use crate::cancel::CancelToken;
use crate::cluster::{centroid_of, validate_finite, Cluster, Clusterer, DistanceFn, KdTree};
use crate::error::{ExtractionError, Result};

/// Per-point scan state
#[derive(Debug, Clone, Copy, PartialEq)]
enum Label {
    /// Not yet visited
    Unknown,
    /// Queued for expansion but not yet assigned
    Marked,
    /// Visited with too few neighbors, may still become a boundary point
    Noise,
    /// Assigned to the cluster with this id
    Assigned(usize),
}

/// Density clusterer with noise rejection
pub struct Dbscan<const D: usize> {
    min_points: usize,
    radius: f64,
    /// Custom metric; `None` keeps the Euclidean default and the KD-tree
    /// region index (the tree prune is unsound for arbitrary metrics)
    distance: Option<DistanceFn<D>>,
}

impl<const D: usize> Dbscan<D> {
    /// Create a clusterer with the Euclidean metric
    ///
    /// # Errors
    ///
    /// Fails eagerly with a validation error when `min_points` is zero or
    /// `radius` is negative or non-finite.
    pub fn new(min_points: usize, radius: f64) -> Result<Self> {
        if min_points == 0 {
            return Err(ExtractionError::invalid_parameter("min_points", min_points));
        }
        if !radius.is_finite() || radius < 0.0 {
            return Err(ExtractionError::invalid_parameter("radius", radius));
        }
        Ok(Self {
            min_points,
            radius,
            distance: None,
        })
    }

    /// Create a clusterer with a caller-supplied metric; region queries fall
    /// back to an exhaustive scan
    pub fn with_distance(min_points: usize, radius: f64, distance: DistanceFn<D>) -> Result<Self> {
        let mut dbscan = Self::new(min_points, radius)?;
        dbscan.distance = Some(distance);
        Ok(dbscan)
    }

    /// Indices of all points within `radius` of point `center`, including
    /// the point itself
    fn region_of(
        &self,
        points: &[[f64; D]],
        index: Option<&KdTree<D>>,
        center: usize,
    ) -> Vec<usize> {
        match (self.distance, index) {
            (None, Some(tree)) => tree
                .search_radius(&points[center], self.radius)
                .iter()
                .map(|neighbor| neighbor.index)
                .collect(),
            (Some(distance), _) => points
                .iter()
                .enumerate()
                .filter(|(_, point)| distance(&points[center], point) <= self.radius)
                .map(|(i, _)| i)
                .collect(),
            (None, None) => Vec::new(),
        }
    }
}

impl<const D: usize> Clusterer<D> for Dbscan<D> {
    fn cluster(
        &self,
        points: &[[f64; D]],
        _rng: &mut StdRng,
        cancel: &CancelToken,
    ) -> Result<Vec<Cluster<D>>> {
        validate_finite(points)?;
        if points.is_empty() {
            return Ok(Vec::new());
        }

        let index = if self.distance.is_none() {
            Some(KdTree::build(points))
        } else {
            None
        };

        let mut labels = vec![Label::Unknown; points.len()];
        let mut clusters: Vec<Vec<usize>> = Vec::new();
        let mut queue = VecDeque::new();

        for start in 0..points.len() {
            cancel.check()?;
            if labels[start] != Label::Unknown {
                continue;
            }

            let neighbors = self.region_of(points, index.as_ref(), start);
            if neighbors.len() < self.min_points {
                labels[start] = Label::Noise;
                continue;
            }

            // New cluster seeded from this core point
            let id = clusters.len();
            labels[start] = Label::Assigned(id);
            clusters.push(vec![start]);

            queue.clear();
            for &neighbor in &neighbors {
                match labels[neighbor] {
                    Label::Unknown => {
                        labels[neighbor] = Label::Marked;
                        queue.push_back(neighbor);
                    }
                    Label::Noise => queue.push_back(neighbor),
                    _ => {}
                }
            }

            while let Some(current) = queue.pop_front() {
                match labels[current] {
                    Label::Assigned(_) => continue,
                    Label::Noise => {
                        // Boundary point: joins the cluster but never expands
                        labels[current] = Label::Assigned(id);
                        clusters[id].push(current);
                    }
                    Label::Unknown | Label::Marked => {
                        labels[current] = Label::Assigned(id);
                        clusters[id].push(current);

                        let expansion = self.region_of(points, index.as_ref(), current);
                        if expansion.len() >= self.min_points {
                            for &neighbor in &expansion {
                                match labels[neighbor] {
                                    Label::Unknown => {
                                        labels[neighbor] = Label::Marked;
                                        queue.push_back(neighbor);
                                    }
                                    Label::Noise => queue.push_back(neighbor),
                                    _ => {}
                                }
                            }
                        }
                    }
                }
            }
        }

        Ok(clusters
            .into_iter()
            .enumerate()
            .map(|(id, members)| Cluster {
                id,
                centroid: centroid_of(points, &members),
                members,
            })
            .collect())
    }
}
