//! KD-tree spatial index
//!
//! Accelerates the nearest-center lookups of k-means and the radius queries
//! of DBSCAN. Nodes live in a flat arena addressed by index; a node is
//! either a leaf holding a small run of point indices or an internal split
//! on the dimension with maximum variance. The tree owns a copy of its
//! points and is immutable once built.

use crate::constants::clustering::KDTREE_LEAF_SIZE;

/// A query result: the index of an input point and its Euclidean distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f64,
}

enum Node {
    /// Range into the permuted index array
    Leaf { start: usize, end: usize },
    /// Split on `dim` at `value`; points with coordinate <= value go left
    Internal {
        dim: usize,
        value: f64,
        left: usize,
        right: usize,
    },
}

/// Immutable KD-tree over `D`-dimensional points under the Euclidean metric
pub struct KdTree<const D: usize> {
    nodes: Vec<Node>,
    points: Vec<[f64; D]>,
    indices: Vec<usize>,
    root: usize,
}

impl<const D: usize> KdTree<D> {
    /// Build a tree over the given points; indices in query results refer to
    /// positions in this slice
    pub fn build(points: &[[f64; D]]) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            points: points.to_vec(),
            indices: (0..points.len()).collect(),
            root: 0,
        };
        if !points.is_empty() {
            tree.root = tree.build_node(0, points.len());
        }
        tree
    }

    /// Number of indexed points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn build_node(&mut self, start: usize, end: usize) -> usize {
        if end - start <= KDTREE_LEAF_SIZE {
            self.nodes.push(Node::Leaf { start, end });
            return self.nodes.len() - 1;
        }

        let dim = self.widest_dimension(start, end);
        let mid = (end - start) / 2;
        let Self {
            points, indices, ..
        } = self;
        indices[start..end].select_nth_unstable_by(mid, |&a, &b| {
            points[a][dim]
                .partial_cmp(&points[b][dim])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let value = self.points[self.indices[start + mid]][dim];

        let left = self.build_node(start, start + mid);
        let right = self.build_node(start + mid, end);
        self.nodes.push(Node::Internal {
            dim,
            value,
            left,
            right,
        });
        self.nodes.len() - 1
    }

    /// Dimension with the largest coordinate variance over the range
    fn widest_dimension(&self, start: usize, end: usize) -> usize {
        let count = (end - start) as f64;
        let mut best = (0, f64::MIN);
        for dim in 0..D {
            let mut sum = 0.0;
            let mut sum_sq = 0.0;
            for &index in &self.indices[start..end] {
                let v = self.points[index][dim];
                sum += v;
                sum_sq += v * v;
            }
            let variance = sum_sq / count - (sum / count) * (sum / count);
            if variance > best.1 {
                best = (dim, variance);
            }
        }
        best.0
    }

    /// Find the closest indexed point to the query
    ///
    /// Ties on distance resolve to the lowest index. Returns `None` only for
    /// an empty tree. Querying with one of the input points returns that
    /// point itself at distance zero.
    pub fn nearest(&self, query: &[f64; D]) -> Option<Neighbor> {
        if self.is_empty() {
            return None;
        }
        let mut best = Neighbor {
            index: usize::MAX,
            distance: f64::INFINITY,
        };
        self.nearest_in(self.root, query, &mut best);
        Some(best)
    }

    fn nearest_in(&self, node: usize, query: &[f64; D], best: &mut Neighbor) {
        match self.nodes[node] {
            Node::Leaf { start, end } => {
                for &index in &self.indices[start..end] {
                    let distance = distance_to(query, &self.points[index]);
                    if distance < best.distance
                        || (distance == best.distance && index < best.index)
                    {
                        *best = Neighbor { index, distance };
                    }
                }
            }
            Node::Internal {
                dim,
                value,
                left,
                right,
            } => {
                let (near, far) = if query[dim] <= value {
                    (left, right)
                } else {
                    (right, left)
                };
                self.nearest_in(near, query, best);
                // The far side can only improve on the best candidate when
                // the splitting plane is within the current best radius;
                // equality is included so index ties stay reachable
                if (query[dim] - value).abs() <= best.distance {
                    self.nearest_in(far, query, best);
                }
            }
        }
    }

    /// Collect every indexed point within `radius` of the query
    ///
    /// Output order follows the tree traversal and is identical across runs
    /// for the same tree and query.
    pub fn search_radius(&self, query: &[f64; D], radius: f64) -> Vec<Neighbor> {
        let mut found = Vec::new();
        if !self.is_empty() && radius >= 0.0 {
            self.radius_in(self.root, query, radius, &mut found);
        }
        found
    }

    fn radius_in(&self, node: usize, query: &[f64; D], radius: f64, found: &mut Vec<Neighbor>) {
        match self.nodes[node] {
            Node::Leaf { start, end } => {
                for &index in &self.indices[start..end] {
                    let distance = distance_to(query, &self.points[index]);
                    if distance <= radius {
                        found.push(Neighbor { index, distance });
                    }
                }
            }
            Node::Internal {
                dim,
                value,
                left,
                right,
            } => {
                // Equal coordinates can land on either side of the split, so
                // both prune tests are inclusive
                if query[dim] - radius <= value {
                    self.radius_in(left, query, radius, found);
                }
                if query[dim] + radius >= value {
                    self.radius_in(right, query, radius, found);
                }
            }
        }
    }
}

fn distance_to<const D: usize>(a: &[f64; D], b: &[f64; D]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
