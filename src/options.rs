//! Extraction options
//!
//! All tunable parameters for an extraction, organized into logical groups
//! per algorithm. Options are plain serde-friendly data; validation happens
//! when the configured components are constructed, so a bad value fails
//! eagerly at the start of `extract` rather than mid-pipeline.

use serde::{Deserialize, Serialize};

use crate::constants::clustering;
use crate::palette::ThemeName;

/// Which clustering algorithm partitions the pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    #[default]
    Kmeans,
    Dbscan,
}

/// Built-in pixel filters, applied in the order configured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterName {
    /// Drop pixels with opacity below 1.0
    Alpha,
    /// Drop near-neutral pixels that read as background white
    NearWhite,
    /// Drop pixels that read as background black
    NearBlack,
}

/// K-means iteration parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KmeansOptions {
    /// Iteration cap
    pub max_iterations: usize,

    /// Convergence tolerance on per-cluster centroid displacement
    pub tolerance: f64,
}

impl Default for KmeansOptions {
    fn default() -> Self {
        Self {
            max_iterations: clustering::DEFAULT_MAX_ITERATIONS,
            tolerance: clustering::DEFAULT_TOLERANCE,
        }
    }
}

/// DBSCAN density parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbscanOptions {
    /// Neighbors (inclusive of the point itself) required for a core point
    pub min_points: usize,

    /// Neighborhood radius in the normalized feature space
    pub radius: f64,
}

impl Default for DbscanOptions {
    fn default() -> Self {
        Self {
            min_points: clustering::DEFAULT_MIN_POINTS,
            radius: clustering::DEFAULT_RADIUS,
        }
    }
}

/// Complete configuration for one extraction
///
/// Every field has a default, and deserialization fills omitted fields, so
/// hosts can send sparse configuration documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Number of swatches requested (the `k` of k-means)
    pub max_colors: usize,

    /// Clustering algorithm
    pub algorithm: Algorithm,

    /// Theme strategy filtering and scoring the palette
    pub theme: ThemeName,

    /// Pixel filters; a pixel must pass every configured filter
    pub filters: Vec<FilterName>,

    /// RNG seed; extraction is reproducible when set
    pub seed: Option<u64>,

    /// K-means parameters, used when `algorithm` is `Kmeans`
    pub kmeans: KmeansOptions,

    /// DBSCAN parameters, used when `algorithm` is `Dbscan`
    pub dbscan: DbscanOptions,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_colors: clustering::DEFAULT_MAX_COLORS,
            algorithm: Algorithm::default(),
            theme: ThemeName::default(),
            filters: vec![FilterName::Alpha],
            seed: None,
            kmeans: KmeansOptions::default(),
            dbscan: DbscanOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ExtractOptions::default();
        assert_eq!(options.max_colors, 8);
        assert_eq!(options.algorithm, Algorithm::Kmeans);
        assert_eq!(options.theme, ThemeName::Basic);
        assert_eq!(options.filters, vec![FilterName::Alpha]);
        assert_eq!(options.seed, None);
        assert_eq!(options.kmeans.max_iterations, 10);
        assert!((options.kmeans.tolerance - 1e-4).abs() < 1e-12);
        assert_eq!(options.dbscan.min_points, 9);
        assert!((options.dbscan.radius - 0.016).abs() < 1e-12);
    }

    #[test]
    fn test_serde_round_trip() {
        let options = ExtractOptions {
            max_colors: 5,
            algorithm: Algorithm::Dbscan,
            theme: ThemeName::Vivid,
            filters: vec![FilterName::Alpha, FilterName::NearWhite],
            seed: Some(99),
            ..Default::default()
        };
        let json = serde_json::to_string(&options).unwrap();
        let back: ExtractOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, options);
    }

    #[test]
    fn test_sparse_document_fills_defaults() {
        let options: ExtractOptions =
            serde_json::from_str(r#"{"max_colors": 3, "algorithm": "dbscan"}"#).unwrap();
        assert_eq!(options.max_colors, 3);
        assert_eq!(options.algorithm, Algorithm::Dbscan);
        assert_eq!(options.theme, ThemeName::Basic);
        assert_eq!(options.kmeans.max_iterations, 10);
    }
}
