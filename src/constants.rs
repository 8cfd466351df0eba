//! Reference values and tunable defaults for palette extraction
//!
//! This module contains compile-time constants for the color math and the
//! clustering defaults, grouped by the subsystem that consumes them.

/// D65 Standard Illuminant Reference
///
/// CIE Standard Illuminant D65 represents average daylight with a correlated
/// color temperature of 6504K. All Lab math in this crate is relative to D65
/// with the 2 degree standard observer.
pub mod d65 {
    /// D65 white point in CIE XYZ, scaled so Y = 100
    /// Source: CIE 15:2004 Colorimetry, 3rd edition
    pub const WHITE_X: f64 = 95.047;
    pub const WHITE_Y: f64 = 100.000;
    pub const WHITE_Z: f64 = 108.883;
}

/// sRGB transfer function constants
///
/// From IEC 61966-2-1:1999. The piecewise companding function is linear below
/// the threshold and a 2.4 power curve above it.
pub mod srgb {
    /// Encoded-domain threshold for the linear segment
    pub const ENCODED_THRESHOLD: f64 = 0.04045;

    /// Linear-domain threshold for the inverse direction
    pub const LINEAR_THRESHOLD: f64 = 0.003_130_8;

    /// Linear segment slope
    pub const LINEAR_SLOPE: f64 = 12.92;

    /// Power curve scale factor
    pub const SCALE: f64 = 1.055;

    /// Power curve offset
    pub const OFFSET: f64 = 0.055;

    /// Power curve exponent
    pub const GAMMA: f64 = 2.4;
}

/// CIELAB constants and channel ranges
pub mod lab {
    /// Threshold of the piecewise f(t) function, (6/29)^3
    pub const EPSILON: f64 = 0.008_856;

    /// Linear slope of f(t) below the threshold, (29/6)^2 / 3
    pub const KAPPA: f64 = 7.787;

    /// Additive offset of the linear segment, 16/116
    pub const LINEAR_OFFSET: f64 = 16.0 / 116.0;

    /// Declared channel ranges used for clamping and normalization
    pub const L_MIN: f64 = 0.0;
    pub const L_MAX: f64 = 100.0;
    pub const AB_MIN: f64 = -128.0;
    pub const AB_MAX: f64 = 128.0;

    /// Per-component tolerance for structural color equality
    pub const COMPONENT_TOLERANCE: f64 = 1e-6;
}

/// Clustering defaults and limits
pub mod clustering {
    /// Default number of swatches requested from an extraction
    pub const DEFAULT_MAX_COLORS: usize = 8;

    /// Default k-means iteration cap
    pub const DEFAULT_MAX_ITERATIONS: usize = 10;

    /// Default k-means convergence tolerance on centroid displacement
    pub const DEFAULT_TOLERANCE: f64 = 1e-4;

    /// Default DBSCAN core-point neighbor count
    pub const DEFAULT_MIN_POINTS: usize = 9;

    /// Default DBSCAN neighborhood radius in normalized feature space
    pub const DEFAULT_RADIUS: f64 = 0.016;

    /// Maximum number of points stored in one KD-tree leaf
    pub const KDTREE_LEAF_SIZE: usize = 16;
}

/// Theme scoring thresholds
pub mod theme {
    /// Upper bound used to normalize Lab chroma into [0, 1]
    pub const MAX_CHROMA: f64 = 180.0;

    /// Normalized chroma at which a color counts as vivid
    pub const VIVID_CHROMA_THRESHOLD: f64 = 0.35;

    /// Lightness boundary between the light and dark themes
    pub const LIGHTNESS_SPLIT: f64 = 50.0;
}

/// Pixel filter thresholds
pub mod filter {
    /// Lightness above which a near-neutral pixel counts as background white
    pub const NEAR_WHITE_MIN_LIGHTNESS: f64 = 95.0;

    /// Chroma below which a bright pixel counts as neutral
    pub const NEAR_WHITE_MAX_CHROMA: f64 = 8.0;

    /// Lightness below which a pixel counts as background black
    pub const NEAR_BLACK_MAX_LIGHTNESS: f64 = 5.0;
}
