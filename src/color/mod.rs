//! Color machinery: value types, space conversions, perceptual difference
//!
//! Everything downstream of the pixel walk reasons in CIE L*a*b*, where
//! Euclidean distance approximates perceptual distance; this module owns the
//! conversions in and out of that space and the CIEDE2000 metric used for
//! palette selection.

pub mod difference;
pub mod space;
pub mod types;

pub use difference::ciede2000;
pub use types::{parse_hex, Color, Hsl, Rgb, Rgba};
