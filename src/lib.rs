//! # Extract Colors
//!
//! A Rust crate for extracting representative color palettes from raster
//! images.
//!
//! This library summarizes an RGBA pixel buffer into an ordered set of
//! swatches by:
//! - Converting pixels into CIE L*a*b*, where Euclidean distance tracks
//!   perceptual distance
//! - Clustering 5-dimensional `(L, a, b, x, y)` feature vectors with
//!   k-means (k-means++ seeded) or DBSCAN over a KD-tree index
//! - Filtering and scoring swatches with a theme strategy and selecting
//!   maximally distinct swatches under CIEDE2000
//!
//! ## Example
//!
//! ```rust
//! use extract_colors::{extract, ExtractOptions, ImageData};
//!
//! // A 2x1 image: one red pixel, one blue pixel
//! let pixels = [255u8, 0, 0, 255, 0, 0, 255, 255];
//! let image = ImageData::new(&pixels, 2, 1)?;
//! let options = ExtractOptions {
//!     max_colors: 2,
//!     seed: Some(7),
//!     ..Default::default()
//! };
//!
//! let palette = extract(&image, &options)?;
//! assert_eq!(palette.len(), 2);
//! println!("dominant: {}", palette.dominant_swatch()?.color.hex());
//! # Ok::<(), extract_colors::ExtractionError>(())
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;

pub mod cancel;
pub mod cluster;
pub mod color;
pub mod constants;
pub mod error;
pub mod extractor;
pub mod options;
pub mod palette;

pub use cancel::CancelToken;
pub use color::{ciede2000, Color, Hsl, Rgb, Rgba};
pub use error::{ExtractionError, Result};
pub use extractor::{Extractor, ImageData, PixelFilter};
pub use options::{Algorithm, DbscanOptions, ExtractOptions, FilterName, KmeansOptions};
pub use palette::{Coordinate, Palette, Swatch, Theme, ThemeName};

/// Extract a palette from an image
///
/// This is the main entry point. The pipeline filters pixels, clusters the
/// survivors in Lab-plus-position feature space, converts clusters into
/// swatches, and composes them into a [`Palette`] under the configured
/// theme strategy.
///
/// # Errors
///
/// Returns [`ExtractionError`] if:
/// - An option fails its eager validation (zero `max_colors`, negative
///   tolerance or radius)
/// - The image buffer is empty
pub fn extract(image: &ImageData<'_>, options: &ExtractOptions) -> Result<Palette> {
    extract_with_cancel(image, options, &CancelToken::new())
}

/// Extract a palette, honoring a cooperative cancel token
///
/// The token is checked between k-means iterations and between points of
/// the DBSCAN outer scan; a fired token surfaces as
/// [`ExtractionError::Cancelled`].
pub fn extract_with_cancel(
    image: &ImageData<'_>,
    options: &ExtractOptions,
    cancel: &CancelToken,
) -> Result<Palette> {
    let extractor = Extractor::from_options(options)?;
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let swatches = extractor.extract(image, &mut rng, cancel)?;
    Ok(Palette::new(swatches, options.theme.strategy()))
}
