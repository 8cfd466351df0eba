//! Extraction pipeline
//!
//! Walks the borrowed RGBA buffer row-major, filters pixels, lifts the
//! survivors into normalized `(L, a, b, x, y)` feature vectors, hands those
//! to the configured clusterer, and folds the resulting clusters back into
//! swatches with denormalized colors and image coordinates.

use rand::rngs::StdRng;

use crate::cancel::CancelToken;
use crate::cluster::{Cluster, Clusterer, Dbscan, KMeans};
use crate::color::{space, Color, Rgba};
use crate::constants::{filter, lab};
use crate::error::{ExtractionError, Result};
use crate::options::{Algorithm, ExtractOptions, FilterName};
use crate::palette::{Coordinate, Swatch};

/// Feature vectors carry three color and two spatial components
pub const FEATURE_DIMENSIONS: usize = 5;

/// A borrowed RGBA8 image buffer with known dimensions
///
/// Pixel `i` occupies bytes `[4i, 4i + 4)` in row-major order; the alpha
/// byte is interpreted as opacity `a / 255`. The buffer is only read.
#[derive(Debug, Clone, Copy)]
pub struct ImageData<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
}

impl<'a> ImageData<'a> {
    /// Wrap a pixel buffer
    ///
    /// # Errors
    ///
    /// Fails with a validation error when the buffer length does not equal
    /// `4 * width * height`.
    pub fn new(data: &'a [u8], width: u32, height: u32) -> Result<Self> {
        let expected = 4 * width as usize * height as usize;
        if data.len() != expected {
            return Err(ExtractionError::invalid_parameter(
                "data",
                format!(
                    "length {} for {}x{} image (expected {})",
                    data.len(),
                    width,
                    height,
                    expected
                ),
            ));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    pub fn data(&self) -> &[u8] {
        self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Admit or reject individual pixels before clustering
///
/// Filters see both the raw RGBA value and its Lab conversion so intent can
/// be expressed in whichever space is natural.
pub trait PixelFilter {
    fn allows(&self, rgba: Rgba, lab: &Color) -> bool;
}

/// Drops pixels that are not fully opaque
pub struct AlphaFilter;

impl PixelFilter for AlphaFilter {
    fn allows(&self, rgba: Rgba, _lab: &Color) -> bool {
        rgba.opacity() >= 1.0
    }
}

/// Drops bright near-neutral pixels, typically scanned-page background
pub struct NearWhiteFilter;

impl PixelFilter for NearWhiteFilter {
    fn allows(&self, _rgba: Rgba, lab: &Color) -> bool {
        !(lab.lightness() > filter::NEAR_WHITE_MIN_LIGHTNESS
            && lab.chroma() < filter::NEAR_WHITE_MAX_CHROMA)
    }
}

/// Drops pixels darker than the black floor
pub struct NearBlackFilter;

impl PixelFilter for NearBlackFilter {
    fn allows(&self, _rgba: Rgba, lab: &Color) -> bool {
        lab.lightness() >= filter::NEAR_BLACK_MAX_LIGHTNESS
    }
}

impl FilterName {
    /// Instantiate the named filter
    pub fn filter(self) -> Box<dyn PixelFilter> {
        match self {
            FilterName::Alpha => Box::new(AlphaFilter),
            FilterName::NearWhite => Box::new(NearWhiteFilter),
            FilterName::NearBlack => Box::new(NearBlackFilter),
        }
    }
}

/// Orchestrates one extraction: pixels to feature vectors to swatches
pub struct Extractor {
    clusterer: Box<dyn Clusterer<FEATURE_DIMENSIONS>>,
    filters: Vec<Box<dyn PixelFilter>>,
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor")
            .field("filters_count", &self.filters.len())
            .finish()
    }
}

impl Extractor {
    /// Build an extractor from the caller's options
    ///
    /// # Errors
    ///
    /// Propagates the eager parameter validation of the configured
    /// clusterer (zero `max_colors`, negative tolerance or radius, ...).
    pub fn from_options(options: &ExtractOptions) -> Result<Self> {
        let clusterer: Box<dyn Clusterer<FEATURE_DIMENSIONS>> = match options.algorithm {
            Algorithm::Kmeans => Box::new(KMeans::with_params(
                options.max_colors,
                options.kmeans.max_iterations,
                options.kmeans.tolerance,
            )?),
            Algorithm::Dbscan => Box::new(Dbscan::new(
                options.dbscan.min_points,
                options.dbscan.radius,
            )?),
        };
        Ok(Self {
            clusterer,
            filters: options.filters.iter().map(|name| name.filter()).collect(),
        })
    }

    /// Run the pipeline and emit one swatch per non-empty cluster
    ///
    /// Returns an empty list when every pixel was filtered out.
    ///
    /// # Errors
    ///
    /// Fails with [`ExtractionError::EmptyImage`] on a zero-length buffer,
    /// and with [`ExtractionError::Cancelled`] if the token fires.
    pub fn extract(
        &self,
        image: &ImageData<'_>,
        rng: &mut StdRng,
        cancel: &CancelToken,
    ) -> Result<Vec<Swatch>> {
        if image.data().is_empty() {
            return Err(ExtractionError::EmptyImage);
        }

        let points = self.feature_vectors(image);
        if points.is_empty() {
            return Ok(Vec::new());
        }

        let clusters = self.clusterer.cluster(&points, rng, cancel)?;
        let swatches = clusters
            .iter()
            .filter(|cluster| !cluster.members.is_empty())
            .map(|cluster| self.swatch_of(cluster, image))
            .collect();
        Ok(merge_equal_colors(swatches))
    }

    /// Row-major pixel walk producing normalized feature vectors
    fn feature_vectors(&self, image: &ImageData<'_>) -> Vec<[f64; FEATURE_DIMENSIONS]> {
        let width = image.width() as usize;
        let span_ab = lab::AB_MAX - lab::AB_MIN;
        let mut points = Vec::new();

        for (pixel, bytes) in image.data().chunks_exact(4).enumerate() {
            let rgba = Rgba::from([bytes[0], bytes[1], bytes[2], bytes[3]]);
            let (l, a, b) = space::rgb_to_lab(rgba.r as f64, rgba.g as f64, rgba.b as f64);
            let color = Color::new(l, a, b);
            if !self.filters.iter().all(|f| f.allows(rgba, &color)) {
                continue;
            }

            let x = (pixel % width) as f64;
            let y = (pixel / width) as f64;
            points.push([
                color.l() / lab::L_MAX,
                (color.a() - lab::AB_MIN) / span_ab,
                (color.b() - lab::AB_MIN) / span_ab,
                x / image.width() as f64,
                y / image.height() as f64,
            ]);
        }
        points
    }

    /// Denormalize a centroid back into a color and image coordinate
    fn swatch_of(&self, cluster: &Cluster<FEATURE_DIMENSIONS>, image: &ImageData<'_>) -> Swatch {
        let span_ab = lab::AB_MAX - lab::AB_MIN;
        let centroid = cluster.centroid;
        let color = Color::new(
            centroid[0] * lab::L_MAX,
            centroid[1] * span_ab + lab::AB_MIN,
            centroid[2] * span_ab + lab::AB_MIN,
        );
        let coordinate = Coordinate {
            x: centroid[3] * image.width() as f64,
            y: centroid[4] * image.height() as f64,
        };
        Swatch::new(color, cluster.population(), coordinate)
    }
}

/// Collapse swatches whose colors are structurally equal
///
/// Spatially separate clusters of a solid region denormalize to the same
/// color; a solid image must still yield a single full-population swatch.
/// Populations add and coordinates combine population-weighted.
fn merge_equal_colors(swatches: Vec<Swatch>) -> Vec<Swatch> {
    let mut merged: Vec<Swatch> = Vec::new();
    for swatch in swatches {
        match merged.iter_mut().find(|kept| kept.color == swatch.color) {
            Some(kept) => {
                let total = (kept.population + swatch.population) as f64;
                let kept_weight = kept.population as f64;
                let new_weight = swatch.population as f64;
                kept.coordinate = Coordinate {
                    x: (kept.coordinate.x * kept_weight + swatch.coordinate.x * new_weight)
                        / total,
                    y: (kept.coordinate.y * kept_weight + swatch.coordinate.y * new_weight)
                        / total,
                };
                kept.population += swatch.population;
            }
            None => merged.push(swatch),
        }
    }
    merged
}
