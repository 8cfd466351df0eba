//! Palette composition: swatches, theme strategies, selection
//!
//! Clusters become [`Swatch`]es, a [`Theme`] filters and scores them, and
//! the [`Palette`] orders the survivors and answers the perceptual queries.

pub mod composition;
pub mod swatch;
pub mod theme;

pub use composition::Palette;
pub use swatch::{Coordinate, Swatch};
pub use theme::{Basic, Dark, Light, Muted, Theme, ThemeName, Vivid};
