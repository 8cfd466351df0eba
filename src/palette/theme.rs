//! Theme strategies for filtering and scoring swatches
//!
//! A theme expresses extraction intent: admit or reject a swatch, and score
//! the admitted ones in [0, 1] so palette selection can prefer the swatches
//! that best fit the intent. Strategies are small trait objects so callers
//! can supply their own.

use serde::{Deserialize, Serialize};

use crate::constants::theme::{LIGHTNESS_SPLIT, MAX_CHROMA, VIVID_CHROMA_THRESHOLD};
use crate::palette::Swatch;

/// Filter and score swatches by extraction intent
pub trait Theme {
    /// Admit or reject a swatch
    fn filter(&self, swatch: &Swatch) -> bool;

    /// Score an admitted swatch; higher is better, range [0, 1]
    fn score(&self, swatch: &Swatch) -> f64;
}

/// Chroma normalized into [0, 1] against the working chroma ceiling
fn normalized_chroma(swatch: &Swatch) -> f64 {
    (swatch.color.chroma() / MAX_CHROMA).clamp(0.0, 1.0)
}

/// Admits everything with a flat score
pub struct Basic;

impl Theme for Basic {
    fn filter(&self, _swatch: &Swatch) -> bool {
        true
    }

    fn score(&self, _swatch: &Swatch) -> f64 {
        1.0
    }
}

/// Prefers saturated colors
pub struct Vivid;

impl Theme for Vivid {
    fn filter(&self, swatch: &Swatch) -> bool {
        normalized_chroma(swatch) >= VIVID_CHROMA_THRESHOLD
    }

    fn score(&self, swatch: &Swatch) -> f64 {
        normalized_chroma(swatch)
    }
}

/// Prefers washed-out colors
pub struct Muted;

impl Theme for Muted {
    fn filter(&self, swatch: &Swatch) -> bool {
        normalized_chroma(swatch) < VIVID_CHROMA_THRESHOLD
    }

    fn score(&self, swatch: &Swatch) -> f64 {
        1.0 - normalized_chroma(swatch)
    }
}

/// Prefers bright colors
pub struct Light;

impl Theme for Light {
    fn filter(&self, swatch: &Swatch) -> bool {
        swatch.color.lightness() > LIGHTNESS_SPLIT
    }

    fn score(&self, swatch: &Swatch) -> f64 {
        swatch.color.lightness() / 100.0
    }
}

/// Prefers dark colors
pub struct Dark;

impl Theme for Dark {
    fn filter(&self, swatch: &Swatch) -> bool {
        swatch.color.lightness() <= LIGHTNESS_SPLIT
    }

    fn score(&self, swatch: &Swatch) -> f64 {
        1.0 - swatch.color.lightness() / 100.0
    }
}

/// Built-in strategy selector for the options surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeName {
    #[default]
    Basic,
    Vivid,
    Muted,
    Light,
    Dark,
}

impl ThemeName {
    /// Instantiate the named strategy
    pub fn strategy(self) -> Box<dyn Theme> {
        match self {
            ThemeName::Basic => Box::new(Basic),
            ThemeName::Vivid => Box::new(Vivid),
            ThemeName::Muted => Box::new(Muted),
            ThemeName::Light => Box::new(Light),
            ThemeName::Dark => Box::new(Dark),
        }
    }
}
