//! Swatch: a representative color with its support in the image

use serde::Serialize;

use crate::color::Color;

/// Mean pixel position of a swatch in 0-indexed image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

/// A representative color paired with the number of source pixels it stands
/// for and the population-weighted mean position of those pixels
///
/// Every swatch that reaches a palette has `population >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Swatch {
    pub color: Color,
    pub population: usize,
    pub coordinate: Coordinate,
}

impl Swatch {
    pub fn new(color: Color, population: usize, coordinate: Coordinate) -> Self {
        Self {
            color,
            population,
            coordinate,
        }
    }
}
