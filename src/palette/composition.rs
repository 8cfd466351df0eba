//! Palette composition and swatch selection
//!
//! A [`Palette`] is built from the extractor's swatches and a theme
//! strategy: the strategy filters the candidates, the survivors are ordered
//! by descending population, and the perceptual queries below run over that
//! fixed sequence. Palettes are immutable after construction.

use crate::color::ciede2000;
use crate::error::{ExtractionError, Result};
use crate::palette::{Swatch, Theme};

/// Ordered collection of swatches with perceptual selection queries
pub struct Palette {
    swatches: Vec<Swatch>,
    theme: Box<dyn Theme>,
}

impl std::fmt::Debug for Palette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Palette")
            .field("swatches", &self.swatches)
            .finish()
    }
}

impl Palette {
    /// Filter swatches through the strategy and order by descending
    /// population; ties keep their first-appearance order
    pub fn new(swatches: Vec<Swatch>, theme: Box<dyn Theme>) -> Self {
        let mut kept: Vec<Swatch> = swatches
            .into_iter()
            .filter(|swatch| theme.filter(swatch))
            .collect();
        kept.sort_by(|a, b| b.population.cmp(&a.population));
        Self {
            swatches: kept,
            theme,
        }
    }

    /// Number of swatches that survived the theme filter
    pub fn len(&self) -> usize {
        self.swatches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.swatches.is_empty()
    }

    /// All swatches in palette order (descending population)
    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    /// The highest-population swatch
    ///
    /// # Errors
    ///
    /// Fails with [`ExtractionError::EmptyPalette`] when nothing survived
    /// the theme filter.
    pub fn dominant_swatch(&self) -> Result<Swatch> {
        self.swatches
            .first()
            .copied()
            .ok_or(ExtractionError::EmptyPalette)
    }

    /// Choose `count` swatches that are maximally distinct under CIEDE2000
    ///
    /// Greedy farthest-point selection: the seed is the swatch maximizing
    /// `population x score`, and each following pick maximizes the minimum
    /// perceptual distance to the already-selected set. Ties resolve by
    /// higher score, then higher population, then lower palette index.
    /// Asking for at least [`len`](Self::len) swatches returns all of them.
    ///
    /// # Errors
    ///
    /// Fails with a validation error when `count` is zero.
    pub fn find_swatches(&self, count: usize) -> Result<Vec<Swatch>> {
        if count == 0 {
            return Err(ExtractionError::invalid_parameter("count", count));
        }
        if count >= self.swatches.len() {
            return Ok(self.swatches.clone());
        }

        let scores: Vec<f64> = self
            .swatches
            .iter()
            .map(|swatch| self.theme.score(swatch))
            .collect();

        let seed = self.seed_index(&scores);
        let mut selected = vec![seed];

        while selected.len() < count {
            let mut best: Option<(usize, f64)> = None;
            for (index, swatch) in self.swatches.iter().enumerate() {
                if selected.contains(&index) {
                    continue;
                }
                let separation = selected
                    .iter()
                    .map(|&chosen| ciede2000(swatch.color, self.swatches[chosen].color))
                    .fold(f64::INFINITY, f64::min);
                let replace = match best {
                    None => true,
                    Some((current, current_separation)) => {
                        separation > current_separation
                            || (separation == current_separation
                                && self.prefer(index, current, &scores))
                    }
                };
                if replace {
                    best = Some((index, separation));
                }
            }
            match best {
                Some((index, _)) => selected.push(index),
                None => break,
            }
        }

        Ok(selected
            .into_iter()
            .map(|index| self.swatches[index])
            .collect())
    }

    /// Swatches whose hue lies within `tolerance` degrees of `target` on
    /// the hue circle, in palette order
    pub fn swatches_with_hue(&self, target: f64, tolerance: f64) -> Vec<Swatch> {
        let target = target.rem_euclid(360.0);
        self.swatches
            .iter()
            .filter(|swatch| {
                let gap = (swatch.color.hue() - target).abs();
                gap.min(360.0 - gap) <= tolerance
            })
            .copied()
            .collect()
    }

    /// Index maximizing population x score
    fn seed_index(&self, scores: &[f64]) -> usize {
        let mut seed = 0;
        let mut seed_weight = self.swatches[0].population as f64 * scores[0];
        for index in 1..self.swatches.len() {
            let weight = self.swatches[index].population as f64 * scores[index];
            if weight > seed_weight || (weight == seed_weight && self.prefer(index, seed, scores)) {
                seed = index;
                seed_weight = weight;
            }
        }
        seed
    }

    /// Tie-break: higher score, then higher population, then lower index
    fn prefer(&self, candidate: usize, incumbent: usize, scores: &[f64]) -> bool {
        if scores[candidate] != scores[incumbent] {
            return scores[candidate] > scores[incumbent];
        }
        if self.swatches[candidate].population != self.swatches[incumbent].population {
            return self.swatches[candidate].population > self.swatches[incumbent].population;
        }
        candidate < incumbent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, Rgb};
    use crate::palette::theme::{Basic, Vivid};
    use crate::palette::Coordinate;

    fn swatch(rgb: (u8, u8, u8), population: usize) -> Swatch {
        Swatch::new(
            Color::from_rgb(Rgb {
                r: rgb.0,
                g: rgb.1,
                b: rgb.2,
            }),
            population,
            Coordinate { x: 0.0, y: 0.0 },
        )
    }

    #[test]
    fn test_ordering_is_descending_population() {
        let palette = Palette::new(
            vec![
                swatch((10, 10, 10), 3),
                swatch((200, 0, 0), 9),
                swatch((0, 0, 200), 6),
            ],
            Box::new(Basic),
        );
        let populations: Vec<usize> =
            palette.swatches().iter().map(|s| s.population).collect();
        assert_eq!(populations, vec![9, 6, 3]);
    }

    #[test]
    fn test_population_ties_keep_first_appearance() {
        let red = swatch((255, 0, 0), 5);
        let blue = swatch((0, 0, 255), 5);
        let palette = Palette::new(vec![red, blue], Box::new(Basic));
        assert_eq!(palette.swatches()[0], red);
        assert_eq!(palette.swatches()[1], blue);
    }

    #[test]
    fn test_dominant_swatch() {
        let palette = Palette::new(
            vec![swatch((0, 255, 0), 2), swatch((255, 0, 0), 7)],
            Box::new(Basic),
        );
        assert_eq!(palette.dominant_swatch().unwrap().population, 7);

        let empty = Palette::new(Vec::new(), Box::new(Basic));
        assert_eq!(
            empty.dominant_swatch().unwrap_err(),
            ExtractionError::EmptyPalette
        );
    }

    #[test]
    fn test_theme_filter_applies_at_construction() {
        // A neutral gray fails the vivid chroma floor
        let palette = Palette::new(
            vec![swatch((128, 128, 128), 100), swatch((255, 0, 0), 1)],
            Box::new(Vivid),
        );
        assert_eq!(palette.len(), 1);
        assert_eq!(palette.dominant_swatch().unwrap().population, 1);
    }

    #[test]
    fn test_find_swatches_zero_is_range_error() {
        let palette = Palette::new(vec![swatch((255, 0, 0), 1)], Box::new(Basic));
        assert!(matches!(
            palette.find_swatches(0).unwrap_err(),
            ExtractionError::InvalidParameter { .. }
        ));
    }

    #[test]
    fn test_find_swatches_returns_all_when_count_covers() {
        let palette = Palette::new(
            vec![swatch((255, 0, 0), 2), swatch((0, 0, 255), 1)],
            Box::new(Basic),
        );
        assert_eq!(palette.find_swatches(2).unwrap().len(), 2);
        assert_eq!(palette.find_swatches(10).unwrap().len(), 2);
    }

    #[test]
    fn test_find_swatches_one_is_dominant_under_basic() {
        let palette = Palette::new(
            vec![
                swatch((255, 0, 0), 4),
                swatch((0, 0, 255), 9),
                swatch((0, 255, 0), 2),
            ],
            Box::new(Basic),
        );
        let chosen = palette.find_swatches(1).unwrap();
        assert_eq!(chosen.len(), 1);
        assert_eq!(chosen[0], palette.dominant_swatch().unwrap());
    }

    #[test]
    fn test_find_swatches_prefers_distinct_colors() {
        // Two near-identical reds and one blue: picking two must include
        // the blue rather than the second red
        let dominant_red = swatch((255, 0, 0), 10);
        let near_red = swatch((250, 5, 5), 9);
        let blue = swatch((0, 0, 255), 1);
        let palette = Palette::new(vec![dominant_red, near_red, blue], Box::new(Basic));

        let chosen = palette.find_swatches(2).unwrap();
        assert_eq!(chosen[0], dominant_red);
        assert_eq!(chosen[1], blue);
    }

    #[test]
    fn test_swatches_with_hue() {
        let red = swatch((255, 0, 0), 3); // Lab hue around 40 degrees
        let blue = swatch((0, 0, 255), 2); // Lab hue around 306 degrees
        let palette = Palette::new(vec![red, blue], Box::new(Basic));

        let reds = palette.swatches_with_hue(red.color.hue(), 10.0);
        assert_eq!(reds, vec![red]);

        // Wrap-around: a target just below 360 still matches the blue side
        let wrapped = palette.swatches_with_hue(blue.color.hue() + 350.0, 15.0);
        assert_eq!(wrapped, vec![blue]);

        assert_eq!(palette.swatches_with_hue(180.0, 5.0).len(), 0);
    }
}
