//! Integration tests for the complete extraction pipeline
//!
//! These tests validate the end-to-end workflow including:
//! - Pixel filtering and feature-vector construction
//! - Clustering under both algorithms
//! - Cluster-to-swatch conversion and palette composition
//! - Theme strategies and perceptual selection
//! - Error handling for edge cases

use extract_colors::{
    extract, extract_with_cancel, Algorithm, CancelToken, Color, ExtractOptions, ExtractionError,
    ImageData, Rgb, ThemeName,
};

/// Build an RGBA buffer from per-pixel `(r, g, b, a)` tuples
fn buffer(pixels: &[(u8, u8, u8, u8)]) -> Vec<u8> {
    pixels
        .iter()
        .flat_map(|&(r, g, b, a)| [r, g, b, a])
        .collect()
}

fn seeded(max_colors: usize) -> ExtractOptions {
    ExtractOptions {
        max_colors,
        seed: Some(42),
        ..Default::default()
    }
}

// ============================================================================
// Core Scenarios
// ============================================================================

#[test]
fn test_solid_red_image_yields_single_full_population_swatch() {
    // 4x4 image of #FF0000FF: one swatch, population 16, hex red
    let bytes = buffer(&[(255, 0, 0, 255); 16]);
    let image = ImageData::new(&bytes, 4, 4).unwrap();

    let palette = extract(&image, &seeded(3)).unwrap();

    assert_eq!(palette.len(), 1);
    let swatch = palette.dominant_swatch().unwrap();
    assert_eq!(swatch.population, 16);
    assert_eq!(swatch.color.hex(), "#FF0000");
}

#[test]
fn test_half_red_half_blue() {
    // 2x1 image [#FF0000FF, #0000FFFF] with max_colors = 2: one swatch per
    // color, each standing for a single pixel
    let bytes = buffer(&[(255, 0, 0, 255), (0, 0, 255, 255)]);
    let image = ImageData::new(&bytes, 2, 1).unwrap();

    let palette = extract(&image, &seeded(2)).unwrap();

    assert_eq!(palette.len(), 2);
    let hexes: Vec<String> = palette.swatches().iter().map(|s| s.color.hex()).collect();
    assert!(hexes.contains(&"#FF0000".to_string()));
    assert!(hexes.contains(&"#0000FF".to_string()));
    assert!(palette.swatches().iter().all(|s| s.population == 1));
}

#[test]
fn test_transparent_pixels_are_filtered() {
    // The fully transparent green pixel never reaches clustering
    let bytes = buffer(&[(255, 0, 0, 255), (0, 255, 0, 0)]);
    let image = ImageData::new(&bytes, 2, 1).unwrap();

    let palette = extract(&image, &seeded(2)).unwrap();

    assert_eq!(palette.len(), 1);
    let swatch = palette.dominant_swatch().unwrap();
    assert_eq!(swatch.color.hex(), "#FF0000");
    assert_eq!(swatch.population, 1);
}

#[test]
fn test_population_ordering_and_dominance() {
    // 12 red pixels, 4 blue pixels: red dominates and comes first
    let mut pixels = vec![(200, 20, 20, 255); 12];
    pixels.extend(vec![(20, 20, 200, 255); 4]);
    let bytes = buffer(&pixels);
    let image = ImageData::new(&bytes, 4, 4).unwrap();

    let palette = extract(&image, &seeded(2)).unwrap();

    assert!(palette.len() >= 1);
    let populations: Vec<usize> = palette.swatches().iter().map(|s| s.population).collect();
    let mut sorted = populations.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(populations, sorted);

    // Membership partitions the surviving pixels
    assert_eq!(populations.iter().sum::<usize>(), 16);

    let dominant = palette.dominant_swatch().unwrap();
    assert_eq!(dominant, palette.swatches()[0]);
    assert!(dominant.population >= 16 / palette.len());
}

#[test]
fn test_swatch_coordinates_stay_inside_image() {
    let mut pixels = Vec::new();
    for i in 0..36u32 {
        let shade = (i * 7 % 256) as u8;
        pixels.push((shade, 255 - shade, 100, 255));
    }
    let bytes = buffer(&pixels);
    let image = ImageData::new(&bytes, 6, 6).unwrap();

    let palette = extract(&image, &seeded(4)).unwrap();

    for swatch in palette.swatches() {
        assert!(swatch.population >= 1);
        assert!(swatch.coordinate.x >= 0.0 && swatch.coordinate.x < 6.0);
        assert!(swatch.coordinate.y >= 0.0 && swatch.coordinate.y < 6.0);
    }
}

// ============================================================================
// Algorithm Selection
// ============================================================================

#[test]
fn test_dbscan_extraction_discards_sparse_noise() {
    // A dense run of red plus one isolated blue pixel; the blue pixel has
    // no neighbors within the radius and is dropped as noise
    let mut pixels = vec![(255, 0, 0, 255); 15];
    pixels.push((0, 0, 255, 255));
    let bytes = buffer(&pixels);
    let image = ImageData::new(&bytes, 16, 1).unwrap();

    let options = ExtractOptions {
        algorithm: Algorithm::Dbscan,
        dbscan: extract_colors::DbscanOptions {
            min_points: 3,
            radius: 0.1,
        },
        seed: Some(1),
        ..Default::default()
    };
    let palette = extract(&image, &options).unwrap();

    assert_eq!(palette.len(), 1);
    let swatch = palette.dominant_swatch().unwrap();
    assert_eq!(swatch.color.hex(), "#FF0000");
    assert!(swatch.population >= 3);
}

#[test]
fn test_kmeans_caps_swatch_count() {
    let mut pixels = Vec::new();
    for i in 0..64u32 {
        pixels.push(((i * 3) as u8, (i * 5 % 256) as u8, (255 - i * 2) as u8, 255));
    }
    let bytes = buffer(&pixels);
    let image = ImageData::new(&bytes, 8, 8).unwrap();

    let palette = extract(&image, &seeded(5)).unwrap();
    assert!(palette.len() <= 5);
    assert!(palette.len() >= 1);
}

// ============================================================================
// Themes and Selection
// ============================================================================

#[test]
fn test_vivid_theme_drops_neutral_swatches() {
    // One neutral gray pixel, one saturated red pixel; each becomes its own
    // swatch and the vivid chroma floor rejects the gray
    let bytes = buffer(&[(128, 128, 128, 255), (255, 0, 0, 255)]);
    let image = ImageData::new(&bytes, 2, 1).unwrap();

    let options = ExtractOptions {
        theme: ThemeName::Vivid,
        ..seeded(2)
    };
    let palette = extract(&image, &options).unwrap();

    assert_eq!(palette.len(), 1);
    assert_eq!(palette.dominant_swatch().unwrap().color.hex(), "#FF0000");

    // The muted theme admits exactly the swatch vivid rejected
    let muted = ExtractOptions {
        theme: ThemeName::Muted,
        ..seeded(2)
    };
    let palette = extract(&image, &muted).unwrap();
    assert_eq!(palette.len(), 1);
    assert_eq!(palette.dominant_swatch().unwrap().color.hex(), "#808080");
}

#[test]
fn test_find_swatches_selects_distinct_colors() {
    // Two shades of red and one blue, one pixel each; asking for two
    // swatches must span the red/blue divide rather than return both reds
    let bytes = buffer(&[
        (255, 0, 0, 255),
        (245, 10, 10, 255),
        (0, 0, 255, 255),
    ]);
    let image = ImageData::new(&bytes, 3, 1).unwrap();

    let palette = extract(&image, &seeded(3)).unwrap();
    assert_eq!(palette.len(), 3);

    let chosen = palette.find_swatches(2).unwrap();
    assert_eq!(chosen.len(), 2);
    let gap = extract_colors::ciede2000(chosen[0].color, chosen[1].color);
    assert!(gap > 20.0, "selected swatches too similar: {gap}");

    // Requesting more swatches than exist returns them all
    let all = palette.find_swatches(100).unwrap();
    assert_eq!(all.len(), palette.len());

    // Zero is a range error
    assert!(matches!(
        palette.find_swatches(0).unwrap_err(),
        ExtractionError::InvalidParameter { .. }
    ));
}

// ============================================================================
// Error Handling
// ============================================================================

#[test]
fn test_empty_image_error() {
    let image = ImageData::new(&[], 0, 0).unwrap();
    let err = extract(&image, &ExtractOptions::default()).unwrap_err();
    assert_eq!(err, ExtractionError::EmptyImage);
}

#[test]
fn test_mismatched_buffer_is_rejected() {
    let bytes = [0u8; 12];
    assert!(ImageData::new(&bytes, 2, 2).is_err());
}

#[test]
fn test_zero_max_colors_is_rejected() {
    let bytes = buffer(&[(10, 20, 30, 255)]);
    let image = ImageData::new(&bytes, 1, 1).unwrap();
    let err = extract(&image, &seeded(0)).unwrap_err();
    assert!(matches!(err, ExtractionError::InvalidParameter { .. }));
}

#[test]
fn test_cancelled_extraction() {
    let bytes = buffer(&[(77, 77, 77, 255); 64]);
    let image = ImageData::new(&bytes, 8, 8).unwrap();
    let token = CancelToken::new();
    token.cancel();
    let err = extract_with_cancel(&image, &seeded(3), &token).unwrap_err();
    assert_eq!(err, ExtractionError::Cancelled);
}

#[test]
fn test_empty_palette_query() {
    // Everything is transparent, so the palette has no swatches
    let bytes = buffer(&[(255, 0, 0, 0); 4]);
    let image = ImageData::new(&bytes, 2, 2).unwrap();
    let palette = extract(&image, &seeded(2)).unwrap();

    assert!(palette.is_empty());
    assert_eq!(
        palette.dominant_swatch().unwrap_err(),
        ExtractionError::EmptyPalette
    );
}

// ============================================================================
// Serialization
// ============================================================================

#[test]
fn test_swatch_json_shape() {
    let bytes = buffer(&[(0, 0, 255, 255); 4]);
    let image = ImageData::new(&bytes, 2, 2).unwrap();
    let palette = extract(&image, &seeded(1)).unwrap();

    let json = serde_json::to_value(palette.swatches()).unwrap();
    let swatch = &json[0];
    assert_eq!(swatch["color"]["hex"], "#0000FF");
    assert!(swatch["color"]["rgb"]["b"].is_number());
    assert!(swatch["color"]["hsl"]["h"].is_number());
    assert!(swatch["color"]["lab"]["l"].is_number());
    assert_eq!(swatch["population"], 4);
    assert!(swatch["coordinate"]["x"].is_number());
}

// ============================================================================
// Cross-Validation Against an Independent Implementation
// ============================================================================

#[test]
fn test_lab_conversion_agrees_with_palette_crate() {
    use palette::{FromColor, Srgb};

    for &(r, g, b) in &[
        (255u8, 0u8, 0u8),
        (0, 255, 0),
        (0, 0, 255),
        (255, 255, 255),
        (1, 2, 3),
        (128, 64, 200),
        (17, 230, 99),
    ] {
        let ours = Color::from_rgb(Rgb { r, g, b });
        let theirs: palette::Lab = palette::Lab::from_color(Srgb::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
        ));

        assert!((ours.l() - theirs.l as f64).abs() < 0.5, "L for {r},{g},{b}");
        assert!((ours.a() - theirs.a as f64).abs() < 0.5, "a for {r},{g},{b}");
        assert!((ours.b() - theirs.b as f64).abs() < 0.5, "b for {r},{g},{b}");
    }
}
