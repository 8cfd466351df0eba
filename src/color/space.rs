//! Color space conversion formulas
//!
//! Implements the standard CIE conversions used by the extraction pipeline:
//! - sRGB <-> linear RGB companding (IEC 61966-2-1)
//! - linear RGB <-> CIE XYZ under the D65 illuminant, 2 degree observer
//! - XYZ <-> CIE L*a*b* with the piecewise f(t) function
//! - RGB <-> HSL
//!
//! All channel inputs are clamped to their declared ranges before use, and
//! RGB outputs are clamped to [0, 255], so a Lab round-trip of an in-gamut
//! color stays within one RGB unit per channel.

use crate::constants::{d65, lab, srgb};

/// Linear sRGB -> XYZ matrix (row-major), IEC 61966-2-1 primaries with D65
const RGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.412_456_4, 0.357_576_1, 0.180_437_5],
    [0.212_672_9, 0.715_152_2, 0.072_175_0],
    [0.019_333_9, 0.119_192_0, 0.950_304_1],
];

/// XYZ -> linear sRGB matrix, inverse of [`RGB_TO_XYZ`]
const XYZ_TO_RGB: [[f64; 3]; 3] = [
    [3.240_454_2, -1.537_138_5, -0.498_531_4],
    [-0.969_266_0, 1.876_010_8, 0.041_556_0],
    [0.055_643_4, -0.204_025_9, 1.057_225_2],
];

/// Expand one sRGB-encoded channel (0..1) to linear light
pub fn srgb_to_linear(u: f64) -> f64 {
    if u <= srgb::ENCODED_THRESHOLD {
        u / srgb::LINEAR_SLOPE
    } else {
        ((u + srgb::OFFSET) / srgb::SCALE).powf(srgb::GAMMA)
    }
}

/// Compress one linear channel (0..1) back to sRGB encoding
pub fn linear_to_srgb(u: f64) -> f64 {
    if u <= srgb::LINEAR_THRESHOLD {
        u * srgb::LINEAR_SLOPE
    } else {
        srgb::SCALE * u.powf(1.0 / srgb::GAMMA) - srgb::OFFSET
    }
}

/// Convert sRGB channels (0..255) to CIE XYZ scaled so that Y of white is 100
///
/// Channels are clamped to [0, 255] before use.
pub fn rgb_to_xyz(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let rl = srgb_to_linear(r.clamp(0.0, 255.0) / 255.0);
    let gl = srgb_to_linear(g.clamp(0.0, 255.0) / 255.0);
    let bl = srgb_to_linear(b.clamp(0.0, 255.0) / 255.0);

    let x = RGB_TO_XYZ[0][0] * rl + RGB_TO_XYZ[0][1] * gl + RGB_TO_XYZ[0][2] * bl;
    let y = RGB_TO_XYZ[1][0] * rl + RGB_TO_XYZ[1][1] * gl + RGB_TO_XYZ[1][2] * bl;
    let z = RGB_TO_XYZ[2][0] * rl + RGB_TO_XYZ[2][1] * gl + RGB_TO_XYZ[2][2] * bl;

    (x * 100.0, y * 100.0, z * 100.0)
}

/// Convert CIE XYZ (Y of white = 100) to sRGB channels clamped to [0, 255]
pub fn xyz_to_rgb(x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    let xs = x / 100.0;
    let ys = y / 100.0;
    let zs = z / 100.0;

    let rl = XYZ_TO_RGB[0][0] * xs + XYZ_TO_RGB[0][1] * ys + XYZ_TO_RGB[0][2] * zs;
    let gl = XYZ_TO_RGB[1][0] * xs + XYZ_TO_RGB[1][1] * ys + XYZ_TO_RGB[1][2] * zs;
    let bl = XYZ_TO_RGB[2][0] * xs + XYZ_TO_RGB[2][1] * ys + XYZ_TO_RGB[2][2] * zs;

    (
        (linear_to_srgb(rl) * 255.0).clamp(0.0, 255.0),
        (linear_to_srgb(gl) * 255.0).clamp(0.0, 255.0),
        (linear_to_srgb(bl) * 255.0).clamp(0.0, 255.0),
    )
}

/// Piecewise f(t) of the Lab forward transform
fn lab_f(t: f64) -> f64 {
    if t > lab::EPSILON {
        t.cbrt()
    } else {
        lab::KAPPA * t + lab::LINEAR_OFFSET
    }
}

/// Inverse of [`lab_f`], symmetric piecewise form
fn lab_f_inv(t: f64) -> f64 {
    let cubed = t * t * t;
    if cubed > lab::EPSILON {
        cubed
    } else {
        (t - lab::LINEAR_OFFSET) / lab::KAPPA
    }
}

/// Convert CIE XYZ (Y of white = 100) to L*a*b* under D65
pub fn xyz_to_lab(x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    let fx = lab_f(x / d65::WHITE_X);
    let fy = lab_f(y / d65::WHITE_Y);
    let fz = lab_f(z / d65::WHITE_Z);

    (116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz))
}

/// Convert L*a*b* under D65 back to CIE XYZ (Y of white = 100)
pub fn lab_to_xyz(l: f64, a: f64, b: f64) -> (f64, f64, f64) {
    let fy = (l + 16.0) / 116.0;
    let fx = fy + a / 500.0;
    let fz = fy - b / 200.0;

    (
        lab_f_inv(fx) * d65::WHITE_X,
        lab_f_inv(fy) * d65::WHITE_Y,
        lab_f_inv(fz) * d65::WHITE_Z,
    )
}

/// Convert sRGB channels (0..255, clamped) to L*a*b*
pub fn rgb_to_lab(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let (x, y, z) = rgb_to_xyz(r, g, b);
    xyz_to_lab(x, y, z)
}

/// Convert L*a*b* to sRGB channels clamped to [0, 255]
pub fn lab_to_rgb(l: f64, a: f64, b: f64) -> (f64, f64, f64) {
    let (x, y, z) = lab_to_xyz(l, a, b);
    xyz_to_rgb(x, y, z)
}

/// Convert sRGB channels (0..255, clamped) to HSL
///
/// Hue is in degrees [0, 360); saturation and lightness are in [0, 1].
pub fn rgb_to_hsl(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let rn = r.clamp(0.0, 255.0) / 255.0;
    let gn = g.clamp(0.0, 255.0) / 255.0;
    let bn = b.clamp(0.0, 255.0) / 255.0;

    let max = rn.max(gn).max(bn);
    let min = rn.min(gn).min(bn);
    let l = (max + min) / 2.0;

    if max == min {
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = d / (1.0 - (2.0 * l - 1.0).abs());

    let mut h = if max == rn {
        (gn - bn) / d
    } else if max == gn {
        (bn - rn) / d + 2.0
    } else {
        (rn - gn) / d + 4.0
    } * 60.0;
    if h < 0.0 {
        h += 360.0;
    }

    (h, s, l)
}

/// Convert HSL (hue in degrees, s/l in [0, 1]) to sRGB channels in [0, 255]
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let h = h.rem_euclid(360.0);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
    let m = l - c / 2.0;

    let (rn, gn, bn) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    ((rn + m) * 255.0, (gn + m) * 255.0, (bn + m) * 255.0)
}
