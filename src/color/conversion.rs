//! Color space conversion utilities
//!
//! Provides the 8-bit sRGB <-> CIE L*a*b* conversions every engine stage
//! runs per pixel:
//! - sRGB gamma decode/encode
//! - D65 linear RGB <-> XYZ
//! - XYZ <-> Lab pivot normalized by the reference white
//! - Lab gamut clamp and ΔE76 color difference
//!
//! Intermediate math runs in `f64`; only the resulting Lab is stored as
//! `f32`, which keeps 8-bit round trips exact for in-gamut colors.

use palette::{Lab, Srgb};

use crate::constants::{d65, lab_range, transfer, D65_WHITE_POINT_XYZ};

/// sRGB <-> Lab converter bound to a reference white point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorConverter {
    /// Reference white in XYZ (Xn, Yn, Zn)
    white_point: [f64; 3],
}

impl Default for ColorConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorConverter {
    /// Create a new color converter with D65 as reference white
    pub fn new() -> Self {
        Self {
            white_point: D65_WHITE_POINT_XYZ,
        }
    }

    /// Reference white in XYZ
    pub fn white_point(&self) -> [f64; 3] {
        self.white_point
    }

    /// Convert RGB (0-255) to Lab color space
    ///
    /// # Arguments
    ///
    /// * `r`, `g`, `b` - sRGB values in range [0, 255]
    ///
    /// # Returns
    ///
    /// Unclamped Lab color under the converter's reference white
    pub fn rgb_to_lab(&self, r: u8, g: u8, b: u8) -> Lab {
        let lr = srgb_decode(r as f64 / 255.0);
        let lg = srgb_decode(g as f64 / 255.0);
        let lb = srgb_decode(b as f64 / 255.0);

        let m = &d65::SRGB_TO_XYZ;
        let x = m[0][0] * lr + m[0][1] * lg + m[0][2] * lb;
        let y = m[1][0] * lr + m[1][1] * lg + m[1][2] * lb;
        let z = m[2][0] * lr + m[2][1] * lg + m[2][2] * lb;

        let fx = lab_pivot(x / self.white_point[0]);
        let fy = lab_pivot(y / self.white_point[1]);
        let fz = lab_pivot(z / self.white_point[2]);

        Lab::new(
            (116.0 * fy - 16.0) as f32,
            (500.0 * (fx - fy)) as f32,
            (200.0 * (fy - fz)) as f32,
        )
    }

    /// Convert an sRGB triple to Lab
    pub fn srgb_to_lab(&self, rgb: Srgb<u8>) -> Lab {
        self.rgb_to_lab(rgb.red, rgb.green, rgb.blue)
    }

    /// Convert Lab to 8-bit sRGB
    ///
    /// Channels are rounded and clamped to [0, 255], so out-of-gamut Lab
    /// values land on the nearest representable RGB per channel.
    pub fn lab_to_rgb(&self, lab: Lab) -> Srgb<u8> {
        let fy = (lab.l as f64 + 16.0) / 116.0;
        let fx = lab.a as f64 / 500.0 + fy;
        let fz = fy - lab.b as f64 / 200.0;

        let x = lab_pivot_inv(fx) * self.white_point[0];
        let y = lab_pivot_inv(fy) * self.white_point[1];
        let z = lab_pivot_inv(fz) * self.white_point[2];

        let m = &d65::XYZ_TO_SRGB;
        let lr = m[0][0] * x + m[0][1] * y + m[0][2] * z;
        let lg = m[1][0] * x + m[1][1] * y + m[1][2] * z;
        let lb = m[2][0] * x + m[2][1] * y + m[2][2] * z;

        Srgb::new(
            to_byte(srgb_encode(lr)),
            to_byte(srgb_encode(lg)),
            to_byte(srgb_encode(lb)),
        )
    }

    /// Compute Delta E (color difference) between two Lab colors
    ///
    /// Uses simple Euclidean distance (ΔE76)
    pub fn delta_e(&self, lab1: Lab, lab2: Lab) -> f32 {
        let dl = lab1.l - lab2.l;
        let da = lab1.a - lab2.a;
        let db = lab1.b - lab2.b;
        (dl * dl + da * da + db * db).sqrt()
    }
}

/// Clamp a Lab color into L ∈ [0, 100], a, b ∈ [-128, 127]
pub fn clamp_lab(lab: Lab) -> Lab {
    Lab::new(
        lab.l.clamp(lab_range::L_MIN, lab_range::L_MAX),
        lab.a.clamp(lab_range::AB_MIN, lab_range::AB_MAX),
        lab.b.clamp(lab_range::AB_MIN, lab_range::AB_MAX),
    )
}

#[inline]
fn srgb_decode(v: f64) -> f64 {
    if v <= transfer::SRGB_DECODE_THRESHOLD {
        v / transfer::SRGB_LINEAR_SLOPE
    } else {
        ((v + 0.055) / 1.055).powf(transfer::SRGB_GAMMA)
    }
}

#[inline]
fn srgb_encode(v: f64) -> f64 {
    if v <= transfer::SRGB_ENCODE_THRESHOLD {
        transfer::SRGB_LINEAR_SLOPE * v
    } else {
        1.055 * v.powf(1.0 / transfer::SRGB_GAMMA) - 0.055
    }
}

#[inline]
fn lab_pivot(v: f64) -> f64 {
    if v > transfer::LAB_EPSILON {
        v.cbrt()
    } else {
        transfer::LAB_KAPPA_SLOPE * v + transfer::LAB_OFFSET
    }
}

#[inline]
fn lab_pivot_inv(v: f64) -> f64 {
    if v > transfer::LAB_EPSILON.cbrt() {
        v * v * v
    } else {
        (v - transfer::LAB_OFFSET) / transfer::LAB_KAPPA_SLOPE
    }
}

#[inline]
fn to_byte(v: f64) -> u8 {
    // NaN saturates to 0 in `as` casts; the clamp handles the rest
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}
