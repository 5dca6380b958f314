//! Fixed Lab-space shifts
//!
//! A shift adds the same (ΔL, Δa, Δb) to every pixel. Shifts are derived
//! either from an image's own statistics against a target color (exposure
//! and white balance recovery) or from a measured sample against a desired
//! palette color (spot matching).

use palette::Lab;
use serde::{Deserialize, Serialize};

use super::{blend_channel, Strength};
use crate::buffer::PixelBuffer;
use crate::color::{clamp_lab, compute_lab_stats, mean_lab_around, ColorConverter, LabStats};
use crate::constants::statistics::DEFAULT_SPOT_RADIUS;
use crate::error::Result;

/// Additive Lab delta
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LabShift {
    pub l: f32,
    pub a: f32,
    pub b: f32,
}

impl LabShift {
    pub const ZERO: LabShift = LabShift {
        l: 0.0,
        a: 0.0,
        b: 0.0,
    };

    pub fn new(l: f32, a: f32, b: f32) -> Self {
        Self { l, a, b }
    }

    /// Shift that moves `from` onto `to`
    pub fn between(from: Lab, to: Lab) -> Self {
        Self {
            l: to.l - from.l,
            a: to.a - from.a,
            b: to.b - from.b,
        }
    }

    /// A zero shift is a defined no-op
    pub fn is_zero(&self) -> bool {
        self.l == 0.0 && self.a == 0.0 && self.b == 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.l.is_finite() && self.a.is_finite() && self.b.is_finite()
    }

    /// Add this shift to a color, clamped into the valid Lab ranges
    pub fn apply_to(&self, lab: Lab) -> Lab {
        clamp_lab(Lab::new(lab.l + self.l, lab.a + self.a, lab.b + self.b))
    }
}

/// Add `shift` to every pixel of `buffer` in Lab space, in place
///
/// An absent or zero shift leaves the buffer byte-identical.
pub fn apply_lab_shift<'a>(
    buffer: &'a mut PixelBuffer,
    shift: Option<&LabShift>,
    strength: Strength,
) -> &'a mut PixelBuffer {
    let shift = match shift {
        Some(s) if !s.is_zero() => *s,
        _ => return buffer,
    };

    let converter = ColorConverter::new();
    for px in buffer.pixels_mut() {
        let lab = converter.rgb_to_lab(px[0], px[1], px[2]);
        let moved = converter.lab_to_rgb(shift.apply_to(lab));
        px[0] = blend_channel(px[0], moved.red, strength);
        px[1] = blend_channel(px[1], moved.green, strength);
        px[2] = blend_channel(px[2], moved.blue, strength);
    }

    buffer
}

/// Derive an exposure / white balance recovery shift
///
/// ΔL moves the mean lightness onto `target.l` when `auto_exposure` is set;
/// Δa and Δb move the mean chroma onto `target.a`, `target.b` when
/// `auto_white_balance` is set. Disabled axes stay at zero.
pub fn compute_recovery_shift(
    stats: &LabStats,
    target: Lab,
    auto_exposure: bool,
    auto_white_balance: bool,
) -> LabShift {
    let full = LabShift::between(stats.mean, target);
    LabShift {
        l: if auto_exposure { full.l } else { 0.0 },
        a: if auto_white_balance { full.a } else { 0.0 },
        b: if auto_white_balance { full.b } else { 0.0 },
    }
}

/// Where a spot measurement is taken from
#[derive(Debug, Clone, Copy)]
pub enum SpotSample<'a> {
    /// Mean Lab of an entire sample image
    Image(&'a PixelBuffer),
    /// Mean Lab of a square neighborhood around a picked pixel
    Point {
        buffer: &'a PixelBuffer,
        x: u32,
        y: u32,
        radius: u32,
    },
}

impl<'a> SpotSample<'a> {
    /// Neighborhood sample with the default radius
    pub fn point(buffer: &'a PixelBuffer, x: u32, y: u32) -> Self {
        SpotSample::Point {
            buffer,
            x,
            y,
            radius: DEFAULT_SPOT_RADIUS,
        }
    }

    /// Measure the sample's Lab color
    ///
    /// # Errors
    ///
    /// `EmptyInput` for an empty sample image, `SamplePointOutOfBounds` for
    /// a picked pixel outside its buffer.
    pub fn measure(&self) -> Result<Lab> {
        match *self {
            SpotSample::Image(buffer) => Ok(compute_lab_stats(buffer, 1)?.mean),
            SpotSample::Point {
                buffer,
                x,
                y,
                radius,
            } => mean_lab_around(buffer, x, y, radius),
        }
    }
}

/// Result of matching a measured sample to a palette color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotMeasurement {
    pub measured: Lab,
    pub target: Lab,
    pub shift: LabShift,
    /// ΔE76 between measured and target before correction
    pub delta_e: f32,
}

/// Derive the shift that moves a measured sample onto a palette color
pub fn spot_shift(target: Lab, sample: &SpotSample<'_>) -> Result<SpotMeasurement> {
    let measured = sample.measure()?;
    let converter = ColorConverter::new();
    Ok(SpotMeasurement {
        measured,
        target,
        shift: LabShift::between(measured, target),
        delta_e: converter.delta_e(measured, target),
    })
}
