//! Per-image Lab statistics
//!
//! Collects the mean and standard deviation of L*, a*, b* over a sampled
//! subset of a pixel buffer, and averages small neighborhoods for spot
//! measurements.
//!
//! Sums are accumulated relative to the first sampled pixel (shifted
//! sum / sum-of-squares), so uniform buffers produce exactly zero variance
//! before the floor is applied.

use palette::Lab;
use serde::{Deserialize, Serialize};

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::color::ColorConverter;
use crate::constants::statistics::STD_FLOOR;
use crate::error::{CalibrationError, Result};

/// Mean and standard deviation of a Lab population
///
/// Every `std` component is at least [`STD_FLOOR`], so ratios of standard
/// deviations stay finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawLabStats")]
pub struct LabStats {
    pub mean: Lab,
    pub std: Lab,
}

/// Wire form of [`LabStats`]; deserialized records pass through the floor
#[derive(Deserialize)]
struct RawLabStats {
    mean: Lab,
    std: Lab,
}

impl From<RawLabStats> for LabStats {
    fn from(raw: RawLabStats) -> Self {
        LabStats::new(raw.mean, raw.std)
    }
}

impl LabStats {
    /// Build a stats record, flooring each standard deviation component
    pub fn new(mean: Lab, std: Lab) -> Self {
        Self {
            mean,
            std: Lab::new(
                floor_std(std.l),
                floor_std(std.a),
                floor_std(std.b),
            ),
        }
    }

    /// Whether every mean and std component is finite
    pub fn is_finite(&self) -> bool {
        [
            self.mean.l,
            self.mean.a,
            self.mean.b,
            self.std.l,
            self.std.a,
            self.std.b,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Per-channel running sums, shifted by the first sample
#[derive(Debug, Clone, Copy)]
struct Accumulator {
    origin: [f64; 3],
    sum: [f64; 3],
    sum_sq: [f64; 3],
    count: usize,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            origin: [0.0; 3],
            sum: [0.0; 3],
            sum_sq: [0.0; 3],
            count: 0,
        }
    }

    fn push(&mut self, lab: Lab) {
        let values = [lab.l as f64, lab.a as f64, lab.b as f64];
        if self.count == 0 {
            self.origin = values;
        }
        for c in 0..3 {
            let d = values[c] - self.origin[c];
            self.sum[c] += d;
            self.sum_sq[c] += d * d;
        }
        self.count += 1;
    }

    fn finish(&self) -> Option<LabStats> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        let mut mean = [0.0f32; 3];
        let mut std = [0.0f32; 3];
        for c in 0..3 {
            let shifted_mean = self.sum[c] / n;
            // Clamped: rounding can push sumSq/n - mean² slightly negative
            let variance = (self.sum_sq[c] / n - shifted_mean * shifted_mean).max(0.0);
            mean[c] = (self.origin[c] + shifted_mean) as f32;
            std[c] = variance.sqrt() as f32;
        }
        Some(LabStats::new(
            Lab::new(mean[0], mean[1], mean[2]),
            Lab::new(std[0], std[1], std[2]),
        ))
    }
}

/// Compute sampled Lab mean and standard deviation over a buffer
///
/// Visits every `max(1, sample_step)`-th pixel in memory order. Alpha is
/// ignored.
///
/// # Errors
///
/// Returns `EmptyInput` if the buffer has no pixels.
pub fn compute_lab_stats(buffer: &PixelBuffer, sample_step: usize) -> Result<LabStats> {
    let converter = ColorConverter::new();
    let step = sample_step.max(1);
    let mut acc = Accumulator::new();

    for px in buffer.as_bytes().chunks_exact(CHANNELS).step_by(step) {
        acc.push(converter.rgb_to_lab(px[0], px[1], px[2]));
    }

    acc.finish()
        .ok_or_else(|| CalibrationError::empty_input("statistics buffer"))
}

/// Compute Lab statistics over a set of already-converted colors
///
/// # Errors
///
/// Returns `EmptyInput` if `colors` is empty.
pub fn lab_stats_of(colors: &[Lab]) -> Result<LabStats> {
    let mut acc = Accumulator::new();
    for &lab in colors {
        acc.push(lab);
    }
    acc.finish()
        .ok_or_else(|| CalibrationError::empty_input("Lab sample set"))
}

/// Average Lab over the square neighborhood of `radius` around (x, y)
///
/// The square is clipped to the buffer bounds.
///
/// # Errors
///
/// Returns `SamplePointOutOfBounds` if (x, y) lies outside the buffer.
pub fn mean_lab_around(buffer: &PixelBuffer, x: u32, y: u32, radius: u32) -> Result<Lab> {
    if x >= buffer.width() || y >= buffer.height() {
        return Err(CalibrationError::SamplePointOutOfBounds {
            x,
            y,
            width: buffer.width(),
            height: buffer.height(),
        });
    }

    let converter = ColorConverter::new();
    let x0 = x.saturating_sub(radius);
    let y0 = y.saturating_sub(radius);
    let x1 = x.saturating_add(radius).min(buffer.width() - 1);
    let y1 = y.saturating_add(radius).min(buffer.height() - 1);

    let mut sum = [0.0f64; 3];
    let mut count = 0usize;
    for py in y0..=y1 {
        for px in x0..=x1 {
            if let Some([r, g, b]) = buffer.rgb_at(px, py) {
                let lab = converter.rgb_to_lab(r, g, b);
                sum[0] += lab.l as f64;
                sum[1] += lab.a as f64;
                sum[2] += lab.b as f64;
                count += 1;
            }
        }
    }

    let n = count as f64;
    Ok(Lab::new(
        (sum[0] / n) as f32,
        (sum[1] / n) as f32,
        (sum[2] / n) as f32,
    ))
}

#[inline]
fn floor_std(v: f32) -> f32 {
    if v.is_finite() {
        v.max(STD_FLOOR)
    } else {
        STD_FLOOR
    }
}
