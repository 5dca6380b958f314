//! Color calibration stages
//!
//! This module holds the per-pixel correction engines: statistical
//! (Reinhard-style) color transfer and fixed Lab-space shifts used for
//! recovery and spot matching. Both blend their result with the original
//! pixel in RGB space according to a [`Strength`].

pub mod shift;
pub mod transfer;

pub use shift::{
    apply_lab_shift, compute_recovery_shift, spot_shift, LabShift, SpotMeasurement, SpotSample,
};
pub use transfer::{apply_reinhard_transfer, transfer_lab, TransferMode};

use serde::{Deserialize, Serialize};

use crate::error::{CalibrationError, Result};

/// Linear blend factor between the original and the corrected pixel
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Strength(f32);

impl Strength {
    /// Full correction
    pub const FULL: Strength = Strength(1.0);

    /// Create a strength, rejecting values outside [0, 1]
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for NaN, infinite or out-of-range values.
    pub fn new(value: f32) -> Result<Self> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(CalibrationError::invalid_config("strength", value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for Strength {
    fn default() -> Self {
        Self::FULL
    }
}

impl TryFrom<f32> for Strength {
    type Error = CalibrationError;

    fn try_from(value: f32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Strength> for f32 {
    fn from(strength: Strength) -> Self {
        strength.0
    }
}

/// Blend an original and a corrected RGB byte by `strength`
///
/// `original + (corrected - original) * strength`, rounded to the nearest byte.
#[inline]
pub(crate) fn blend_channel(original: u8, corrected: u8, strength: Strength) -> u8 {
    let o = original as f32;
    let c = corrected as f32;
    (o + (c - o) * strength.0).round().clamp(0.0, 255.0) as u8
}
