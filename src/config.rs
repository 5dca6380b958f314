//! Configuration structures for the lab_calibration pipeline.
//!
//! This module defines every tunable parameter of a calibration run,
//! organized into the recovery, transfer and spot stages.
//!
//! # Configuration Loading
//!
//! Configuration can be loaded from JSON files or constructed programmatically:
//!
//! ```no_run
//! use lab_calibration::PipelineConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = PipelineConfig::from_json_file(Path::new("config.json"))?;
//!
//! // Or use defaults
//! let config = PipelineConfig::default();
//! # Ok::<(), lab_calibration::CalibrationError>(())
//! ```
//!
//! # Configuration Sections
//!
//! - [`RecoveryConfig`]: exposure / white balance rescue before transfer
//! - `mode` and `strength`: statistical transfer against the reference
//! - `spot_shift`: fixed palette correction applied last
//! - `quality_score` and `risk`: confidence inputs from outside the engine

use palette::Lab;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::calibration::{LabShift, Strength, TransferMode};
use crate::confidence::{RecoveryAvailability, RiskTier};
use crate::constants::statistics::DEFAULT_SAMPLE_STEP;
use crate::error::{CalibrationError, Result};

/// Complete pipeline configuration for a calibration run.
///
/// Can be serialized to/from JSON and stored as a named preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Lab channels the transfer remaps
    #[serde(default)]
    pub mode: TransferMode,

    /// Blend factor for every stage
    #[serde(default)]
    pub strength: Strength,

    /// Pixel stride used when collecting per-image statistics
    #[serde(default = "default_sample_step")]
    pub sample_step: usize,

    /// Exposure / white balance recovery; `None` when not offered
    #[serde(default)]
    pub recovery: Option<RecoveryConfig>,

    /// Spot / palette shift applied after transfer
    #[serde(default)]
    pub spot_shift: Option<LabShift>,

    /// Chart-derived calibration quality in [0, 100]
    #[serde(default)]
    pub quality_score: Option<f32>,

    /// Environmental risk tier
    #[serde(default)]
    pub risk: Option<RiskTier>,
}

/// Exposure and white balance recovery parameters.
///
/// When enabled, each image is shifted so its own mean Lab moves onto
/// `target` along the selected axes before transfer runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// Run recovery at all
    pub enabled: bool,

    /// Correct mean lightness
    pub auto_exposure: bool,

    /// Correct mean chroma
    pub auto_white_balance: bool,

    /// Target mean color under D65
    pub target: LabColor,
}

/// Lab color representation for configuration files.
///
/// Uses CIE L*a*b* color space coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabColor {
    pub l: f32,
    pub a: f32,
    pub b: f32,
}

impl LabColor {
    pub fn is_finite(&self) -> bool {
        self.l.is_finite() && self.a.is_finite() && self.b.is_finite()
    }
}

impl From<LabColor> for Lab {
    fn from(color: LabColor) -> Self {
        Lab::new(color.l, color.a, color.b)
    }
}

impl From<Lab> for LabColor {
    fn from(lab: Lab) -> Self {
        Self {
            l: lab.l,
            a: lab.a,
            b: lab.b,
        }
    }
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_exposure: true,
            auto_white_balance: true,
            target: LabColor {
                l: 50.0,
                a: 0.0,
                b: 0.0,
            },
        }
    }
}

impl RecoveryConfig {
    /// Whether recovery will change anything
    pub fn is_active(&self) -> bool {
        self.enabled && (self.auto_exposure || self.auto_white_balance)
    }
}

fn default_sample_step() -> usize {
    DEFAULT_SAMPLE_STEP
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mode: TransferMode::Full,
            strength: Strength::FULL,
            sample_step: DEFAULT_SAMPLE_STEP,
            recovery: None,
            spot_shift: None,
            quality_score: None,
            risk: None,
        }
    }
}

impl PipelineConfig {
    /// Check every value before any pixel is touched
    ///
    /// `strength` and `mode` are valid by construction.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` naming the first offending parameter.
    pub fn validate(&self) -> Result<()> {
        if let Some(recovery) = &self.recovery {
            if !recovery.target.is_finite() {
                return Err(CalibrationError::invalid_config(
                    "recovery.target",
                    format!("{:?}", recovery.target),
                ));
            }
        }

        if let Some(shift) = &self.spot_shift {
            if !shift.is_finite() {
                return Err(CalibrationError::invalid_config(
                    "spot_shift",
                    format!("{:?}", shift),
                ));
            }
        }

        if let Some(q) = self.quality_score {
            if !q.is_finite() || !(0.0..=100.0).contains(&q) {
                return Err(CalibrationError::invalid_config("quality_score", q));
            }
        }

        Ok(())
    }

    /// Recovery availability as seen by confidence scoring
    pub fn recovery_availability(&self) -> RecoveryAvailability {
        match &self.recovery {
            None => RecoveryAvailability::Unavailable,
            Some(r) if r.is_active() => RecoveryAvailability::Enabled,
            Some(_) => RecoveryAvailability::Disabled,
        }
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CalibrationError::invalid_config("json", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CalibrationError::serialization("Failed to serialize config", e))
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CalibrationError::io(format!("Failed to read {}", path.display()), e)
        })?;
        Self::from_json_str(&content)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = self.to_json_string()?;
        std::fs::write(path, json).map_err(|e| {
            CalibrationError::io(format!("Failed to write {}", path.display()), e)
        })
    }
}
