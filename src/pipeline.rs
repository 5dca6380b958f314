//! Per-image calibration pipeline and batch orchestration
//!
//! Each image runs, in fixed order:
//! 1. optional recovery shift from its own statistics against a target
//! 2. statistics recomputed after recovery
//! 3. statistical transfer against the reference statistics
//! 4. optional fixed spot / palette shift
//!
//! Images are independent. A failing image is reported on its own and
//! never aborts its siblings; configuration problems are rejected before
//! any image is touched.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::buffer::PixelBuffer;
use crate::calibration::{
    apply_lab_shift, apply_reinhard_transfer, compute_recovery_shift, LabShift,
};
use crate::color::{compute_lab_stats, LabStats};
use crate::confidence::{compute_confidence, Confidence};
use crate::config::PipelineConfig;
use crate::error::{CalibrationError, Result};

/// Where the reference statistics come from
#[derive(Debug, Clone)]
pub enum ReferenceSource {
    /// Statistics computed elsewhere, e.g. from chart analysis
    Stats(LabStats),
    /// A reference image whose statistics are collected here
    Buffer(PixelBuffer),
}

impl ReferenceSource {
    /// Resolve to a statistics record
    ///
    /// # Errors
    ///
    /// Returns `EmptyInput` for an empty reference buffer and
    /// `InvalidConfiguration` for statistics with a NaN or infinite
    /// component.
    pub fn resolve(&self, sample_step: usize) -> Result<LabStats> {
        let stats = match self {
            ReferenceSource::Stats(stats) => *stats,
            ReferenceSource::Buffer(buffer) => compute_lab_stats(buffer, sample_step)?,
        };
        if !stats.is_finite() {
            return Err(CalibrationError::invalid_config(
                "reference",
                format!("{:?}", stats),
            ));
        }
        Ok(stats)
    }
}

/// One image handed to the pipeline
#[derive(Debug, Clone)]
pub struct ImageJob {
    pub id: String,
    pub buffer: PixelBuffer,
}

impl ImageJob {
    pub fn new(id: impl Into<String>, buffer: PixelBuffer) -> Self {
        Self {
            id: id.into(),
            buffer,
        }
    }
}

/// Statistics and shifts recorded while correcting one image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageReport {
    pub id: String,
    /// Statistics of the image as received
    pub source_stats: LabStats,
    /// Statistics after recovery; the transfer's target statistics
    pub target_stats: LabStats,
    /// Recovery shift, when recovery ran
    pub recovery_shift: Option<LabShift>,
    /// Whether statistical transfer ran
    pub transfer_applied: bool,
    /// Spot shift, when one was applied
    pub spot_shift: Option<LabShift>,
}

/// A fully corrected image
#[derive(Debug, Clone)]
pub struct CorrectedImage {
    pub buffer: PixelBuffer,
    pub report: ImageReport,
}

/// A failed image
#[derive(Debug)]
pub struct ImageFailure {
    pub error: CalibrationError,
    /// The untouched input, when the failure happened before any mutation
    pub buffer: Option<PixelBuffer>,
}

/// Outcome of one image in a batch
#[derive(Debug)]
pub struct ImageOutcome {
    pub id: String,
    pub result: std::result::Result<CorrectedImage, ImageFailure>,
}

impl ImageOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-image outcomes plus the run's confidence
#[derive(Debug)]
pub struct BatchReport {
    /// One outcome per job, in input order
    pub outcomes: Vec<ImageOutcome>,
    pub reference: Option<LabStats>,
    pub confidence: Confidence,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Validated configuration and resolved reference for a calibration run
#[derive(Debug, Clone)]
pub struct CalibrationPipeline {
    config: PipelineConfig,
    reference: Option<LabStats>,
}

impl CalibrationPipeline {
    /// Validate `config` and resolve the reference once for the whole run
    ///
    /// # Errors
    ///
    /// Configuration errors, or `EmptyInput` for an empty reference buffer.
    pub fn new(config: PipelineConfig, reference: Option<&ReferenceSource>) -> Result<Self> {
        config.validate()?;
        let reference = reference
            .map(|r| r.resolve(config.sample_step))
            .transpose()?;
        Ok(Self { config, reference })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Confidence for this run's configuration
    pub fn confidence(&self) -> Confidence {
        compute_confidence(
            self.config.quality_score,
            self.config.recovery_availability(),
            self.config.risk,
        )
    }

    /// Run every configured step on one image
    ///
    /// The buffer is either fully corrected or returned in the failure
    /// untouched; a partially corrected buffer is never handed back.
    pub fn process_image(&self, job: ImageJob) -> ImageOutcome {
        let ImageJob { id, mut buffer } = job;
        let config = &self.config;

        let source_stats = match compute_lab_stats(&buffer, config.sample_step) {
            Ok(stats) => stats,
            Err(error) => {
                warn!(image = %id, %error, "image failed before correction");
                return ImageOutcome {
                    id,
                    result: Err(ImageFailure {
                        error,
                        buffer: Some(buffer),
                    }),
                };
            }
        };

        let recovery_shift = config
            .recovery
            .as_ref()
            .filter(|r| r.is_active())
            .map(|r| {
                compute_recovery_shift(
                    &source_stats,
                    r.target.into(),
                    r.auto_exposure,
                    r.auto_white_balance,
                )
            });

        let target_stats = match recovery_shift {
            Some(shift) if !shift.is_zero() => {
                debug!(image = %id, ?shift, "applying recovery shift");
                apply_lab_shift(&mut buffer, Some(&shift), config.strength);
                match compute_lab_stats(&buffer, config.sample_step) {
                    Ok(stats) => stats,
                    Err(error) => {
                        warn!(image = %id, %error, "image failed after recovery");
                        return ImageOutcome {
                            id,
                            result: Err(ImageFailure {
                                error,
                                buffer: None,
                            }),
                        };
                    }
                }
            }
            _ => source_stats,
        };

        if let Some(reference) = &self.reference {
            debug!(image = %id, mode = ?config.mode, "applying statistical transfer");
            apply_reinhard_transfer(
                &mut buffer,
                reference,
                &target_stats,
                config.strength,
                config.mode,
            );
        }

        let spot_shift = config.spot_shift.filter(|s| !s.is_zero());
        if let Some(shift) = &spot_shift {
            debug!(image = %id, ?shift, "applying spot shift");
            apply_lab_shift(&mut buffer, Some(shift), config.strength);
        }

        let report = ImageReport {
            id: id.clone(),
            source_stats,
            target_stats,
            recovery_shift,
            transfer_applied: self.reference.is_some(),
            spot_shift,
        };
        ImageOutcome {
            id,
            result: Ok(CorrectedImage { buffer, report }),
        }
    }

    /// Process every job in parallel, one outcome per job in input order
    pub fn process_batch(&self, jobs: Vec<ImageJob>) -> BatchReport {
        let total = jobs.len();
        let outcomes: Vec<ImageOutcome> = jobs
            .into_par_iter()
            .map(|job| self.process_image(job))
            .collect();

        let report = BatchReport {
            outcomes,
            reference: self.reference,
            confidence: self.confidence(),
        };
        info!(
            total,
            succeeded = report.succeeded(),
            failed = report.failed(),
            confidence = report.confidence.score,
            "batch complete"
        );
        report
    }
}

/// Validate, resolve the reference and process a batch in one call
///
/// # Errors
///
/// Only configuration and reference errors are returned here; per-image
/// failures are reported in the [`BatchReport`].
pub fn process_batch(
    config: PipelineConfig,
    reference: Option<&ReferenceSource>,
    jobs: Vec<ImageJob>,
) -> Result<BatchReport> {
    let pipeline = CalibrationPipeline::new(config, reference)?;
    Ok(pipeline.process_batch(jobs))
}
