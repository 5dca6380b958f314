//! # Lab Calibration
//!
//! A Rust crate for normalizing the colors of photograph batches against a
//! calibration reference in CIE L*a*b* space.
//!
//! This library provides calibrated color correction by:
//! - Converting 8-bit sRGB pixels to and from D65 Lab
//! - Collecting per-channel Lab mean / standard deviation statistics
//! - Recovering exposure and white balance towards a target mean
//! - Transferring an image's Lab statistics onto a reference (Reinhard)
//! - Applying fixed spot / palette shifts
//! - Scoring confidence in the resulting calibration
//!
//! ## Example
//!
//! ```rust,no_run
//! use lab_calibration::{process_batch, ImageJob, PipelineConfig, PixelBuffer, ReferenceSource};
//!
//! let reference = ReferenceSource::Buffer(PixelBuffer::filled(64, 64, [120, 118, 115]));
//! let jobs = vec![ImageJob::new("scan-01", PixelBuffer::filled(64, 64, [140, 120, 100]))];
//!
//! let report = process_batch(PipelineConfig::default(), Some(&reference), jobs)?;
//! println!("{} corrected, confidence {}", report.succeeded(), report.confidence.score);
//! # Ok::<(), lab_calibration::CalibrationError>(())
//! ```

pub mod buffer;
pub mod calibration;
pub mod color;
pub mod confidence;
pub mod config;
pub mod constants;
pub mod error;
pub mod pipeline;
pub mod presets;

pub use palette::{Lab, Srgb};

pub use buffer::PixelBuffer;
pub use calibration::{LabShift, SpotMeasurement, SpotSample, Strength, TransferMode};
pub use color::{ColorConverter, LabStats};
pub use confidence::{
    chart_quality_score, compute_confidence, ChartQuality, Confidence, ConfidenceLabel,
    RecoveryAvailability, RiskTier,
};
pub use config::{LabColor, PipelineConfig, RecoveryConfig};
pub use error::{CalibrationError, Result};
pub use pipeline::{
    process_batch, BatchReport, CalibrationPipeline, CorrectedImage, ImageFailure, ImageJob,
    ImageOutcome, ImageReport, ReferenceSource,
};
pub use presets::{DirectoryPresetStore, MemoryPresetStore, PresetStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_report_serialization() {
        let stats = LabStats::new(Lab::new(50.0, 20.0, -30.0), Lab::new(10.0, 4.0, 6.0));
        let report = ImageReport {
            id: "scan-01".to_string(),
            source_stats: stats,
            target_stats: stats,
            recovery_shift: Some(LabShift::new(2.5, -1.0, 0.5)),
            transfer_applied: true,
            spot_shift: None,
        };

        let json = serde_json::to_string(&report).unwrap();
        let deserialized: ImageReport = serde_json::from_str(&json).unwrap();

        assert_eq!(report, deserialized);
    }
}
