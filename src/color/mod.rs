//! Color conversion and statistics module
//!
//! This module handles sRGB <-> Lab conversion of single colors and the
//! sampled Lab statistics the calibration stages are driven by.

pub mod conversion;
pub mod statistics;

pub use conversion::{clamp_lab, ColorConverter};
pub use statistics::{compute_lab_stats, lab_stats_of, mean_lab_around, LabStats};
