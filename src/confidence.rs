//! Calibration confidence scoring
//!
//! Summarizes how far a batch's correction can be trusted as an integer
//! score in [0, 100] with a coarse label. The base score comes from a
//! chart-derived quality score when one exists, otherwise from whether
//! recovery ran; an environmental risk tier then subtracts a penalty.

use palette::Lab;
use serde::{Deserialize, Serialize};

use crate::color::lab_stats_of;
use crate::constants::{chart, confidence};
use crate::error::{CalibrationError, Result};

/// Environmental risk tier supplied by the caller (e.g. from capture
/// time and sun position)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Points subtracted from the base score
    pub fn penalty(self) -> i32 {
        match self {
            RiskTier::Low => 0,
            RiskTier::Medium => confidence::RISK_PENALTY_MEDIUM,
            RiskTier::High => confidence::RISK_PENALTY_HIGH,
        }
    }
}

/// Coarse confidence label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfidenceLabel {
    Low,
    Mid,
    High,
}

impl ConfidenceLabel {
    pub fn from_score(score: u8) -> Self {
        if score >= confidence::HIGH_THRESHOLD {
            ConfidenceLabel::High
        } else if score >= confidence::MID_THRESHOLD {
            ConfidenceLabel::Mid
        } else {
            ConfidenceLabel::Low
        }
    }
}

/// Whether exposure / white balance recovery could and did run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecoveryAvailability {
    Unavailable,
    Disabled,
    Enabled,
}

/// Confidence score and label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confidence {
    pub score: u8,
    pub label: ConfidenceLabel,
}

/// Compute the confidence record for a calibration run
///
/// # Arguments
///
/// * `quality_score` - Chart-derived calibration quality in [0, 100], if any
/// * `recovery` - Recovery availability, used when no quality score exists
/// * `risk` - Environmental risk tier, if known
pub fn compute_confidence(
    quality_score: Option<f32>,
    recovery: RecoveryAvailability,
    risk: Option<RiskTier>,
) -> Confidence {
    let base = match quality_score.filter(|q| q.is_finite()) {
        Some(q) => q.round().clamp(0.0, 100.0) as i32,
        None => match recovery {
            RecoveryAvailability::Enabled => confidence::BASE_RECOVERY_ENABLED,
            RecoveryAvailability::Disabled => confidence::BASE_RECOVERY_DISABLED,
            RecoveryAvailability::Unavailable => confidence::BASE_DEFAULT,
        },
    };
    let penalty = risk.map_or(0, RiskTier::penalty);
    let score = (base - penalty).clamp(0, 100) as u8;

    Confidence {
        score,
        label: ConfidenceLabel::from_score(score),
    }
}

/// Quality summary of a color chart measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartQuality {
    pub delta_e_avg: f32,
    pub delta_e_max: f32,
    /// Mean a* of the neutral patches
    pub neutral_mean_a: f32,
    /// Mean b* of the neutral patches
    pub neutral_mean_b: f32,
    pub neutral_l_min: f32,
    pub neutral_l_max: f32,
    /// Quality score in [0, 100]
    pub score: f32,
}

/// Score a chart measurement from per-patch ΔE and the neutral patches
///
/// Starts at 100 and subtracts for mean ΔE above tolerance, for chroma bias
/// of the neutral row, and for a neutral row that does not reach bright
/// or dark enough. The result is clamped to [0, 100].
///
/// # Errors
///
/// Returns `EmptyInput` if either slice is empty.
pub fn chart_quality_score(delta_e: &[f32], neutrals: &[Lab]) -> Result<ChartQuality> {
    if delta_e.is_empty() {
        return Err(CalibrationError::empty_input("chart ΔE list"));
    }
    if neutrals.is_empty() {
        return Err(CalibrationError::empty_input("neutral patch list"));
    }

    let delta_e_avg = delta_e.iter().sum::<f32>() / delta_e.len() as f32;
    let delta_e_max = delta_e.iter().copied().fold(f32::MIN, f32::max);

    let neutral_stats = lab_stats_of(neutrals)?;
    let neutral_mean_a = neutral_stats.mean.a;
    let neutral_mean_b = neutral_stats.mean.b;
    let neutral_l_min = neutrals.iter().map(|p| p.l).fold(f32::MAX, f32::min);
    let neutral_l_max = neutrals.iter().map(|p| p.l).fold(f32::MIN, f32::max);
    let neutral_shift = neutral_mean_a.hypot(neutral_mean_b);

    let mut score = 100.0;
    score -= (delta_e_avg - chart::DELTA_E_TOLERANCE).max(0.0) * chart::DELTA_E_WEIGHT;
    score -= neutral_shift * chart::NEUTRAL_SHIFT_WEIGHT;
    if neutral_l_max < chart::NEUTRAL_L_MAX_TARGET {
        score -= (chart::NEUTRAL_L_MAX_TARGET - neutral_l_max) * chart::NEUTRAL_RANGE_WEIGHT;
    }
    if neutral_l_min > chart::NEUTRAL_L_MIN_TARGET {
        score -= (neutral_l_min - chart::NEUTRAL_L_MIN_TARGET) * chart::NEUTRAL_RANGE_WEIGHT;
    }

    Ok(ChartQuality {
        delta_e_avg,
        delta_e_max,
        neutral_mean_a,
        neutral_mean_b,
        neutral_l_min,
        neutral_l_max,
        score: score.clamp(0.0, 100.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heuristic_base_scores() {
        let enabled = compute_confidence(None, RecoveryAvailability::Enabled, None);
        assert_eq!(enabled.score, 55);
        assert_eq!(enabled.label, ConfidenceLabel::Mid);

        let disabled = compute_confidence(None, RecoveryAvailability::Disabled, None);
        assert_eq!(disabled.score, 35);
        assert_eq!(disabled.label, ConfidenceLabel::Low);

        let unavailable = compute_confidence(None, RecoveryAvailability::Unavailable, None);
        assert_eq!(unavailable.score, 40);
        assert_eq!(unavailable.label, ConfidenceLabel::Low);
    }

    #[test]
    fn test_quality_score_overrides_heuristic() {
        let c = compute_confidence(Some(82.4), RecoveryAvailability::Enabled, None);
        assert_eq!(c.score, 82);
        assert_eq!(c.label, ConfidenceLabel::High);
    }

    #[test]
    fn test_risk_penalties() {
        let unavailable = RecoveryAvailability::Unavailable;

        let high = compute_confidence(Some(80.0), unavailable, Some(RiskTier::High));
        assert_eq!(high.score, 65);
        assert_eq!(high.label, ConfidenceLabel::Mid);

        let medium = compute_confidence(Some(80.0), unavailable, Some(RiskTier::Medium));
        assert_eq!(medium.score, 73);
        assert_eq!(medium.label, ConfidenceLabel::High);

        let low = compute_confidence(Some(80.0), unavailable, Some(RiskTier::Low));
        assert_eq!(low.score, 80);
    }

    #[test]
    fn test_score_clamped() {
        let enabled = RecoveryAvailability::Enabled;

        let top = compute_confidence(Some(100.0), enabled, Some(RiskTier::High));
        assert_eq!(top.score, 85);

        let floor = compute_confidence(Some(3.0), enabled, Some(RiskTier::High));
        assert_eq!(floor.score, 0);
        assert_eq!(floor.label, ConfidenceLabel::Low);

        let over = compute_confidence(Some(250.0), RecoveryAvailability::Enabled, None);
        assert_eq!(over.score, 100);

        let nan = compute_confidence(Some(f32::NAN), RecoveryAvailability::Disabled, None);
        assert_eq!(nan.score, 35);
    }

    #[test]
    fn test_label_boundaries() {
        assert_eq!(ConfidenceLabel::from_score(70), ConfidenceLabel::High);
        assert_eq!(ConfidenceLabel::from_score(69), ConfidenceLabel::Mid);
        assert_eq!(ConfidenceLabel::from_score(50), ConfidenceLabel::Mid);
        assert_eq!(ConfidenceLabel::from_score(49), ConfidenceLabel::Low);
    }

    #[test]
    fn test_chart_quality_perfect_chart() {
        let neutrals = [
            Lab::new(96.0, 0.0, 0.0),
            Lab::new(81.0, 0.0, 0.0),
            Lab::new(66.0, 0.0, 0.0),
            Lab::new(51.0, 0.0, 0.0),
            Lab::new(36.0, 0.0, 0.0),
            Lab::new(5.0, 0.0, 0.0),
        ];
        let q = chart_quality_score(&[1.0, 1.5, 0.5], &neutrals).unwrap();
        assert_eq!(q.score, 100.0);
        assert_eq!(q.delta_e_max, 1.5);
        assert_eq!(q.neutral_l_max, 96.0);
        assert_eq!(q.neutral_l_min, 5.0);
    }

    #[test]
    fn test_chart_quality_penalties() {
        // mean ΔE 4 -> -8; neutral bias (3, 4) -> |5| * 2.5 = -12.5;
        // L max 80 -> -5; L min 10 -> -1
        let neutrals = [Lab::new(80.0, 3.0, 4.0), Lab::new(10.0, 3.0, 4.0)];
        let q = chart_quality_score(&[3.0, 5.0], &neutrals).unwrap();
        assert!((q.score - 73.5).abs() < 1e-4);
        assert!((q.delta_e_avg - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_chart_quality_clamps_and_rejects_empty() {
        let neutrals = [Lab::new(50.0, 40.0, 40.0)];
        let q = chart_quality_score(&[30.0], &neutrals).unwrap();
        assert_eq!(q.score, 0.0);

        assert!(chart_quality_score(&[], &neutrals).is_err());
        assert!(chart_quality_score(&[1.0], &[]).is_err());
    }
}
