//! Calibration constants and reference values for color normalization
//!
//! This module contains compile-time constants for the Lab conversion,
//! statistics sampling and confidence scoring.

/// D65 Standard Illuminant Reference
///
/// CIE Standard Illuminant D65 represents average daylight with a correlated
/// color temperature of 6504K. This is the standard reference for digital
/// images and computer displays.
pub mod d65 {
    /// D65 white point in CIE XYZ color space (Xn, Yn, Zn)
    /// Source: CIE 15:2004 Colorimetry, 3rd edition
    pub const WHITE_POINT_XYZ: [f64; 3] = [0.95047, 1.00000, 1.08883];

    /// Linear sRGB to XYZ matrix (D65)
    pub const SRGB_TO_XYZ: [[f64; 3]; 3] = [
        [0.4124564, 0.3575761, 0.1804375],
        [0.2126729, 0.7151522, 0.0721750],
        [0.0193339, 0.1191920, 0.9503041],
    ];

    /// XYZ to linear sRGB matrix (D65)
    pub const XYZ_TO_SRGB: [[f64; 3]; 3] = [
        [3.2404542, -1.5371385, -0.4985314],
        [-0.9692660, 1.8760108, 0.0415560],
        [0.0556434, -0.2040259, 1.0572252],
    ];
}

/// Re-export D65 white point at top level for convenience
pub const D65_WHITE_POINT_XYZ: [f64; 3] = d65::WHITE_POINT_XYZ;

/// sRGB transfer function and CIE Lab pivot parameters
pub mod transfer {
    /// Encoded sRGB value at or below which decoding is linear
    pub const SRGB_DECODE_THRESHOLD: f64 = 0.04045;

    /// Linear value at or below which sRGB encoding is linear
    pub const SRGB_ENCODE_THRESHOLD: f64 = 0.0031308;

    /// Slope of the linear sRGB segment
    pub const SRGB_LINEAR_SLOPE: f64 = 12.92;

    /// sRGB gamma exponent
    pub const SRGB_GAMMA: f64 = 2.4;

    /// Lab pivot: ratios above this use the cube root
    pub const LAB_EPSILON: f64 = 0.008856;

    /// Lab pivot: slope of the linear segment
    pub const LAB_KAPPA_SLOPE: f64 = 7.787;

    /// Lab pivot: offset of the linear segment (16/116)
    pub const LAB_OFFSET: f64 = 16.0 / 116.0;
}

/// Valid Lab ranges applied as the gamut clamp
pub mod lab_range {
    pub const L_MIN: f32 = 0.0;
    pub const L_MAX: f32 = 100.0;
    pub const AB_MIN: f32 = -128.0;
    pub const AB_MAX: f32 = 127.0;
}

/// Statistical sampling parameters
pub mod statistics {
    /// Floor applied to every standard deviation component
    pub const STD_FLOOR: f32 = 1e-6;

    /// Default pixel stride for per-image statistics
    pub const DEFAULT_SAMPLE_STEP: usize = 4;

    /// Default half-width of the square neighborhood used for spot sampling
    pub const DEFAULT_SPOT_RADIUS: u32 = 6;
}

/// Confidence scoring parameters
pub mod confidence {
    /// Base score when recovery is available and enabled
    pub const BASE_RECOVERY_ENABLED: i32 = 55;

    /// Base score when recovery is available but disabled
    pub const BASE_RECOVERY_DISABLED: i32 = 35;

    /// Base score without a calibration score or recovery
    pub const BASE_DEFAULT: i32 = 40;

    /// Score penalty for a high environmental risk tier
    pub const RISK_PENALTY_HIGH: i32 = 15;

    /// Score penalty for a medium environmental risk tier
    pub const RISK_PENALTY_MEDIUM: i32 = 7;

    /// Minimum score labelled High
    pub const HIGH_THRESHOLD: u8 = 70;

    /// Minimum score labelled Mid
    pub const MID_THRESHOLD: u8 = 50;
}

/// Chart quality scoring parameters
pub mod chart {
    /// Mean ΔE tolerated before the score starts dropping
    pub const DELTA_E_TOLERANCE: f32 = 2.0;

    /// Points lost per unit of mean ΔE above the tolerance
    pub const DELTA_E_WEIGHT: f32 = 4.0;

    /// Points lost per unit of neutral-patch chroma bias
    pub const NEUTRAL_SHIFT_WEIGHT: f32 = 2.5;

    /// Brightest neutral patch should reach at least this L*
    pub const NEUTRAL_L_MAX_TARGET: f32 = 90.0;

    /// Darkest neutral patch should fall to at most this L*
    pub const NEUTRAL_L_MIN_TARGET: f32 = 8.0;

    /// Points lost per unit of L* range shortfall
    pub const NEUTRAL_RANGE_WEIGHT: f32 = 0.5;
}
