//! Statistical color transfer
//!
//! Matches the per-channel mean and standard deviation of a target image to
//! those of a reference population (Reinhard et al., "Color Transfer between
//! Images", 2001), working in CIE Lab. Only first and second moments are
//! matched; there is no patch-level correction.

use palette::Lab;
use serde::{Deserialize, Serialize};

use super::{blend_channel, Strength};
use crate::buffer::PixelBuffer;
use crate::color::{clamp_lab, ColorConverter, LabStats};
use crate::constants::statistics::STD_FLOOR;

/// Lab channels touched by a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferMode {
    /// L*, a* and b*
    #[default]
    Full,
    /// L* only
    Luminance,
    /// a* and b* only
    Chromatic,
}

impl TransferMode {
    /// Whether L* is remapped
    pub fn touches_luminance(self) -> bool {
        matches!(self, TransferMode::Full | TransferMode::Luminance)
    }

    /// Whether a* and b* are remapped
    pub fn touches_chroma(self) -> bool {
        matches!(self, TransferMode::Full | TransferMode::Chromatic)
    }
}

/// Remap one Lab color from the target population onto the reference
///
/// `(v - target.mean) * (reference.std / target.std) + reference.mean` per
/// selected channel, then clamped into the valid Lab ranges.
pub fn transfer_lab(
    lab: Lab,
    reference: &LabStats,
    target: &LabStats,
    mode: TransferMode,
) -> Lab {
    // Records built by hand can carry a zero std; never divide by it
    let remap = |v: f32, t_mean: f32, t_std: f32, r_mean: f32, r_std: f32| {
        (v - t_mean) * (r_std / t_std.max(STD_FLOOR)) + r_mean
    };

    let mut out = lab;
    if mode.touches_luminance() {
        out.l = remap(
            lab.l,
            target.mean.l,
            target.std.l,
            reference.mean.l,
            reference.std.l,
        );
    }
    if mode.touches_chroma() {
        out.a = remap(
            lab.a,
            target.mean.a,
            target.std.a,
            reference.mean.a,
            reference.std.a,
        );
        out.b = remap(
            lab.b,
            target.mean.b,
            target.std.b,
            reference.mean.b,
            reference.std.b,
        );
    }
    clamp_lab(out)
}

/// Apply statistical color transfer to every pixel of `buffer` in place
///
/// # Arguments
///
/// * `buffer` - Target image, mutated in place (alpha untouched)
/// * `reference` - Statistics the image should be moved towards
/// * `target` - Statistics of `buffer` itself
/// * `strength` - RGB-space blend between original and transferred pixel
/// * `mode` - Lab channels to remap
///
/// # Returns
///
/// The same buffer, for chaining
pub fn apply_reinhard_transfer<'a>(
    buffer: &'a mut PixelBuffer,
    reference: &LabStats,
    target: &LabStats,
    strength: Strength,
    mode: TransferMode,
) -> &'a mut PixelBuffer {
    let converter = ColorConverter::new();

    for px in buffer.pixels_mut() {
        let lab = converter.rgb_to_lab(px[0], px[1], px[2]);
        let moved = converter.lab_to_rgb(transfer_lab(lab, reference, target, mode));
        px[0] = blend_channel(px[0], moved.red, strength);
        px[1] = blend_channel(px[1], moved.green, strength);
        px[2] = blend_channel(px[2], moved.blue, strength);
    }

    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::compute_lab_stats;

    fn stats(mean: (f32, f32, f32), std: (f32, f32, f32)) -> LabStats {
        LabStats::new(
            Lab::new(mean.0, mean.1, mean.2),
            Lab::new(std.0, std.1, std.2),
        )
    }

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[
                    (x * 255 / width.max(1)) as u8,
                    (y * 255 / height.max(1)) as u8,
                    ((x + y) * 7 % 256) as u8,
                    (x % 256) as u8,
                ]);
            }
        }
        PixelBuffer::from_raw(width, height, data).unwrap()
    }

    #[test]
    fn test_transfer_lab_full_scenario() {
        let reference = stats((50.0, 2.0, -3.0), (10.0, 5.0, 5.0));
        let target = stats((40.0, 0.0, 0.0), (5.0, 5.0, 5.0));

        let out = transfer_lab(Lab::new(45.0, 1.0, -1.0), &reference, &target, TransferMode::Full);

        assert!((out.l - 60.0).abs() < 1e-4);
        assert!((out.a - 3.0).abs() < 1e-4);
        assert!((out.b + 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_transfer_lab_modes_select_channels() {
        let reference = stats((50.0, 2.0, -3.0), (10.0, 5.0, 5.0));
        let target = stats((40.0, 0.0, 0.0), (5.0, 5.0, 5.0));
        let lab = Lab::new(45.0, 1.0, -1.0);

        let lum = transfer_lab(lab, &reference, &target, TransferMode::Luminance);
        assert!((lum.l - 60.0).abs() < 1e-4);
        assert_eq!(lum.a, 1.0);
        assert_eq!(lum.b, -1.0);

        let chroma = transfer_lab(lab, &reference, &target, TransferMode::Chromatic);
        assert_eq!(chroma.l, 45.0);
        assert!((chroma.a - 3.0).abs() < 1e-4);
        assert!((chroma.b + 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_transfer_lab_clamps() {
        let reference = stats((90.0, 100.0, 0.0), (40.0, 60.0, 1.0));
        let target = stats((10.0, 0.0, 0.0), (1.0, 1.0, 1.0));

        let out = transfer_lab(Lab::new(80.0, 20.0, 0.0), &reference, &target, TransferMode::Full);
        assert_eq!(out.l, 100.0);
        assert_eq!(out.a, 127.0);
    }

    #[test]
    fn test_identical_stats_leave_buffer_unchanged() {
        let original = gradient(32, 16);
        let s = compute_lab_stats(&original, 1).unwrap();

        for strength in [0.0, 0.3, 1.0] {
            let mut buffer = original.clone();
            apply_reinhard_transfer(
                &mut buffer,
                &s,
                &s,
                Strength::new(strength).unwrap(),
                TransferMode::Full,
            );
            assert_eq!(buffer, original, "strength {strength}");
        }
    }

    #[test]
    fn test_zero_strength_is_noop() {
        let original = gradient(16, 16);
        let target = compute_lab_stats(&original, 1).unwrap();
        let reference = stats((70.0, 20.0, -10.0), (5.0, 3.0, 3.0));

        let mut buffer = original.clone();
        apply_reinhard_transfer(
            &mut buffer,
            &reference,
            &target,
            Strength::new(0.0).unwrap(),
            TransferMode::Full,
        );
        assert_eq!(buffer, original);
    }

    #[test]
    fn test_transfer_moves_mean_towards_reference() {
        let mut buffer = gradient(24, 24);
        let target = compute_lab_stats(&buffer, 1).unwrap();
        let reference = stats(
            (target.mean.l + 10.0, target.mean.a, target.mean.b),
            (target.std.l, target.std.a, target.std.b),
        );

        apply_reinhard_transfer(
            &mut buffer,
            &reference,
            &target,
            Strength::FULL,
            TransferMode::Luminance,
        );
        let after = compute_lab_stats(&buffer, 1).unwrap();
        assert!(after.mean.l > target.mean.l + 5.0);
    }

    #[test]
    fn test_alpha_untouched() {
        let original = gradient(8, 8);
        let target = compute_lab_stats(&original, 1).unwrap();
        let reference = stats((20.0, -30.0, 40.0), (2.0, 2.0, 2.0));

        let mut buffer = original.clone();
        apply_reinhard_transfer(
            &mut buffer,
            &reference,
            &target,
            Strength::FULL,
            TransferMode::Full,
        );
        for (before, after) in original.pixels().zip(buffer.pixels()) {
            assert_eq!(before[3], after[3]);
        }
    }

    #[test]
    fn test_zero_std_target_does_not_blow_up() {
        let converter = ColorConverter::new();
        let gray = converter.rgb_to_lab(119, 119, 119);
        // Struct literal skips the floor in `LabStats::new`
        let target = LabStats {
            mean: gray,
            std: Lab::new(0.0, 0.0, 0.0),
        };
        let reference = LabStats {
            mean: gray,
            std: Lab::new(5.0, 0.0, 0.0),
        };

        let out = transfer_lab(gray, &reference, &target, TransferMode::Full);
        assert!(out.l.is_finite() && out.a.is_finite() && out.b.is_finite());

        let original = PixelBuffer::filled(3, 3, [119, 119, 119]);
        let mut buffer = original.clone();
        apply_reinhard_transfer(
            &mut buffer,
            &reference,
            &target,
            Strength::FULL,
            TransferMode::Full,
        );
        assert_eq!(buffer, original);
    }

    #[test]
    fn test_deserialized_zero_std_target() {
        let json = r#"{"mean":{"l":50.0,"a":0.0,"b":0.0},"std":{"l":0.0,"a":0.0,"b":0.0}}"#;
        let target: LabStats = serde_json::from_str(json).unwrap();
        assert_eq!(target.std.l, STD_FLOOR);

        let reference = stats((50.0, 0.0, 0.0), (10.0, 4.0, 4.0));
        let out = transfer_lab(Lab::new(50.0, 0.0, 0.0), &reference, &target, TransferMode::Full);
        assert!((out.l - 50.0).abs() < 1e-3);
        assert!(out.a.abs() < 1e-3 && out.b.abs() < 1e-3);
    }

    #[test]
    fn test_mode_deserializes_lowercase() {
        let mode: TransferMode = serde_json::from_str("\"chromatic\"").unwrap();
        assert_eq!(mode, TransferMode::Chromatic);
        assert!(serde_json::from_str::<TransferMode>("\"sepia\"").is_err());
    }
}
