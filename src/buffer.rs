//! RGBA pixel buffers handed to the engine by callers
//!
//! The engine reads and writes the RGB bytes of each pixel and leaves the
//! alpha byte untouched.

use crate::error::{CalibrationError, Result};

/// Bytes per RGBA pixel
pub const CHANNELS: usize = 4;

/// Width x height grid of RGBA byte quadruplets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes, checking that the length matches the dimensions
    ///
    /// # Errors
    ///
    /// Returns `BufferSizeMismatch` if `data.len() != width * height * 4`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(CalibrationError::BufferSizeMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create a buffer filled with a single opaque color
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * CHANNELS);
        for _ in 0..count {
            data.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels in the buffer
    pub fn pixel_count(&self) -> usize {
        self.data.len() / CHANNELS
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw RGBA bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// RGB of the pixel at (x, y), or `None` outside the buffer
    pub fn rgb_at(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * CHANNELS;
        let px = &self.data[offset..offset + 3];
        Some([px[0], px[1], px[2]])
    }

    /// Iterate over pixels as RGBA slices
    pub fn pixels(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks_exact(CHANNELS)
    }

    /// Iterate mutably over pixels as RGBA slices
    pub fn pixels_mut(&mut self) -> impl Iterator<Item = &mut [u8]> {
        self.data.chunks_exact_mut(CHANNELS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_rejects_wrong_length() {
        let result = PixelBuffer::from_raw(2, 2, vec![0; 15]);
        match result {
            Err(CalibrationError::BufferSizeMismatch {
                expected, actual, ..
            }) => {
                assert_eq!(expected, 16);
                assert_eq!(actual, 15);
            }
            other => panic!("Expected BufferSizeMismatch, got: {:?}", other),
        }
    }

    #[test]
    fn test_zero_sized_buffer_is_empty() {
        let buffer = PixelBuffer::from_raw(0, 10, Vec::new()).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer.pixel_count(), 0);
    }

    #[test]
    fn test_rgb_at() {
        let mut buffer = PixelBuffer::filled(3, 2, [10, 20, 30]);
        // row 1, column 2
        if let Some(px) = buffer.pixels_mut().nth(5) {
            px[0] = 99;
        }

        assert_eq!(buffer.rgb_at(0, 0), Some([10, 20, 30]));
        assert_eq!(buffer.rgb_at(2, 1), Some([99, 20, 30]));
        assert_eq!(buffer.rgb_at(3, 0), None);
        assert_eq!(buffer.rgb_at(0, 2), None);
    }

    #[test]
    fn test_filled_is_opaque() {
        let buffer = PixelBuffer::filled(4, 4, [1, 2, 3]);
        assert_eq!(buffer.pixel_count(), 16);
        assert!(buffer.pixels().all(|px| px == [1, 2, 3, 255]));
    }
}
