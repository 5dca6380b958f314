//! Error types for the lab_calibration library

use thiserror::Error;

/// Result type alias for lab_calibration operations
pub type Result<T> = std::result::Result<T, CalibrationError>;

/// Error types for color calibration operations
///
/// Degenerate statistics (zero variance) are never reported here; they are
/// absorbed by the standard deviation floor in [`crate::color::statistics`].
#[derive(Error, Debug)]
pub enum CalibrationError {
    /// A pixel buffer or sample set with no pixels was passed to statistics
    #[error("Empty input: {context} contains no pixels")]
    EmptyInput { context: String },

    /// A configuration value is outside its accepted domain
    #[error("Invalid configuration: {parameter} = {value}")]
    InvalidConfiguration { parameter: String, value: String },

    /// Pixel data length does not match width * height * 4
    #[error("Pixel buffer size mismatch: {width}x{height} needs {expected} bytes, got {actual}")]
    BufferSizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// A spot sample point lies outside the buffer
    #[error("Sample point ({x}, {y}) is outside the {width}x{height} buffer")]
    SamplePointOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// Named preset does not exist in the store
    #[error("Preset not found: {name}")]
    PresetNotFound { name: String },

    /// Preset name is unusable as a storage key
    #[error("Invalid preset name '{name}': {reason}")]
    InvalidPresetName { name: String, reason: String },

    /// Configuration or preset file could not be read or written
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be serialized or parsed
    #[error("Configuration serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CalibrationError {
    /// Create an invalid configuration error
    pub fn invalid_config(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidConfiguration {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Create an empty input error
    pub fn empty_input(context: impl Into<String>) -> Self {
        Self::EmptyInput {
            context: context.into(),
        }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a serialization error with context
    pub fn serialization(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            message: message.into(),
            source,
        }
    }

    /// Check if this error rejects a whole batch rather than a single image
    ///
    /// Configuration errors are raised before any pixel is touched; every
    /// other variant is scoped to the image that produced it.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            CalibrationError::InvalidConfiguration { .. }
                | CalibrationError::Serialization { .. }
                | CalibrationError::PresetNotFound { .. }
                | CalibrationError::InvalidPresetName { .. }
        )
    }
}
