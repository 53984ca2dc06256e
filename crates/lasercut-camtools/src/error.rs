//! Error types for the emission engine.
//!
//! Every variant aborts the job: nothing is written once an error is raised,
//! so a caller never receives a partial program.

use lasercut_settings::SettingsError;
use std::io;
use thiserror::Error;

/// Errors that can occur while turning a job into G-code.
#[derive(Error, Debug)]
pub enum EmitterError {
    /// A property carrier cannot be resolved into cutting settings.
    #[error("Incompatible property '{field}': {reason}")]
    IncompatibleProperty { field: String, reason: String },

    /// A scanline does not match the declared raster width.
    #[error("Malformed raster geometry: line {line} has {actual} pixels, expected {expected}")]
    MalformedRasterGeometry {
        line: usize,
        expected: usize,
        actual: usize,
    },

    /// The program framer was driven out of order.
    #[error("Invalid program state transition: {from} -> {to}")]
    InvalidStateTransition {
        from: &'static str,
        to: &'static str,
    },

    /// The driver configuration was rejected.
    #[error("Invalid settings: {0}")]
    InvalidSettings(#[from] SettingsError),

    /// I/O error while delivering the program.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl EmitterError {
    /// Shorthand for an [`EmitterError::IncompatibleProperty`]
    pub fn incompatible(field: &str, reason: impl Into<String>) -> Self {
        Self::IncompatibleProperty {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for emission operations.
pub type Result<T> = std::result::Result<T, EmitterError>;
