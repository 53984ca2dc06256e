//! Error handling for the LaserCut job model
//!
//! Errors raised while assembling jobs and parts. Emission errors live in the
//! camtools crate; these only cover building the input geometry.

use thiserror::Error;

/// Job model error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JobError {
    /// Resolution must be a positive, finite number of dots per inch
    #[error("Invalid resolution: {dpi} dpi")]
    InvalidDpi {
        /// The rejected resolution.
        dpi: f64,
    },

    /// Number of bitmap rows does not match the declared raster height
    #[error("Raster declares {declared} rows but {actual} were supplied")]
    RowCountMismatch {
        /// Declared height in pixels.
        declared: usize,
        /// Number of rows actually supplied.
        actual: usize,
    },
}

/// Result type alias for job model operations.
pub type Result<T> = std::result::Result<T, JobError>;
