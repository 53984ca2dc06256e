//! # LaserCut Core
//!
//! Core types shared across the LaserCut crates.
//! Provides the laser job model consumed by the G-code driver, pixel/millimetre
//! unit conversion, and the progress listener interface.

pub mod data;
pub mod error;
pub mod job;
pub mod listener;
pub mod units;

pub use data::Point;
pub use error::{JobError, Result};
pub use job::{
    JobPart, LaserJob, LaserProperty, PropertyBag, PropertyValue, Raster, Raster3dPart,
    RasterPart, VectorCommand, VectorPart,
};
pub use listener::{NoProgress, ProgressListener};
pub use units::{px_to_mm, MM_PER_INCH};
