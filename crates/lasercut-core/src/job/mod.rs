//! Laser job model
//!
//! A job is an ordered list of parts. Each part is either a vector command
//! list or a bitmap (bilevel or grayscale), carries its own resolution, and
//! has a property bag describing how the laser should treat it.

mod property;
mod raster;
mod vector;

pub use property::{LaserProperty, PropertyBag, PropertyValue};
pub use raster::{Raster, Raster3dPart, RasterPart};
pub use vector::{VectorCommand, VectorPart};

use crate::error::{JobError, Result};

pub(crate) fn check_dpi(dpi: f64) -> Result<()> {
    if dpi.is_finite() && dpi > 0.0 {
        Ok(())
    } else {
        Err(JobError::InvalidDpi { dpi })
    }
}

/// One part of a laser job
#[derive(Debug, Clone, PartialEq)]
pub enum JobPart {
    /// Vector cut or engrave path
    Vector(VectorPart),
    /// Bilevel raster engraving
    Raster(RasterPart),
    /// Grayscale raster engraving
    Raster3d(Raster3dPart),
}

impl JobPart {
    /// Resolution in dots per inch
    pub fn dpi(&self) -> f64 {
        match self {
            Self::Vector(p) => p.dpi(),
            Self::Raster(p) => p.dpi(),
            Self::Raster3d(p) => p.dpi(),
        }
    }

    /// Property attached to the part
    pub fn property(&self) -> &PropertyBag {
        match self {
            Self::Vector(p) => p.property(),
            Self::Raster(p) => p.property(),
            Self::Raster3d(p) => p.property(),
        }
    }

    /// Human readable kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Vector(_) => "vector",
            Self::Raster(_) => "raster",
            Self::Raster3d(_) => "raster3d",
        }
    }
}

impl From<VectorPart> for JobPart {
    fn from(part: VectorPart) -> Self {
        Self::Vector(part)
    }
}

impl From<RasterPart> for JobPart {
    fn from(part: RasterPart) -> Self {
        Self::Raster(part)
    }
}

impl From<Raster3dPart> for JobPart {
    fn from(part: Raster3dPart) -> Self {
        Self::Raster3d(part)
    }
}

/// A complete laser job
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaserJob {
    title: String,
    parts: Vec<JobPart>,
}

impl LaserJob {
    /// Create an empty job
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            parts: Vec::new(),
        }
    }

    /// Append a part
    pub fn add_part(&mut self, part: impl Into<JobPart>) {
        self.parts.push(part.into());
    }

    /// Job title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Parts in job order
    pub fn parts(&self) -> &[JobPart] {
        &self.parts
    }
}
