//! Raster job parts.
//!
//! A raster is a grid of scanlines placed at an origin (in pixels). Bilevel
//! rasters store one `bool` per pixel (`true` = burn); grayscale rasters store
//! one byte of burn intensity per pixel (0 = none, 255 = full power).

use super::{check_dpi, PropertyBag};
use crate::data::Point;
use crate::error::{JobError, Result};

/// A bitmap part with per-row storage.
///
/// Rows are kept as supplied. Whether every row matches the declared width is
/// checked by the consumer when the row is read for engraving.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster<P> {
    dpi: f64,
    property: PropertyBag,
    origin: Point,
    width: usize,
    rows: Vec<Vec<P>>,
}

/// Bilevel (on/off) raster part
pub type RasterPart = Raster<bool>;

/// Grayscale raster part, one intensity byte per pixel
pub type Raster3dPart = Raster<u8>;

impl<P: Copy> Raster<P> {
    /// Create a raster part.
    ///
    /// `height` must equal the number of supplied rows.
    pub fn new(
        origin: Point,
        width: usize,
        height: usize,
        rows: Vec<Vec<P>>,
        property: PropertyBag,
        dpi: f64,
    ) -> Result<Self> {
        check_dpi(dpi)?;
        if rows.len() != height {
            return Err(JobError::RowCountMismatch {
                declared: height,
                actual: rows.len(),
            });
        }
        Ok(Self {
            dpi,
            property,
            origin,
            width,
            rows,
        })
    }

    /// Resolution in dots per inch
    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    /// Engraving property for the whole part
    pub fn property(&self) -> &PropertyBag {
        &self.property
    }

    /// Top-left corner of the raster, in pixels
    pub fn raster_start(&self) -> Point {
        self.origin
    }

    /// Declared width in pixels
    pub fn raster_width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    pub fn raster_height(&self) -> usize {
        self.rows.len()
    }

    /// Pixels of row `y`, or `None` past the last row
    pub fn raster_line(&self, y: usize) -> Option<&[P]> {
        self.rows.get(y).map(Vec::as_slice)
    }
}
