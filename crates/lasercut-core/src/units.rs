//! Unit conversion utilities
//!
//! Job geometry is expressed in pixels at a per-part resolution (dots per inch);
//! the driver works in millimetres.

/// Millimetres per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Convert a pixel coordinate at `dpi` to millimetres
pub fn px_to_mm(px: f64, dpi: f64) -> f64 {
    px * MM_PER_INCH / dpi
}
