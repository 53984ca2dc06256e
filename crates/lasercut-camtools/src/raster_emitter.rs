//! Raster part emission
//!
//! Bilevel and grayscale rasters share one scanning loop. Each scanline is
//! compressed into non-zero runs; the head rapids to the start of a run and
//! cuts to its end at a power derived from the pixel value. Lines alternate
//! direction unless the property asks for unidirectional engraving.

use crate::buffer::ProgramBuffer;
use crate::error::{EmitterError, Result};
use crate::line_compressor::{compress, Run, ScanDirection};
use crate::machine_state::{FeedMode, MachineState};
use crate::pass::begin_pass;
use crate::property::CuttingProperty;
use lasercut_core::{px_to_mm, Point, Raster};

/// Pixel types that can be engraved.
pub trait EngravePixel: Copy + PartialEq + Default {
    /// Section comment for parts of this pixel type
    const LABEL: &'static str;

    /// Laser power for this pixel given the part's maximum power
    fn power(self, max_power: f64) -> f64;
}

impl EngravePixel for bool {
    const LABEL: &'static str = "Raster part";

    fn power(self, max_power: f64) -> f64 {
        if self {
            max_power
        } else {
            0.0
        }
    }
}

impl EngravePixel for u8 {
    const LABEL: &'static str = "Raster 3D part";

    fn power(self, max_power: f64) -> f64 {
        max_power * f64::from(self) / 255.0
    }
}

/// Check that every scanline matches the declared raster width
pub fn check_geometry<P: Copy>(part: &Raster<P>) -> Result<()> {
    (0..part.raster_height()).try_for_each(|row| scanline(part, row).map(|_| ()))
}

fn scanline<P: Copy>(part: &Raster<P>, row: usize) -> Result<&[P]> {
    let line = part.raster_line(row).unwrap_or_default();
    if line.len() != part.raster_width() {
        return Err(EmitterError::MalformedRasterGeometry {
            line: row,
            expected: part.raster_width(),
            actual: line.len(),
        });
    }
    Ok(line)
}

/// Emit one raster part, bilevel or grayscale.
///
/// Ends with an unconditional laser off.
pub fn emit_raster_part<P: EngravePixel>(
    part: &Raster<P>,
    state: &mut MachineState<'_>,
    out: &mut ProgramBuffer,
) -> Result<()> {
    let property = CuttingProperty::resolve(part.property())?;
    check_geometry(part)?;

    out.comment(P::LABEL);
    out.push(state.apply_property(&property));

    let rows: Vec<usize> = if property.engrave_bottom_up {
        (0..part.raster_height()).rev().collect()
    } else {
        (0..part.raster_height()).collect()
    };

    for pass in 0..property.passes {
        begin_pass(state, out, &property, pass);

        let mut direction = ScanDirection::LeftToRight;
        for &row in &rows {
            let line = scanline(part, row)?;
            let scan = ScanLine {
                origin: part.raster_start(),
                row,
                dpi: part.dpi(),
                max_power: property.power,
            };
            scan.emit(&compress(line, direction), direction, state, out);

            if !property.engrave_unidirectional {
                direction = direction.reversed();
            }
        }
    }

    out.line(state.force_laser_off());
    Ok(())
}

struct ScanLine {
    origin: Point,
    row: usize,
    dpi: f64,
    max_power: f64,
}

impl ScanLine {
    fn at(&self, column: usize) -> Point {
        let pixel = self.origin.offset(column as f64, self.row as f64);
        Point::new(px_to_mm(pixel.x, self.dpi), px_to_mm(pixel.y, self.dpi))
    }

    fn emit<P: EngravePixel>(
        &self,
        runs: &[Run<P>],
        direction: ScanDirection,
        state: &mut MachineState<'_>,
        out: &mut ProgramBuffer,
    ) {
        let mut previous_end: Option<usize> = None;
        for run in runs {
            state.set_power(run.value.power(self.max_power));

            // a run touching the previous one continues without travel
            let continues = previous_end.is_some_and(|end| match direction {
                ScanDirection::LeftToRight => end + 1 == run.start,
                ScanDirection::RightToLeft => end == run.start + 1,
            });

            if continues {
                out.push(state.set_position(self.at(run.end), FeedMode::Cut));
            } else {
                out.push(state.set_position(self.at(run.start), FeedMode::Rapid));
                if run.is_single_pixel() {
                    out.line(state.cut_point(self.at(run.end)));
                } else {
                    out.push(state.set_position(self.at(run.end), FeedMode::Cut));
                }
            }
            previous_end = Some(run.end);
        }
    }
}
