//! Vector part emission
//!
//! Walks the command list of a vector part once per pass. Travel becomes a
//! rapid move, drawing a cutting move at the active property's speed, and a
//! property change is pushed into the machine state straight away.

use crate::buffer::ProgramBuffer;
use crate::error::Result;
use crate::machine_state::{FeedMode, MachineState};
use crate::pass::begin_pass;
use crate::property::CuttingProperty;
use lasercut_core::{px_to_mm, Point, VectorCommand, VectorPart};

/// Emit one vector part.
///
/// The pass count and depth come from the part's own property; property
/// changes inside the command list only affect the laser settings.
pub fn emit_vector_part(
    part: &VectorPart,
    state: &mut MachineState<'_>,
    out: &mut ProgramBuffer,
) -> Result<()> {
    let initial = CuttingProperty::resolve(part.property())?;
    let dpi = part.dpi();
    let to_mm = |x: f64, y: f64| Point::new(px_to_mm(x, dpi), px_to_mm(y, dpi));

    out.comment("Vector part");
    for pass in 0..initial.passes {
        begin_pass(state, out, &initial, pass);
        out.push(state.apply_property(&initial));

        for command in part.commands() {
            match command {
                VectorCommand::MoveTo { x, y } => {
                    out.push(state.set_position(to_mm(*x, *y), FeedMode::Rapid));
                }
                VectorCommand::LineTo { x, y } => {
                    out.push(state.set_position(to_mm(*x, *y), FeedMode::Cut));
                }
                VectorCommand::SetProperty { property } => {
                    let property = CuttingProperty::resolve(property)?;
                    out.push(state.apply_property(&property));
                }
            }
        }
    }

    Ok(())
}
