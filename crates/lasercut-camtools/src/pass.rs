//! Multi-pass bookkeeping shared by the vector and raster emitters.

use crate::buffer::ProgramBuffer;
use crate::machine_state::MachineState;
use crate::property::CuttingProperty;

/// Introduce pass `index` (zero based) of a part.
///
/// Multi-pass parts get a pass comment. Every pass after the first lowers
/// the work by the pass depth when one is configured.
pub(crate) fn begin_pass(
    state: &mut MachineState<'_>,
    out: &mut ProgramBuffer,
    property: &CuttingProperty,
    index: u32,
) {
    if property.passes > 1 {
        out.comment(format!("Pass {} of {}", index + 1, property.passes));
    }
    if index > 0 && property.steps_between_passes() {
        out.line(state.step_z(property.pass_depth));
    }
}
