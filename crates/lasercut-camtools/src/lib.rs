//! # LaserCut CAM Tools
//!
//! The G-code emission engine. Turns a [`lasercut_core::LaserJob`] into a
//! program for a generic G-code laser controller.
//!
//! ## Components
//!
//! - **Property**: resolves loosely typed property bags into [`CuttingProperty`]
//! - **Machine State**: tracks what the controller was told and emits only changes
//! - **Line Compressor**: trims scanlines and splits them into runs
//! - **Vector Emitter**: move / line / property commands, with multi-pass support
//! - **Raster Emitter**: bidirectional bilevel and grayscale engraving
//! - **Program**: header, footer, progress and the [`GcodeCutter`] driver
//!
//! Emission is synchronous and single threaded. Each run owns its own machine
//! state and output buffer.

pub mod buffer;
pub mod error;
pub mod line_compressor;
pub mod machine_state;
mod pass;
pub mod program;
pub mod property;
pub mod raster_emitter;
pub mod vector_emitter;

pub use buffer::ProgramBuffer;
pub use error::{EmitterError, Result};
pub use line_compressor::{compress, Run, ScanDirection};
pub use machine_state::{FeedMode, MachineState};
pub use program::{GcodeCutter, ProgramFramer, ProgramState, END_OF_FILE, GENERATOR};
pub use property::CuttingProperty;
pub use raster_emitter::{check_geometry, emit_raster_part, EngravePixel};
pub use vector_emitter::emit_vector_part;
