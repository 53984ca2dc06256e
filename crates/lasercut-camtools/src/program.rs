//! Program framing and the G-code driver entry point
//!
//! [`ProgramFramer`] wraps the part emitters with the header and footer and
//! enforces their order. [`GcodeCutter`] drives a framer over a whole job,
//! reports progress, and hands the finished text to the caller.

use crate::buffer::ProgramBuffer;
use crate::error::{EmitterError, Result};
use crate::machine_state::MachineState;
use crate::property::CuttingProperty;
use crate::raster_emitter::{check_geometry, emit_raster_part};
use crate::vector_emitter::emit_vector_part;
use chrono::Local;
use lasercut_core::{JobPart, LaserJob, ProgressListener, VectorCommand};
use lasercut_settings::DriverSettings;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Name written into the program header
pub const GENERATOR: &str = "LaserCut";

/// Marker closing every program
pub const END_OF_FILE: &str = "; End-Of-File";

/// Position of a framer in the program layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramState {
    NotStarted,
    HeaderEmitted,
    BodyEmitting,
    FooterEmitted,
}

impl ProgramState {
    pub fn name(self) -> &'static str {
        match self {
            Self::NotStarted => "not started",
            Self::HeaderEmitted => "header emitted",
            Self::BodyEmitting => "body emitting",
            Self::FooterEmitted => "footer emitted",
        }
    }
}

/// Builds one program: header, parts in order, footer.
#[derive(Debug)]
pub struct ProgramFramer<'a> {
    settings: &'a DriverSettings,
    state: ProgramState,
    machine: MachineState<'a>,
    out: ProgramBuffer,
}

impl<'a> ProgramFramer<'a> {
    pub fn new(settings: &'a DriverSettings) -> Self {
        Self {
            settings,
            state: ProgramState::NotStarted,
            machine: MachineState::new(settings),
            out: ProgramBuffer::new(),
        }
    }

    pub fn state(&self) -> ProgramState {
        self.state
    }

    fn transition(&mut self, allowed: &[ProgramState], to: ProgramState) -> Result<()> {
        if !allowed.contains(&self.state) {
            return Err(EmitterError::InvalidStateTransition {
                from: self.state.name(),
                to: to.name(),
            });
        }
        self.state = to;
        Ok(())
    }

    /// Reset the machine state and write the header block
    pub fn emit_header(&mut self, title: &str) -> Result<()> {
        self.transition(&[ProgramState::NotStarted], ProgramState::HeaderEmitted)?;
        self.machine.reset();

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        self.out.comment(format!("{} - Generated G-code program", GENERATOR));
        self.out.comment(format!("FILE: {}", title));
        self.out.comment(format!("DATE: {}", timestamp));
        self.out.line(";");
        self.out.line(";");
        self.out.line(self.settings.gcode.header_text());
        self.out.line(self.machine.force_laser_off());
        Ok(())
    }

    /// Write one job part
    pub fn emit_part(&mut self, part: &JobPart) -> Result<()> {
        self.transition(
            &[ProgramState::HeaderEmitted, ProgramState::BodyEmitting],
            ProgramState::BodyEmitting,
        )?;

        debug!("Emitting {} part at {} dpi", part.kind(), part.dpi());
        match part {
            JobPart::Vector(p) => emit_vector_part(p, &mut self.machine, &mut self.out),
            JobPart::Raster(p) => emit_raster_part(p, &mut self.machine, &mut self.out),
            JobPart::Raster3d(p) => emit_raster_part(p, &mut self.machine, &mut self.out),
        }
    }

    /// Switch everything off and write the footer block
    pub fn emit_footer(&mut self) -> Result<()> {
        self.transition(
            &[ProgramState::HeaderEmitted, ProgramState::BodyEmitting],
            ProgramState::FooterEmitted,
        )?;

        self.out.line(self.machine.force_laser_off());
        if self.settings.machine.supports_focus {
            self.out.line(self.machine.park_focus());
        }
        if self.settings.machine.supports_ventilation {
            self.out.line(self.machine.force_ventilation(false));
        }
        self.out.line(self.settings.gcode.footer_text());
        self.out.line(END_OF_FILE);
        Ok(())
    }

    /// The finished program as US-ASCII text
    pub fn finish(self) -> Result<String> {
        if self.state != ProgramState::FooterEmitted {
            return Err(EmitterError::InvalidStateTransition {
                from: self.state.name(),
                to: "finished",
            });
        }
        Ok(self.out.into_ascii())
    }
}

/// Generic G-code driver for laser cutters.
#[derive(Debug, Clone)]
pub struct GcodeCutter {
    settings: DriverSettings,
}

impl GcodeCutter {
    /// Create a driver; the settings are validated first
    pub fn new(settings: DriverSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    /// Resolve every property and check every raster before anything is written
    pub fn check_job(&self, job: &LaserJob) -> Result<()> {
        for part in job.parts() {
            CuttingProperty::resolve(part.property())?;
            match part {
                JobPart::Vector(p) => {
                    for command in p.commands() {
                        if let VectorCommand::SetProperty { property } = command {
                            CuttingProperty::resolve(property)?;
                        }
                    }
                }
                JobPart::Raster(p) => check_geometry(p)?,
                JobPart::Raster3d(p) => check_geometry(p)?,
            }
        }
        Ok(())
    }

    /// Turn a job into a complete program
    pub fn generate(&self, job: &LaserJob, listener: &dyn ProgressListener) -> Result<String> {
        let program = self.buffer_job(job, listener)?;
        finished(listener);
        Ok(program)
    }

    /// Generate a job and write it to `path`.
    ///
    /// The file is only created once the whole program has been generated.
    pub fn save_job(
        &self,
        job: &LaserJob,
        listener: &dyn ProgressListener,
        path: &Path,
    ) -> Result<()> {
        let program = self.buffer_job(job, listener)?;

        listener.task_changed(&format!("File writing {}", path.display()));
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(program.as_bytes())?;
        writer.flush()?;
        info!("Wrote {}", path.display());

        finished(listener);
        Ok(())
    }

    /// Check the job, then build the program text; progress runs up to 80%
    fn buffer_job(&self, job: &LaserJob, listener: &dyn ProgressListener) -> Result<String> {
        info!(
            "Generating G-code for '{}' ({} parts)",
            job.title(),
            job.parts().len()
        );
        listener.progress_changed(0);
        listener.task_changed("Checking job");
        self.check_job(job)?;

        listener.task_changed("Buffering");
        let mut framer = ProgramFramer::new(&self.settings);
        framer.emit_header(job.title())?;
        listener.progress_changed(20);

        let total = job.parts().len();
        for (index, part) in job.parts().iter().enumerate() {
            framer.emit_part(part)?;
            listener.progress_changed(part_progress(index + 1, total));
        }

        framer.emit_footer()?;
        let program = framer.finish()?;

        info!("Generated {} lines of G-code", program.lines().count());
        Ok(program)
    }
}

fn finished(listener: &dyn ProgressListener) {
    listener.task_changed("Finished");
    listener.progress_changed(100);
}

/// Progress after `done` of `total` parts: the body spans 20% to 80%
fn part_progress(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 80;
    }
    (20 + done * 60 / total).min(80) as u8
}
