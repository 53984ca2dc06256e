//! # LaserCut
//!
//! A generic G-code driver for laser cutters. Turns laser jobs made of vector
//! paths, bilevel rasters and grayscale rasters into a G-code program for a
//! CNC-style motion controller.
//!
//! ## Architecture
//!
//! LaserCut is organized as a workspace with multiple crates:
//!
//! 1. **lasercut-core** - Job model, units, property carrier, progress listener
//! 2. **lasercut-settings** - Driver configuration (machine, command templates)
//! 3. **lasercut-camtools** - G-code emission engine
//! 4. **lasercut** - Command line front end and job manifests

pub mod job_file;

pub use job_file::{JobManifest, PartSpec};
pub use lasercut_camtools::{EmitterError, GcodeCutter};
pub use lasercut_core::{LaserJob, ProgressListener};
pub use lasercut_settings::DriverSettings;

use tracing::{debug, info};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging(debug: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Progress listener that reports through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressListener for TracingProgress {
    fn progress_changed(&self, percent: u8) {
        debug!("Progress: {}%", percent);
    }

    fn task_changed(&self, label: &str) {
        info!("{}", label);
    }
}
