//! Command line driver: turns a job manifest into a G-code file.

use anyhow::{Context, Result};
use clap::Parser;
use lasercut::{init_logging, GcodeCutter, JobManifest, TracingProgress, VERSION};
use lasercut_settings::{default_config_path, DriverSettings};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Generate a G-code program for a laser cutter from a job manifest.
#[derive(Parser, Debug, Clone)]
#[clap(version = clap::crate_version!(), author = clap::crate_authors!("\n"))]
struct Opts {
    /// Print debug info
    #[clap(short, long)]
    debug: bool,

    /// Path to the driver config file (TOML or JSON)
    #[clap(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Job manifest (JSON)
    #[clap(short, long, required_unless_present = "print_default_config")]
    job: Option<PathBuf>,

    /// Where to write the program; overrides the config's output file
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Print the default driver config as TOML and exit
    #[clap(long)]
    print_default_config: bool,
}

fn load_settings(path: &Path) -> Result<DriverSettings> {
    if !path.exists() {
        warn!(
            "Config file {} not found, using default driver settings",
            path.display()
        );
        return Ok(DriverSettings::default());
    }
    DriverSettings::load_from_file(path)
        .with_context(|| format!("Failed to load driver config {}", path.display()))
}

fn main() -> Result<()> {
    let opts = Opts::parse();

    if opts.print_default_config {
        print!("{}", DriverSettings::default().to_toml_string()?);
        return Ok(());
    }

    init_logging(opts.debug)?;
    info!("LaserCut {}", VERSION);

    let settings = load_settings(&opts.config)?;
    let output = opts
        .output
        .clone()
        .unwrap_or_else(|| settings.output_file.clone());

    let job_path = opts.job.context("No job manifest given")?;
    let base_dir = job_path.parent().unwrap_or(Path::new("."));
    let job = JobManifest::load(&job_path)?.into_job(base_dir)?;

    let cutter = GcodeCutter::new(settings)?;
    cutter
        .save_job(&job, &TracingProgress, &output)
        .with_context(|| format!("Failed to produce {}", output.display()))?;

    Ok(())
}
