//! Driver configuration for LaserCut
//!
//! Provides the settings consumed by the G-code driver: machine geometry and
//! capabilities, plus the vendor-specific command templates. Settings are
//! stored as JSON or TOML.

pub mod config;
pub mod error;

pub use config::{
    default_config_path, expand_escapes, DriverSettings, GcodeTemplates, MachineSettings,
};
pub use error::{Result, SettingsError};
