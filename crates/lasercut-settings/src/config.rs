//! Driver configuration
//!
//! Configuration is organized into logical sections:
//! - Machine settings (bed size, axis mirroring, capabilities, power scale)
//! - G-code templates (startup/shutdown, laser, ventilation, dwell)
//!
//! Templates may contain the literal escape sequences `\n` and `\r`; they are
//! expanded to real line breaks when read through the accessor methods.

use crate::error::{Result, SettingsError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Expand literal `\n` / `\r` escape sequences into real control characters.
pub fn expand_escapes(template: &str) -> String {
    template.replace("\\n", "\n").replace("\\r", "\r")
}

/// Platform-specific location of the default driver configuration.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lasercut")
        .join("driver.toml")
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Machine geometry and capability settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineSettings {
    /// Laser bed width in mm
    pub bed_width: f64,
    /// Laser bed height in mm
    pub bed_height: f64,
    /// Negate every X coordinate
    pub mirror_x: bool,
    /// Negate every Y coordinate
    pub mirror_y: bool,
    /// Laser accepts a power argument (S word)
    pub supports_power: bool,
    /// Focus is adjusted by moving the Z axis
    pub supports_focus: bool,
    /// Machine has switchable air assist / exhaust
    pub supports_ventilation: bool,
    /// S value corresponding to 100% power
    pub power_scale: f64,
    /// Feed rate attached to rapid moves (mm/min); omitted when unset
    pub rapid_feed: Option<f64>,
}

impl Default for MachineSettings {
    fn default() -> Self {
        Self {
            bed_width: 300.0,
            bed_height: 210.0,
            mirror_x: false,
            mirror_y: true,
            supports_power: true,
            supports_focus: false,
            supports_ventilation: false,
            power_scale: 1000.0,
            rapid_feed: Some(3000.0),
        }
    }
}

/// Vendor-specific G-code command templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GcodeTemplates {
    /// Startup block emitted after the header comment
    pub header: String,
    /// Shutdown block emitted before the end-of-file marker
    pub footer: String,
    /// Ventilation on
    pub ventilation_on: String,
    /// Ventilation off
    pub ventilation_off: String,
    /// Laser on; the S argument is appended when power modulation is supported
    pub laser_on: String,
    /// Laser off
    pub laser_off: String,
    /// Dwell prefix; the delay in seconds is appended
    pub laser_delay: String,
}

impl Default for GcodeTemplates {
    fn default() -> Self {
        Self {
            header: "G90 ; Absolute distance\\nG21 ; Units in mm".to_string(),
            footer: "M2".to_string(),
            ventilation_on: "M106 ; Ventilation On".to_string(),
            ventilation_off: "M107 ; Ventilation Off".to_string(),
            laser_on: "M3".to_string(),
            laser_off: "M5".to_string(),
            laser_delay: "G4 P".to_string(),
        }
    }
}

impl GcodeTemplates {
    /// Startup block with escapes expanded
    pub fn header_text(&self) -> String {
        expand_escapes(&self.header)
    }

    /// Shutdown block with escapes expanded
    pub fn footer_text(&self) -> String {
        expand_escapes(&self.footer)
    }

    /// Ventilation on/off command with escapes expanded
    pub fn ventilation_text(&self, on: bool) -> String {
        if on {
            expand_escapes(&self.ventilation_on)
        } else {
            expand_escapes(&self.ventilation_off)
        }
    }

    /// Laser on command with escapes expanded
    pub fn laser_on_text(&self) -> String {
        expand_escapes(&self.laser_on)
    }

    /// Laser off command with escapes expanded
    pub fn laser_off_text(&self) -> String {
        expand_escapes(&self.laser_off)
    }

    /// Dwell prefix with escapes expanded
    pub fn laser_delay_text(&self) -> String {
        expand_escapes(&self.laser_delay)
    }
}

/// Complete driver configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverSettings {
    /// Where the generated program is written
    pub output_file: PathBuf,
    /// Machine geometry and capabilities
    pub machine: MachineSettings,
    /// Command templates
    pub gcode: GcodeTemplates,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            output_file: PathBuf::from("gcode_output.nc"),
            machine: MachineSettings::default(),
            gcode: GcodeTemplates::default(),
        }
    }
}

impl DriverSettings {
    /// Create new settings with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let settings: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content)?
        } else {
            return Err(SettingsError::UnsupportedFormat(path.display().to_string()));
        };

        settings.validate()?;
        tracing::debug!("Loaded driver settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::to_string_pretty(self)?
        } else {
            return Err(SettingsError::UnsupportedFormat(path.display().to_string()));
        };

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Render the settings as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate configuration
    ///
    /// Rejects anything that would leave the laser state ambiguous.
    pub fn validate(&self) -> Result<()> {
        let machine = &self.machine;

        if !positive(machine.bed_width) {
            return Err(SettingsError::invalid("bed_width", "must be > 0"));
        }
        if !positive(machine.bed_height) {
            return Err(SettingsError::invalid("bed_height", "must be > 0"));
        }
        if !positive(machine.power_scale) {
            return Err(SettingsError::invalid("power_scale", "must be > 0"));
        }
        if let Some(feed) = machine.rapid_feed {
            if !positive(feed) {
                return Err(SettingsError::invalid("rapid_feed", "must be > 0 when set"));
            }
        }

        if self.gcode.laser_on.trim().is_empty() {
            return Err(SettingsError::invalid("laser_on", "must not be empty"));
        }
        if self.gcode.laser_off.trim().is_empty() {
            return Err(SettingsError::invalid("laser_off", "must not be empty"));
        }
        if machine.supports_ventilation
            && (self.gcode.ventilation_on.trim().is_empty()
                || self.gcode.ventilation_off.trim().is_empty())
        {
            return Err(SettingsError::invalid(
                "ventilation_on",
                "ventilation commands are required when ventilation is supported",
            ));
        }

        Ok(())
    }
}
