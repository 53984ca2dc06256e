//! Cutting property resolution
//!
//! Jobs carry loosely typed property bags. Before anything is emitted each bag
//! is normalised into a [`CuttingProperty`]: required fields are checked,
//! optional ones defaulted and numeric ranges clamped.

use crate::error::{EmitterError, Result};
use lasercut_core::{LaserProperty, PropertyValue};

/// Field names understood by the resolver.
pub mod keys {
    pub const POWER: &str = "power";
    pub const SPEED: &str = "speed";
    pub const FOCUS: &str = "focus";
    pub const VENTILATION: &str = "ventilation";
    pub const PASSES: &str = "passes";
    pub const PASS_DEPTH: &str = "pass depth";
    pub const LASER_DELAY: &str = "laser delay";
    pub const ENGRAVE_BOTTOM_UP: &str = "engrave bottom up";
    pub const ENGRAVE_UNIDIRECTIONAL: &str = "engrave unidirectional";

    /// Every recognised field, in a stable order
    pub const ALL: [&str; 9] = [
        POWER,
        SPEED,
        FOCUS,
        VENTILATION,
        PASSES,
        PASS_DEPTH,
        LASER_DELAY,
        ENGRAVE_BOTTOM_UP,
        ENGRAVE_UNIDIRECTIONAL,
    ];
}

/// Highest accepted cutting speed (mm/min)
pub const MAX_SPEED: f64 = 4000.0;

/// Highest accepted power (percent)
pub const MAX_POWER: f64 = 100.0;

/// Fully resolved laser settings for one part or property change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CuttingProperty {
    /// Laser power in percent (0-100)
    pub power: f64,
    /// Cutting speed in mm/min (0-4000)
    pub speed: f64,
    /// Focus offset in mm
    pub focus: f64,
    /// Air assist / exhaust requested
    pub ventilation: bool,
    /// Number of passes (at least 1)
    pub passes: u32,
    /// Z step applied before every pass after the first (mm)
    pub pass_depth: f64,
    /// Dwell after switching the laser on (ms)
    pub laser_delay: f64,
    /// Engrave rasters from the last row to the first
    pub engrave_bottom_up: bool,
    /// Scan every raster line left to right
    pub engrave_unidirectional: bool,
}

impl CuttingProperty {
    /// Property with the given power and speed and defaults for everything else
    pub fn new(power: f64, speed: f64) -> Self {
        Self {
            power: power.clamp(0.0, MAX_POWER),
            speed: speed.clamp(0.0, MAX_SPEED),
            focus: 0.0,
            ventilation: true,
            passes: 1,
            pass_depth: 0.0,
            laser_delay: 0.0,
            engrave_bottom_up: false,
            engrave_unidirectional: false,
        }
    }

    /// Resolve any property carrier.
    ///
    /// `power` and `speed` are required. A field supplied with the wrong value
    /// type is rejected rather than replaced by its default.
    pub fn resolve<P: LaserProperty + ?Sized>(source: &P) -> Result<Self> {
        let power = required_number(source, keys::POWER)?;
        let speed = required_number(source, keys::SPEED)?;
        let mut property = Self::new(power, speed);

        if let Some(focus) = optional_number(source, keys::FOCUS)? {
            property.focus = focus;
        }
        if let Some(ventilation) = optional_flag(source, keys::VENTILATION)? {
            property.ventilation = ventilation;
        }
        if let Some(passes) = optional_count(source, keys::PASSES)? {
            property.passes = passes.clamp(1, i64::from(u32::MAX)) as u32;
        }
        if let Some(depth) = optional_number(source, keys::PASS_DEPTH)? {
            property.pass_depth = depth;
        }
        if let Some(delay) = optional_number(source, keys::LASER_DELAY)? {
            property.laser_delay = delay.max(0.0);
        }
        if let Some(bottom_up) = optional_flag(source, keys::ENGRAVE_BOTTOM_UP)? {
            property.engrave_bottom_up = bottom_up;
        }
        if let Some(unidirectional) = optional_flag(source, keys::ENGRAVE_UNIDIRECTIONAL)? {
            property.engrave_unidirectional = unidirectional;
        }

        Ok(property)
    }

    /// Whether the Z axis steps between passes
    pub fn steps_between_passes(&self) -> bool {
        self.passes > 1 && self.pass_depth != 0.0
    }
}

impl LaserProperty for CuttingProperty {
    fn get_property(&self, name: &str) -> Option<PropertyValue> {
        let value = match name {
            keys::POWER => PropertyValue::Float(self.power),
            keys::SPEED => PropertyValue::Float(self.speed),
            keys::FOCUS => PropertyValue::Float(self.focus),
            keys::VENTILATION => PropertyValue::Bool(self.ventilation),
            keys::PASSES => PropertyValue::Int(i64::from(self.passes)),
            keys::PASS_DEPTH => PropertyValue::Float(self.pass_depth),
            keys::LASER_DELAY => PropertyValue::Float(self.laser_delay),
            keys::ENGRAVE_BOTTOM_UP => PropertyValue::Bool(self.engrave_bottom_up),
            keys::ENGRAVE_UNIDIRECTIONAL => PropertyValue::Bool(self.engrave_unidirectional),
            _ => return None,
        };
        Some(value)
    }

    fn property_keys(&self) -> Vec<String> {
        keys::ALL.iter().map(|key| key.to_string()).collect()
    }
}

fn number(field: &str, value: PropertyValue) -> Result<f64> {
    match value.as_f64() {
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(EmitterError::incompatible(
            field,
            format!("{} is not a finite number", v),
        )),
        None => Err(EmitterError::incompatible(
            field,
            format!("expected a number, got {} {}", value.type_name(), value),
        )),
    }
}

fn required_number<P: LaserProperty + ?Sized>(source: &P, field: &str) -> Result<f64> {
    match source.get_property(field) {
        Some(value) => number(field, value),
        None => Err(EmitterError::incompatible(field, "required field is missing")),
    }
}

fn optional_number<P: LaserProperty + ?Sized>(source: &P, field: &str) -> Result<Option<f64>> {
    source
        .get_property(field)
        .map(|value| number(field, value))
        .transpose()
}

fn optional_count<P: LaserProperty + ?Sized>(source: &P, field: &str) -> Result<Option<i64>> {
    source
        .get_property(field)
        .map(|value| {
            value.as_i64().ok_or_else(|| {
                EmitterError::incompatible(
                    field,
                    format!("expected a whole number, got {} {}", value.type_name(), value),
                )
            })
        })
        .transpose()
}

fn optional_flag<P: LaserProperty + ?Sized>(source: &P, field: &str) -> Result<Option<bool>> {
    source
        .get_property(field)
        .map(|value| {
            value.as_bool().ok_or_else(|| {
                EmitterError::incompatible(
                    field,
                    format!("expected true or false, got {} {}", value.type_name(), value),
                )
            })
        })
        .transpose()
}
