//! Vector job parts: ordered move/draw/property commands.

use super::{check_dpi, PropertyBag};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// One step of a vector part. Coordinates are in pixels at the part's resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VectorCommand {
    /// Travel to a point with the laser off
    MoveTo {
        /// X in pixels
        x: f64,
        /// Y in pixels
        y: f64,
    },
    /// Cut in a straight line to a point
    LineTo {
        /// X in pixels
        x: f64,
        /// Y in pixels
        y: f64,
    },
    /// Switch the active laser settings for the following commands
    SetProperty {
        /// New settings
        property: PropertyBag,
    },
}

/// A vector part of a laser job.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorPart {
    dpi: f64,
    property: PropertyBag,
    commands: Vec<VectorCommand>,
}

impl VectorPart {
    /// Create an empty vector part with its initial property
    pub fn new(property: PropertyBag, dpi: f64) -> Result<Self> {
        check_dpi(dpi)?;
        Ok(Self {
            dpi,
            property,
            commands: Vec::new(),
        })
    }

    /// Create a vector part from an existing command list
    pub fn with_commands(
        property: PropertyBag,
        dpi: f64,
        commands: Vec<VectorCommand>,
    ) -> Result<Self> {
        let mut part = Self::new(property, dpi)?;
        part.commands = commands;
        Ok(part)
    }

    /// Append a travel move
    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.commands.push(VectorCommand::MoveTo { x, y });
        self
    }

    /// Append a cutting move
    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.commands.push(VectorCommand::LineTo { x, y });
        self
    }

    /// Append a property change
    pub fn set_property(&mut self, property: PropertyBag) -> &mut Self {
        self.commands.push(VectorCommand::SetProperty { property });
        self
    }

    /// Resolution in dots per inch
    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    /// Property active at the start of the part
    pub fn property(&self) -> &PropertyBag {
        &self.property
    }

    /// Ordered command list
    pub fn commands(&self) -> &[VectorCommand] {
        &self.commands
    }
}
