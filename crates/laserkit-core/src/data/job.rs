//! Laser job model
//!
//! A job is a list of vector parts; each part is an ordered stream of
//! drawing commands in pixel coordinates at the part's resolution.

use super::property::LaserProperty;
use serde::{Deserialize, Serialize};

/// One drawing command
///
/// Commands are consumed strictly in order, so a property change applies to
/// every following cut until the next one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum VectorCommand {
    /// Rapid positioning move, laser not cutting
    MoveTo {
        /// X in pixels
        x: f64,
        /// Y in pixels
        y: f64,
    },
    /// Cutting move at the current property
    LineTo {
        /// X in pixels
        x: f64,
        /// Y in pixels
        y: f64,
    },
    /// Switch to a new property
    SetProperty(LaserProperty),
}

impl VectorCommand {
    /// Target of a move, `None` for property changes
    pub fn target(&self) -> Option<(f64, f64)> {
        match *self {
            Self::MoveTo { x, y } | Self::LineTo { x, y } => Some((x, y)),
            Self::SetProperty(_) => None,
        }
    }
}

/// A vector part of a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorPart {
    /// Resolution of the coordinates in dots per inch
    pub resolution: f64,
    /// Commands in emission order
    pub commands: Vec<VectorCommand>,
}

impl VectorPart {
    /// Create an empty part at `resolution` DPI
    pub fn new(resolution: f64) -> Self {
        Self {
            resolution,
            commands: Vec::new(),
        }
    }

    /// Append a rapid move
    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        self.commands.push(VectorCommand::MoveTo { x, y });
        self
    }

    /// Append a cut move
    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        self.commands.push(VectorCommand::LineTo { x, y });
        self
    }

    /// Append a property change
    pub fn set_property(mut self, property: impl Into<LaserProperty>) -> Self {
        self.commands.push(VectorCommand::SetProperty(property.into()));
        self
    }
}

/// A complete job
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LaserJob {
    /// Job title shown in progress reports
    pub title: String,
    /// Vector parts in execution order
    pub parts: Vec<VectorPart>,
}

impl LaserJob {
    /// Create an empty job
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            parts: Vec::new(),
        }
    }

    /// Append a vector part
    pub fn with_part(mut self, part: VectorPart) -> Self {
        self.parts.push(part);
        self
    }

    /// Total number of drawing commands
    pub fn command_count(&self) -> usize {
        self.parts.iter().map(|p| p.commands.len()).sum()
    }
}
