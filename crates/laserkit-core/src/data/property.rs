//! Laser properties
//!
//! A property bundles the settings a cut is made with. Each driver accepts
//! exactly one kind, matching its capability profile.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminant of a [`LaserProperty`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyKind {
    /// Power, speed, focus and frequency
    PowerSpeed,
    /// LAOS-style property carrying the ventilation flag
    LaosCutter,
}

impl PropertyKind {
    /// Name used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Self::PowerSpeed => "PowerSpeedFocusFrequency",
            Self::LaosCutter => "LaosCutter",
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Generic power/speed property
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerSpeedFocusFrequencyProperty {
    /// Laser power in percent
    pub power: f64,
    /// Cut speed in percent of the machine's max speed
    pub speed: f64,
    /// Focus offset in millimeters
    pub focus: f64,
    /// Pulse frequency in Hz
    pub frequency: u32,
}

impl Default for PowerSpeedFocusFrequencyProperty {
    fn default() -> Self {
        Self {
            power: 20.0,
            speed: 100.0,
            focus: 0.0,
            frequency: 5000,
        }
    }
}

/// LAOS-style property with an air-assist/ventilation switch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaosCutterProperty {
    /// Laser power in percent
    pub power: f64,
    /// Cut speed in percent of the machine's max speed
    pub speed: f64,
    /// Focus offset in millimeters
    pub focus: f64,
    /// Pulse frequency in Hz
    pub frequency: u32,
    /// Auxiliary actuator (air assist) on while cutting
    pub ventilation: bool,
}

impl Default for LaosCutterProperty {
    fn default() -> Self {
        Self {
            power: 20.0,
            speed: 100.0,
            focus: 0.0,
            frequency: 500,
            ventilation: true,
        }
    }
}

/// A property as carried by a set-property command
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LaserProperty {
    /// Generic property
    PowerSpeed(PowerSpeedFocusFrequencyProperty),
    /// Property with ventilation
    LaosCutter(LaosCutterProperty),
}

impl LaserProperty {
    /// Kind tag of this property
    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::PowerSpeed(_) => PropertyKind::PowerSpeed,
            Self::LaosCutter(_) => PropertyKind::LaosCutter,
        }
    }

    /// Power in percent
    pub fn power(&self) -> f64 {
        match self {
            Self::PowerSpeed(p) => p.power,
            Self::LaosCutter(p) => p.power,
        }
    }

    /// Speed in percent
    pub fn speed(&self) -> f64 {
        match self {
            Self::PowerSpeed(p) => p.speed,
            Self::LaosCutter(p) => p.speed,
        }
    }

    /// Requested ventilation state, if this kind carries one
    pub fn ventilation(&self) -> Option<bool> {
        match self {
            Self::PowerSpeed(_) => None,
            Self::LaosCutter(p) => Some(p.ventilation),
        }
    }
}

impl From<PowerSpeedFocusFrequencyProperty> for LaserProperty {
    fn from(p: PowerSpeedFocusFrequencyProperty) -> Self {
        Self::PowerSpeed(p)
    }
}

impl From<LaosCutterProperty> for LaserProperty {
    fn from(p: LaosCutterProperty) -> Self {
        Self::LaosCutter(p)
    }
}
