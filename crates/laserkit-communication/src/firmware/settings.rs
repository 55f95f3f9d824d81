//! Named driver attributes
//!
//! Every configurable driver field has a stable display name. A firmware
//! profile exposes a subset of them, derived from its parent's list by
//! removing and adding names.

use laserkit_core::{ConfigError, ValueType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A configurable driver attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriverAttribute {
    /// Serial device name
    ComPort,
    /// Serial baud rate
    BaudRate,
    /// Substring expected in the controller banner
    IdentificationLine,
    /// Wait for `ok` after each line
    WaitForOk,
    /// Line terminator
    LineEnding,
    /// Bed width in mm
    BedWidth,
    /// Bed height in mm
    BedHeight,
    /// Mirror the X axis
    FlipX,
    /// Mirror the Y axis
    FlipY,
    /// Rapid move speed in mm/min
    TravelSpeed,
    /// Cut speed at 100% in mm/min
    MaxSpeed,
    /// Commands sent before a job
    PreJobGcode,
    /// Commands sent after a job
    PostJobGcode,
    /// Read timeout in ms
    SerialTimeout,
    /// S value for 100% power
    SpindleMax,
    /// Send `S0` with rapid moves
    BlankLaserDuringRapids,
    /// Home when the controller reports an alarm lock
    AutoHome,
    /// Air assist / ventilation actuator present
    SupportsVentilation,
}

/// Attributes shared by every line-protocol driver
pub const GENERIC_ATTRIBUTES: &[DriverAttribute] = &[
    DriverAttribute::ComPort,
    DriverAttribute::BaudRate,
    DriverAttribute::IdentificationLine,
    DriverAttribute::WaitForOk,
    DriverAttribute::LineEnding,
    DriverAttribute::BedWidth,
    DriverAttribute::BedHeight,
    DriverAttribute::FlipX,
    DriverAttribute::FlipY,
    DriverAttribute::TravelSpeed,
    DriverAttribute::MaxSpeed,
    DriverAttribute::PreJobGcode,
    DriverAttribute::PostJobGcode,
    DriverAttribute::SerialTimeout,
    DriverAttribute::SpindleMax,
    DriverAttribute::BlankLaserDuringRapids,
];

const ALL_ATTRIBUTES: &[DriverAttribute] = &[
    DriverAttribute::ComPort,
    DriverAttribute::BaudRate,
    DriverAttribute::IdentificationLine,
    DriverAttribute::WaitForOk,
    DriverAttribute::LineEnding,
    DriverAttribute::BedWidth,
    DriverAttribute::BedHeight,
    DriverAttribute::FlipX,
    DriverAttribute::FlipY,
    DriverAttribute::TravelSpeed,
    DriverAttribute::MaxSpeed,
    DriverAttribute::PreJobGcode,
    DriverAttribute::PostJobGcode,
    DriverAttribute::SerialTimeout,
    DriverAttribute::SpindleMax,
    DriverAttribute::BlankLaserDuringRapids,
    DriverAttribute::AutoHome,
    DriverAttribute::SupportsVentilation,
];

impl DriverAttribute {
    /// Display name used by the named-attribute interface
    pub fn name(&self) -> &'static str {
        match self {
            Self::ComPort => "COM Port",
            Self::BaudRate => "Baud Rate (Serial)",
            Self::IdentificationLine => "Identification line",
            Self::WaitForOk => "Wait for OK after each line (interactive mode)",
            Self::LineEnding => "Lineend (CR,LF,CRLF)",
            Self::BedWidth => "Laserbed width",
            Self::BedHeight => "Laserbed height",
            Self::FlipX => "Flip X Axis",
            Self::FlipY => "Flip Y Axis",
            Self::TravelSpeed => "Travel speed (mm/min)",
            Self::MaxSpeed => "Max cutting speed (mm/min)",
            Self::PreJobGcode => "Pre-Job GCode (comma separated)",
            Self::PostJobGcode => "Post-Job GCode (comma separated)",
            Self::SerialTimeout => "Milliseconds to wait for response",
            Self::SpindleMax => "S value for 100% laser power",
            Self::BlankLaserDuringRapids => "Force laser off during G0 moves",
            Self::AutoHome => "Automatically home laser cutter",
            Self::SupportsVentilation => "Supports ventilation",
        }
    }

    /// Type of value the attribute holds
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::ComPort
            | Self::IdentificationLine
            | Self::LineEnding
            | Self::PreJobGcode
            | Self::PostJobGcode => ValueType::Text,
            Self::BaudRate
            | Self::BedWidth
            | Self::BedHeight
            | Self::TravelSpeed
            | Self::MaxSpeed
            | Self::SerialTimeout
            | Self::SpindleMax => ValueType::Numeric,
            Self::WaitForOk
            | Self::FlipX
            | Self::FlipY
            | Self::BlankLaserDuringRapids
            | Self::AutoHome
            | Self::SupportsVentilation => ValueType::Boolean,
        }
    }

    /// Every attribute any driver knows about
    pub fn all() -> &'static [DriverAttribute] {
        ALL_ATTRIBUTES
    }
}

impl fmt::Display for DriverAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DriverAttribute {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_ATTRIBUTES
            .iter()
            .copied()
            .find(|a| a.name() == s)
            .ok_or_else(|| ConfigError::UnknownAttribute {
                name: s.to_string(),
            })
    }
}

/// Derive a profile's attribute list from its parent's
///
/// Removing a name the parent lacks, or adding one it already has, is a
/// construction error: the lists are meant to be exact.
pub fn derive_attributes(
    model: &str,
    parent: &[DriverAttribute],
    removed: &[DriverAttribute],
    added: &[DriverAttribute],
) -> Result<Vec<DriverAttribute>, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidAttributeSet {
        model: model.to_string(),
        reason,
    };

    for attr in removed {
        if !parent.contains(attr) {
            return Err(invalid(format!("cannot remove '{}', not inherited", attr)));
        }
    }

    let mut result: Vec<DriverAttribute> = parent
        .iter()
        .copied()
        .filter(|a| !removed.contains(a))
        .collect();

    for attr in added {
        if result.contains(attr) {
            return Err(invalid(format!("'{}' is already exposed", attr)));
        }
        result.push(*attr);
    }

    Ok(result)
}

/// A driver setting as shown to users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirmwareSetting {
    /// Attribute name
    pub id: String,
    /// Current value
    pub value: String,
    /// Setting type
    pub setting_type: ValueType,
}
