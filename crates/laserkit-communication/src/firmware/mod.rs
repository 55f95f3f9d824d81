//! Firmware implementations for GRBL-family laser controllers
//!
//! Supported controllers:
//! - GRBL: Open-source CNC control software, in laser mode
//! - Creality Falcon2: GRBL derivative with air assist and a bounded banner scan

pub mod grbl;
pub mod settings;

pub use grbl::{
    AckMode, DriverConfig, FirmwareProfile, GrblDriver, GrblSession, HandshakeState, LineEnding,
    LockCheck, RuntimeCache,
};
pub use settings::{derive_attributes, DriverAttribute, FirmwareSetting, GENERIC_ATTRIBUTES};

use laserkit_core::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported controller models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControllerModel {
    /// Stock GRBL (default, most common)
    #[default]
    Grbl,
    /// Creality Falcon2
    Falcon2,
}

const SUPPORTED_MODELS: &[ControllerModel] = &[ControllerModel::Grbl, ControllerModel::Falcon2];

impl ControllerModel {
    /// Every model a driver can be built for
    pub fn supported() -> &'static [ControllerModel] {
        SUPPORTED_MODELS
    }

    /// Short identifier used in configuration files
    pub fn id(&self) -> &'static str {
        match self {
            Self::Grbl => "grbl",
            Self::Falcon2 => "falcon2",
        }
    }

    /// Human-readable model name, also the progress source
    pub fn model_name(&self) -> &'static str {
        match self {
            Self::Grbl => "Grbl Gcode Driver",
            Self::Falcon2 => "Creality Falcon2",
        }
    }
}

impl std::fmt::Display for ControllerModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.model_name())
    }
}

impl FromStr for ControllerModel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SUPPORTED_MODELS
            .iter()
            .copied()
            .find(|m| m.id().eq_ignore_ascii_case(s) || m.model_name() == s)
            .ok_or_else(|| ConfigError::InvalidValue {
                name: "model".to_string(),
                reason: format!("unknown controller model '{}'", s),
            })
    }
}
