//! Configuration file handling for LaserKit
//!
//! Supports JSON and TOML files. Configuration is organized into:
//! - Connection settings (port, baud rate, read timeout)
//! - Machine settings (controller model, driver attribute overrides)
//!
//! Machine overrides go through the driver's named-attribute interface, so
//! a file can only change what the chosen model exposes.

use crate::error::{SettingsError, SettingsResult};
use laserkit_communication::firmware::DriverAttribute;
use laserkit_communication::{ControllerModel, GrblDriver};
use laserkit_core::AttributeValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Serial device, `auto` picks the first controller-like port
    pub port: String,
    /// Baud rate for serial connections
    pub baud_rate: u32,
    /// Read timeout in milliseconds; the model default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            port: "auto".to_string(),
            baud_rate: 115200,
            timeout_ms: None,
        }
    }
}

/// Machine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineSettings {
    /// Controller model id, e.g. `grbl` or `falcon2`
    pub model: String,
    /// Driver attribute overrides by display name
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl Default for MachineSettings {
    fn default() -> Self {
        Self {
            model: ControllerModel::default().id().to_string(),
            attributes: BTreeMap::new(),
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Connection settings
    pub connection: ConnectionSettings,
    /// Machine settings
    pub machine: MachineSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(SettingsError::UnsupportedFormat(
            other.unwrap_or_default().to_string(),
        )),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("laserkit").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no configuration directory on this platform".into())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)?;
        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };
        config.validate()?;
        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!("{} not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        tracing::info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    ///
    /// Besides the connection values, every attribute override must name an
    /// attribute the model exposes and carry a value of the right type.
    pub fn validate(&self) -> SettingsResult<()> {
        if self.connection.baud_rate == 0 {
            return Err(SettingsError::InvalidSetting {
                key: "connection.baud_rate".to_string(),
                reason: "must be > 0".to_string(),
            });
        }
        if self.connection.timeout_ms == Some(0) {
            return Err(SettingsError::InvalidSetting {
                key: "connection.timeout_ms".to_string(),
                reason: "must be > 0".to_string(),
            });
        }
        self.build_driver().map(|_| ())
    }

    /// Controller model named by the configuration
    pub fn model(&self) -> SettingsResult<ControllerModel> {
        self.machine
            .model
            .parse()
            .map_err(|e: laserkit_core::ConfigError| SettingsError::InvalidSetting {
                key: "machine.model".to_string(),
                reason: e.to_string(),
            })
    }

    /// Driver with these settings applied
    pub fn build_driver(&self) -> SettingsResult<GrblDriver> {
        let mut driver = GrblDriver::new(self.model()?)?;
        self.apply_to(&mut driver)?;
        Ok(driver)
    }

    /// Apply connection settings and attribute overrides to `driver`
    pub fn apply_to(&self, driver: &mut GrblDriver) -> SettingsResult<()> {
        driver.set_attribute(
            DriverAttribute::ComPort.name(),
            self.connection.port.as_str(),
        )?;
        driver.set_attribute(
            DriverAttribute::BaudRate.name(),
            f64::from(self.connection.baud_rate),
        )?;
        if let Some(timeout) = self.connection.timeout_ms {
            driver.set_attribute(DriverAttribute::SerialTimeout.name(), timeout as f64)?;
        }
        for (name, value) in &self.machine.attributes {
            driver.set_attribute(name, value.clone())?;
        }
        Ok(())
    }
}
