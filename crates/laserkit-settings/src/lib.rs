//! LaserKit Settings Crate
//!
//! Loads and saves driver configuration files and applies them to drivers.

pub mod config;
pub mod error;

pub use config::{Config, ConnectionSettings, MachineSettings};
pub use error::{SettingsError, SettingsResult};
