//! # LaserKit
//!
//! A line-protocol driver for GRBL-family laser cutters:
//! - Stock GRBL in laser mode
//! - Creality Falcon2 (bounded banner scan, unconditional lock check, air assist)
//!
//! ## Architecture
//!
//! LaserKit is organized as a workspace with multiple crates:
//!
//! 1. **laserkit-core** - Errors, job model, units, progress reporting
//! 2. **laserkit-communication** - Line transports, handshake, sender, translator
//! 3. **laserkit-settings** - Configuration files and driver attribute overrides
//! 4. **laserkit** - Command-line front end that integrates all crates

pub use laserkit_communication::firmware;

pub use laserkit_core::{
    AttributeValue, ConfigError, ConnectionError, ControllerError, Error, JobError,
    LaosCutterProperty, LaserJob, LaserProperty, NoOpProgress, PowerSpeedFocusFrequencyProperty,
    ProgressListener, Result, VectorCommand, VectorPart,
};

pub use laserkit_communication::{
    list_ports, ControllerModel, DriverAttribute, DriverConfig, GrblDriver, GrblSession,
    HandshakeState, LineTransport, ScriptedTransport, SerialPortInfo, SerialTransport,
    WriterTransport,
};

pub use laserkit_settings::{Config, ConnectionSettings, MachineSettings, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr
/// - RUST_LOG environment variable support, INFO by default
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
