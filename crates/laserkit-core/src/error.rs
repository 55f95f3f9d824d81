//! Error handling for LaserKit
//!
//! Provides error types for all layers of the driver stack:
//! - Connection errors (transport and handshake)
//! - Controller errors (flow-control protocol)
//! - Job errors (command stream and job validation)
//! - Configuration errors (named attribute access)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Connection error type
///
/// Represents failures while bringing up or talking over a controller
/// connection, including the handshake outcomes reported to the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConnectionError {
    /// The identification banner never appeared within the retry bound
    #[error("Controller did not identify as '{expected}', last line was '{received}'")]
    IdentityMismatch {
        /// The configured identification substring.
        expected: String,
        /// The last line observed before giving up.
        received: String,
    },

    /// The controller reported an alarm lock and auto-homing is disabled
    #[error("Grbl is locked")]
    ControllerLocked,

    /// The homing cycle was not acknowledged
    #[error("Homing cycle failed to complete, controller answered '{response}'")]
    HomingFailed {
        /// The last response read after the home command.
        response: String,
    },

    /// A blocking read exceeded the serial timeout
    #[error("Connection timeout after {timeout_ms}ms")]
    Timeout {
        /// The timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// The byte stream was closed by the other side
    #[error("Connection lost: {reason}")]
    ConnectionLost {
        /// The reason the connection was lost.
        reason: String,
    },

    /// Failed to open port
    #[error("Failed to open port {port}: {reason}")]
    FailedToOpen {
        /// The name of the port that failed to open.
        port: String,
        /// The reason the port failed to open.
        reason: String,
    },

    /// Serial port error
    #[error("Serial port error: {reason}")]
    SerialError {
        /// The reason for the serial port error.
        reason: String,
    },

    /// The transport cannot be read from
    #[error("Not connected")]
    NotConnected,
}

/// Controller error type
///
/// Raised by the line sender when the firmware breaks the "ok" discipline.
/// The connection must be considered unusable afterwards.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControllerError {
    /// The controller answered something other than `ok`
    #[error("Lasercutter did not respond 'ok', but '{response}' instead")]
    ProtocolViolation {
        /// The unexpected response text.
        response: String,
    },
}

/// Job error type
///
/// Represents problems with the command stream handed to a driver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JobError {
    /// A property of the wrong kind reached the translator
    #[error("This driver accepts {expected} properties only, got {received}")]
    ContractViolation {
        /// The property kind the driver accepts.
        expected: &'static str,
        /// The property kind that was received.
        received: &'static str,
    },

    /// A move target lies outside the bed
    #[error("Position ({x:.3}, {y:.3}) mm is outside the {width} x {height} mm bed")]
    OutOfBounds {
        /// Target X in millimeters.
        x: f64,
        /// Target Y in millimeters.
        y: f64,
        /// Bed width in millimeters.
        width: f64,
        /// Bed height in millimeters.
        height: f64,
    },

    /// The job has nothing to cut
    #[error("Job contains no parts")]
    EmptyJob,
}

/// Configuration error type
///
/// Raised by the named-attribute interface and by profile construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// No attribute has this name
    #[error("Unknown attribute: {name}")]
    UnknownAttribute {
        /// The requested attribute name.
        name: String,
    },

    /// The attribute exists but this model does not expose it
    #[error("Attribute '{name}' is not configurable on {model}")]
    AttributeNotExposed {
        /// The attribute name.
        name: String,
        /// The controller model.
        model: String,
    },

    /// The value has the wrong type for the attribute
    #[error("Attribute '{name}' expects a {expected} value")]
    TypeMismatch {
        /// The attribute name.
        name: String,
        /// The expected value type.
        expected: &'static str,
    },

    /// The value is of the right type but unusable
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue {
        /// The attribute name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A profile's attribute list does not derive cleanly from its parent
    #[error("Invalid attribute set for {model}: {reason}")]
    InvalidAttributeSet {
        /// The controller model.
        model: String,
        /// What went wrong.
        reason: String,
    },
}

/// Main error type for LaserKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Connection error
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Controller error
    #[error(transparent)]
    Controller(#[from] ControllerError),

    /// Job error
    #[error(transparent)]
    Job(#[from] JobError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Connection(ConnectionError::Timeout { .. }))
    }

    /// Check if this is a connection error
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Error::Connection(_))
    }

    /// Check if the connection can no longer be used after this error
    pub fn is_fatal_to_connection(&self) -> bool {
        matches!(
            self,
            Error::Controller(_)
                | Error::Io(_)
                | Error::Connection(
                    ConnectionError::Timeout { .. }
                        | ConnectionError::ConnectionLost { .. }
                        | ConnectionError::SerialError { .. }
                )
        )
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_violation_embeds_response() {
        let err: Error = ControllerError::ProtocolViolation {
            response: "error:9".to_string(),
        }
        .into();
        assert!(err.to_string().contains("'error:9'"));
        assert!(err.is_fatal_to_connection());
    }

    #[test]
    fn test_handshake_errors_keep_channel() {
        let err: Error = ConnectionError::ControllerLocked.into();
        assert!(err.is_connection_error());
        assert!(!err.is_fatal_to_connection());
        assert_eq!(err.to_string(), "Grbl is locked");
    }

    #[test]
    fn test_timeout_classification() {
        let err: Error = ConnectionError::Timeout { timeout_ms: 30000 }.into();
        assert!(err.is_timeout());
        assert!(err.is_fatal_to_connection());
    }
}
