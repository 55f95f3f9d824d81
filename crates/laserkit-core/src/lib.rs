//! # LaserKit Core
//!
//! Core types, errors, and utilities for LaserKit.
//! Provides the job model consumed by the firmware drivers, the progress
//! listener interface and unit conversions.

pub mod core;
pub mod data;
pub mod error;
pub mod units;

pub use crate::core::{FnProgress, NoOpProgress, ProgressListener, RecordingProgress};

pub use data::{
    AttributeValue, LaosCutterProperty, LaserJob, LaserProperty, PowerSpeedFocusFrequencyProperty,
    PropertyKind, ValueType, VectorCommand, VectorPart,
};

pub use error::{ConfigError, ConnectionError, ControllerError, Error, JobError, Result};
