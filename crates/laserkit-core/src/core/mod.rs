//! Core driver abstractions

pub mod listener;

pub use listener::{FnProgress, NoOpProgress, ProgressListener, RecordingProgress};
