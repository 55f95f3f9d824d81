//! Line-oriented transports
//!
//! A driver talks to its controller through a [`LineTransport`]: blocking
//! line reads with a timeout, raw byte writes and explicit flushes. The
//! serial implementation lives in [`serial`]; [`scripted`] provides an
//! in-memory controller and [`writer`] a write-only sink for saving jobs.

pub mod scripted;
pub mod serial;
pub mod writer;

use laserkit_core::Result;
use std::time::Duration;

pub use scripted::ScriptedTransport;
pub use serial::{list_ports, SerialPortInfo, SerialTransport};
pub use writer::WriterTransport;

/// Bidirectional byte stream with line-buffered reads
///
/// One transport is owned by one driver session at a time.
pub trait LineTransport {
    /// Read one line without its terminator, blocking up to `timeout`
    fn read_line(&mut self, timeout: Duration) -> Result<String>;

    /// Whether a line can be read without blocking
    fn has_buffered_input(&mut self) -> Result<bool>;

    /// Write a single raw byte
    fn write_byte(&mut self, byte: u8) -> Result<()>;

    /// Write text as-is
    fn write_str(&mut self, text: &str) -> Result<()>;

    /// Flush pending output to the device
    fn flush(&mut self) -> Result<()>;
}

impl<T: LineTransport + ?Sized> LineTransport for &mut T {
    fn read_line(&mut self, timeout: Duration) -> Result<String> {
        (**self).read_line(timeout)
    }

    fn has_buffered_input(&mut self) -> Result<bool> {
        (**self).has_buffered_input()
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        (**self).write_byte(byte)
    }

    fn write_str(&mut self, text: &str) -> Result<()> {
        (**self).write_str(text)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

impl<T: LineTransport + ?Sized> LineTransport for Box<T> {
    fn read_line(&mut self, timeout: Duration) -> Result<String> {
        (**self).read_line(timeout)
    }

    fn has_buffered_input(&mut self) -> Result<bool> {
        (**self).has_buffered_input()
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        (**self).write_byte(byte)
    }

    fn write_str(&mut self, text: &str) -> Result<()> {
        (**self).write_str(text)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}
