//! Write-only transport over any `io::Write`
//!
//! Used when a job is saved instead of sent: the command stream is the same,
//! but nothing ever answers.

use super::LineTransport;
use laserkit_core::{ConnectionError, Result};
use std::io::Write;
use std::time::Duration;

/// Sink transport wrapping a writer
#[derive(Debug)]
pub struct WriterTransport<W: Write> {
    inner: W,
}

impl<W: Write> WriterTransport<W> {
    /// Wrap a writer
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Unwrap the writer
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> LineTransport for WriterTransport<W> {
    fn read_line(&mut self, _timeout: Duration) -> Result<String> {
        Err(ConnectionError::NotConnected.into())
    }

    fn has_buffered_input(&mut self) -> Result<bool> {
        Ok(false)
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.inner.write_all(&[byte])?;
        Ok(())
    }

    fn write_str(&mut self, text: &str) -> Result<()> {
        self.inner.write_all(text.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }
}
