//! Driver session and line sender
//!
//! A session binds a driver's configuration to one exclusively owned
//! transport. It carries the handshake state and the runtime cache; both
//! die with the session, so duplicating a driver never copies them.

use super::driver::GrblDriver;
use super::handshake::HandshakeState;
use super::response::{GrblResponse, OK};
use super::translator::RuntimeCache;
use crate::communication::LineTransport;
use laserkit_core::{ControllerError, Result};

/// Whether a send blocks for the controller's `ok`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckMode {
    /// Read one line and require `ok`
    Wait,
    /// Return right after the flush
    Skip,
}

/// A driver talking to one controller
pub struct GrblSession<'d, T: LineTransport> {
    pub(super) driver: &'d GrblDriver,
    pub(super) transport: T,
    pub(super) state: HandshakeState,
    pub(super) cache: RuntimeCache,
    wait_for_ok: bool,
}

impl<'d, T: LineTransport> GrblSession<'d, T> {
    pub(super) fn new(driver: &'d GrblDriver, transport: T, wait_for_ok: bool) -> Self {
        Self {
            driver,
            transport,
            state: HandshakeState::Idle,
            cache: RuntimeCache::default(),
            wait_for_ok,
        }
    }

    /// Driver this session runs
    pub fn driver(&self) -> &GrblDriver {
        self.driver
    }

    /// Current handshake state
    pub fn state(&self) -> HandshakeState {
        self.state
    }

    /// Cached machine state
    pub fn cache(&self) -> &RuntimeCache {
        &self.cache
    }

    /// Forget every cached value, forcing re-emission
    pub fn reset_cache(&mut self) {
        self.cache = RuntimeCache::default();
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Give the transport back
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Send one line, waiting for `ok` when the session requires it
    pub fn send_line(&mut self, line: &str) -> Result<()> {
        let ack = if self.wait_for_ok {
            AckMode::Wait
        } else {
            AckMode::Skip
        };
        self.send_line_with(line, ack)
    }

    /// Send one line without reading an acknowledgment
    pub fn send_line_without_ack(&mut self, line: &str) -> Result<()> {
        self.send_line_with(line, AckMode::Skip)
    }

    /// Send one line with an explicit acknowledgment mode
    ///
    /// Whitespace is stripped, the configured terminator appended and the
    /// output flushed before any wait.
    pub fn send_line_with(&mut self, line: &str, ack: AckMode) -> Result<()> {
        let command: String = line.chars().filter(|c| !c.is_whitespace()).collect();
        tracing::trace!("> {}", command);

        self.transport.write_str(&command)?;
        self.transport
            .write_str(self.driver.config().line_ending.as_str())?;
        self.transport.flush()?;

        if ack == AckMode::Wait {
            let response = self.read_line()?;
            if response != OK {
                match GrblResponse::parse(&response).describe() {
                    Some(description) => tracing::error!(
                        "'{}' rejected with '{}': {}",
                        command,
                        response,
                        description
                    ),
                    None => tracing::error!("'{}' answered with '{}'", command, response),
                }
                return Err(ControllerError::ProtocolViolation { response }.into());
            }
        }
        Ok(())
    }

    /// Send a list of commands in order
    pub fn send_commands(&mut self, commands: &[&str]) -> Result<()> {
        for command in commands {
            self.send_line(command)?;
        }
        Ok(())
    }

    /// Read one raw line within the serial timeout
    pub(super) fn read_line(&mut self) -> Result<String> {
        let line = self
            .transport
            .read_line(self.driver.config().serial_timeout())?;
        tracing::trace!("< {}", line);
        Ok(line)
    }

    /// Read the next non-blank line
    pub(super) fn wait_for_line(&mut self) -> Result<String> {
        loop {
            let line = self.read_line()?;
            if !line.trim().is_empty() {
                return Ok(line);
            }
        }
    }
}
