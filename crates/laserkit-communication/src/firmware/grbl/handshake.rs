//! Connection handshake
//!
//! `Idle -> ResetSent -> AwaitingIdentity -> {Locked, Unlocked} -> Homing -> Ready`,
//! with `Error` reachable from every step. Failures are returned as values
//! and leave the transport open for the caller.

use super::profile::LockCheck;
use super::response::{is_lock_notice, OK};
use super::session::GrblSession;
use crate::communication::LineTransport;
use laserkit_core::{ConnectionError, ProgressListener, Result};

/// Soft reset byte; makes GRBL reprint its banner
pub const SOFT_RESET: u8 = 0x18;

/// Home cycle command
pub const HOME_COMMAND: &str = "$H";

/// Handshake progress of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    /// Nothing sent yet
    Idle,
    /// Reset byte written
    ResetSent,
    /// Scanning for the banner
    AwaitingIdentity,
    /// Controller reported an alarm lock
    Locked,
    /// Controller accepts commands without homing
    Unlocked,
    /// Home command issued
    Homing,
    /// Handshake complete
    Ready,
    /// Handshake failed
    Error,
}

impl<T: LineTransport> GrblSession<'_, T> {
    /// Reset the controller, verify its identity and clear an alarm lock
    pub fn connect(&mut self, progress: &mut dyn ProgressListener) -> Result<()> {
        match self.run_handshake(progress) {
            Ok(()) => {
                self.transition(HandshakeState::Ready);
                tracing::info!("{} ready", self.driver.model_name());
                Ok(())
            }
            Err(e) => {
                self.transition(HandshakeState::Error);
                tracing::warn!("{} handshake failed: {}", self.driver.model_name(), e);
                Err(e)
            }
        }
    }

    fn transition(&mut self, next: HandshakeState) {
        tracing::debug!("Handshake {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn run_handshake(&mut self, progress: &mut dyn ProgressListener) -> Result<()> {
        let source = self.driver.model_name();

        self.discard_input()?;

        progress.task_changed(source, "Sending soft reset");
        self.transport.write_byte(SOFT_RESET)?;
        self.transport.flush()?;
        self.transition(HandshakeState::ResetSent);

        self.await_identity(progress)?;

        let lock_check = self.driver.profile().lock_check();
        let auto_home = self.driver.config().auto_home;
        if self.check_locked(lock_check)? {
            self.transition(HandshakeState::Locked);
            if !auto_home {
                return Err(ConnectionError::ControllerLocked.into());
            }
        } else {
            self.transition(HandshakeState::Unlocked);
            if !(auto_home && lock_check == LockCheck::Always) {
                return Ok(());
            }
        }

        progress.task_changed(source, "Homing");
        self.transition(HandshakeState::Homing);
        self.send_line_without_ack(HOME_COMMAND)?;

        // either "ok" or "[MSG:Caution: Unlocked]" followed by "ok"
        let mut line = self.wait_for_line()?;
        if line != OK {
            line = self.wait_for_line()?;
        }
        if line != OK {
            return Err(ConnectionError::HomingFailed { response: line }.into());
        }
        tracing::info!("Homing cycle complete");
        Ok(())
    }

    /// Drop whatever the controller printed before the reset
    fn discard_input(&mut self) -> Result<()> {
        while self.transport.has_buffered_input()? {
            let line = self.read_line()?;
            tracing::debug!("Discarding stale input '{}'", line);
        }
        Ok(())
    }

    fn await_identity(&mut self, progress: &mut dyn ProgressListener) -> Result<()> {
        self.transition(HandshakeState::AwaitingIdentity);
        let expected = self.driver.config().identification_line.clone();
        if expected.is_empty() {
            return Ok(());
        }

        let source = self.driver.model_name();
        let attempts = self.driver.profile().identity_attempts();
        let mut line = String::new();
        for attempt in 1..=attempts {
            progress.task_changed(
                source,
                &format!("Waiting for identification ({}/{})", attempt, attempts),
            );
            line = self.wait_for_line()?;
            if line.contains(&expected) {
                tracing::info!("Controller identified: {}", line.trim());
                return Ok(());
            }
            tracing::debug!("Not a '{}' banner: '{}'", expected, line);
        }

        Err(ConnectionError::IdentityMismatch {
            expected,
            received: line,
        }
        .into())
    }

    fn check_locked(&mut self, lock_check: LockCheck) -> Result<bool> {
        let line = match lock_check {
            LockCheck::WhenBuffered => {
                if !self.transport.has_buffered_input()? {
                    return Ok(false);
                }
                self.wait_for_line()?
            }
            LockCheck::Always => match self.wait_for_line() {
                Ok(line) => line,
                Err(e) if e.is_timeout() => {
                    tracing::debug!("Nothing after the banner, assuming unlocked");
                    return Ok(false);
                }
                Err(e) => return Err(e),
            },
        };
        let locked = is_lock_notice(&line);
        if locked {
            tracing::warn!("Controller is locked: {}", line.trim());
        }
        Ok(locked)
    }
}
