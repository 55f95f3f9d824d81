//! In-memory transport with scripted controller responses
//!
//! Models a controller that answers what it is sent: each flush of
//! non-empty output releases the next scripted reply batch into the input
//! buffer. Lines queued with [`ScriptedTransport::with_pending`] are
//! readable immediately, like stale output left in a serial buffer.
//! Everything the driver writes is recorded. Clones share the same state,
//! so a test can keep a handle while the driver owns the transport.

use super::LineTransport;
use laserkit_core::{ConnectionError, Result};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Default)]
struct ScriptState {
    available: VecDeque<String>,
    replies: VecDeque<Vec<String>>,
    written: Vec<u8>,
    pending: Vec<u8>,
    flushes: usize,
    auto_ok: bool,
}

/// Scripted in-memory transport
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedTransport {
    /// Create a silent transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport that answers every flushed command line with `ok`
    /// once the scripted replies are used up
    pub fn acknowledging() -> Self {
        let transport = Self::new();
        transport.state.lock().auto_ok = true;
        transport
    }

    /// Make `lines` readable right away
    pub fn with_pending<I, S>(self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state
            .lock()
            .available
            .extend(lines.into_iter().map(Into::into));
        self
    }

    /// Queue a reply batch released by the next flush
    pub fn reply<I, S>(self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state
            .lock()
            .replies
            .push_back(lines.into_iter().map(Into::into).collect());
        self
    }

    /// Queue `count` single-line `ok` replies
    pub fn reply_ok(self, count: usize) -> Self {
        (0..count).fold(self, |t, _| t.reply(["ok"]))
    }

    /// Every byte written and flushed so far
    pub fn written(&self) -> Vec<u8> {
        self.state.lock().written.clone()
    }

    /// Flushed output as text lines, terminators removed
    ///
    /// A soft-reset byte is reported as its own `"\u{18}"` entry.
    pub fn sent_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();
        for byte in self.written() {
            match byte {
                0x18 => lines.push("\u{18}".to_string()),
                b'\r' => {}
                b'\n' => lines.push(std::mem::take(&mut current)),
                b => current.push(b as char),
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    /// Sent lines without the soft-reset marker
    pub fn sent_commands(&self) -> Vec<String> {
        self.sent_lines()
            .into_iter()
            .filter(|l| l != "\u{18}")
            .collect()
    }

    /// Number of flush calls
    pub fn flush_count(&self) -> usize {
        self.state.lock().flushes
    }

    /// Lines readable but not consumed yet
    pub fn unread(&self) -> Vec<String> {
        self.state.lock().available.iter().cloned().collect()
    }
}

impl LineTransport for ScriptedTransport {
    fn read_line(&mut self, timeout: Duration) -> Result<String> {
        self.state.lock().available.pop_front().ok_or_else(|| {
            ConnectionError::Timeout {
                timeout_ms: timeout.as_millis() as u64,
            }
            .into()
        })
    }

    fn has_buffered_input(&mut self) -> Result<bool> {
        Ok(!self.state.lock().available.is_empty())
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.state.lock().pending.push(byte);
        Ok(())
    }

    fn write_str(&mut self, text: &str) -> Result<()> {
        self.state.lock().pending.extend_from_slice(text.as_bytes());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        let mut state = self.state.lock();
        state.flushes += 1;
        if state.pending.is_empty() {
            return Ok(());
        }
        let pending = std::mem::take(&mut state.pending);
        let is_line = pending.last() == Some(&b'\n');
        state.written.extend(pending);

        if let Some(batch) = state.replies.pop_front() {
            state.available.extend(batch);
        } else if state.auto_ok && is_line {
            state.available.push_back("ok".to_string());
        }
        Ok(())
    }
}
