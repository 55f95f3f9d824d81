//! GRBL response classification

use super::error_decoder::{decode_alarm, decode_error};

/// Acknowledgment text
pub const OK: &str = "ok";

/// Fragment of the message GRBL prints when it boots into an alarm lock
pub const LOCK_NOTICE: &str = "'$H'|'$X' to unlock]";

/// A line received from the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrblResponse {
    /// `ok`
    Ok,
    /// `error:N`
    Error(u8),
    /// `ALARM:N`
    Alarm(u8),
    /// Alarm-lock notice after reset
    LockNotice,
    /// Anything else (banner, feedback messages)
    Message(String),
}

impl GrblResponse {
    /// Classify a received line
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed == OK {
            return Self::Ok;
        }
        if trimmed.contains(LOCK_NOTICE) {
            return Self::LockNotice;
        }
        if let Some(code) = trimmed.strip_prefix("error:").and_then(|c| c.trim().parse().ok()) {
            return Self::Error(code);
        }
        let alarm = trimmed
            .strip_prefix("ALARM:")
            .or_else(|| trimmed.strip_prefix("alarm:"));
        if let Some(code) = alarm.and_then(|c| c.trim().parse().ok()) {
            return Self::Alarm(code);
        }
        Self::Message(trimmed.to_string())
    }

    /// Human-readable explanation for error and alarm codes
    pub fn describe(&self) -> Option<String> {
        match self {
            Self::Error(code) => Some(decode_error(*code)),
            Self::Alarm(code) => Some(decode_alarm(*code)),
            _ => None,
        }
    }
}

/// Whether `line` is the alarm-lock notice
pub fn is_lock_notice(line: &str) -> bool {
    line.contains(LOCK_NOTICE)
}
