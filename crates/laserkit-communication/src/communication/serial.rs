//! Serial port communication implementation
//!
//! Provides the [`LineTransport`] used for direct hardware connection to
//! laser controllers via USB or RS-232.
//!
//! Supports:
//! - Port enumeration and discovery
//! - Automatic port selection
//! - Blocking line reads bounded by a timeout

use super::LineTransport;
use laserkit_core::{ConnectionError, Error, Result};
use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

/// Port name that selects the first matching controller port
pub const AUTO_PORT: &str = "auto";

/// A serial port that looks like a laser controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialPortInfo {
    /// Device name, e.g. `/dev/ttyUSB0` or `COM3`
    pub port_name: String,
    /// Human-readable description
    pub description: String,
    /// USB manufacturer string
    pub manufacturer: Option<String>,
    /// USB serial number
    pub serial_number: Option<String>,
    /// USB vendor id
    pub vid: Option<u16>,
    /// USB product id
    pub pid: Option<u16>,
}

impl From<&serialport::SerialPortInfo> for SerialPortInfo {
    fn from(port: &serialport::SerialPortInfo) -> Self {
        let usb = match &port.port_type {
            serialport::SerialPortType::UsbPort(usb) => Some(usb),
            _ => None,
        };
        Self {
            port_name: port.port_name.clone(),
            description: get_port_description(port),
            manufacturer: usb.and_then(|u| u.manufacturer.clone()),
            serial_number: usb.and_then(|u| u.serial_number.clone()),
            vid: usb.map(|u| u.vid),
            pid: usb.map(|u| u.pid),
        }
    }
}

/// List serial ports matching controller naming patterns
///
/// - Windows: `COM<n>`
/// - Linux: `/dev/ttyUSB*`, `/dev/ttyACM*`
/// - macOS: `/dev/cu.usbserial-*`, `/dev/cu.usbmodem*`
pub fn list_ports() -> Result<Vec<SerialPortInfo>> {
    let ports = serialport::available_ports().map_err(|e| {
        tracing::error!("Failed to enumerate serial ports: {}", e);
        ConnectionError::SerialError {
            reason: format!("Failed to enumerate ports: {}", e),
        }
    })?;

    Ok(ports
        .iter()
        .filter(|port| is_valid_cnc_port(&port.port_name))
        .map(SerialPortInfo::from)
        .collect())
}

/// Check if a port name matches controller patterns
fn is_valid_cnc_port(port_name: &str) -> bool {
    if let Some(number) = port_name.strip_prefix("COM") {
        return !number.is_empty() && number.chars().all(|c| c.is_ascii_digit());
    }

    port_name.starts_with("/dev/ttyUSB")
        || port_name.starts_with("/dev/ttyACM")
        || port_name.starts_with("/dev/cu.usbserial-")
        || port_name.starts_with("/dev/cu.usbmodem")
}

/// Get a user-friendly description for a port
fn get_port_description(port: &serialport::SerialPortInfo) -> String {
    match &port.port_type {
        serialport::SerialPortType::UsbPort(usb_info) => {
            format!(
                "USB {} {}",
                usb_info.manufacturer.as_deref().unwrap_or("Device"),
                usb_info.product.as_deref().unwrap_or("Serial Port")
            )
        }
        serialport::SerialPortType::BluetoothPort => "Bluetooth Serial".to_string(),
        serialport::SerialPortType::PciPort => "PCI Serial".to_string(),
        _ => "Serial Port".to_string(),
    }
}

/// Serial transport backed by the `serialport` crate
pub struct SerialTransport {
    port: Box<dyn serialport::SerialPort>,
    name: String,
    buffer: Vec<u8>,
}

impl SerialTransport {
    /// Open `port_name` at `baud_rate`; `"auto"` picks the first controller port
    pub fn open(port_name: &str, baud_rate: u32) -> Result<Self> {
        let name = if port_name.eq_ignore_ascii_case(AUTO_PORT) {
            list_ports()?
                .into_iter()
                .next()
                .map(|info| info.port_name)
                .ok_or_else(|| ConnectionError::FailedToOpen {
                    port: port_name.to_string(),
                    reason: "no serial port found".to_string(),
                })?
        } else {
            port_name.to_string()
        };

        let port = serialport::new(&name, baud_rate)
            .timeout(Duration::from_millis(10))
            .open()
            .map_err(|e| {
                tracing::warn!("Failed to open serial port {}: {}", name, e);
                ConnectionError::FailedToOpen {
                    port: name.clone(),
                    reason: e.to_string(),
                }
            })?;

        tracing::info!("Opened serial port {} at {} baud", name, baud_rate);
        Ok(Self {
            port,
            name,
            buffer: Vec::new(),
        })
    }

    /// Resolved port name
    pub fn name(&self) -> &str {
        &self.name
    }

    fn take_line(&mut self) -> Option<String> {
        let pos = self.buffer.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.buffer.drain(..=pos).collect();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }
}

/// A partial line does not count as readable input
fn holds_complete_line(buffer: &[u8]) -> bool {
    buffer.contains(&b'\n')
}

impl LineTransport for SerialTransport {
    fn read_line(&mut self, timeout: Duration) -> Result<String> {
        let deadline = Instant::now() + timeout;
        let mut chunk = [0u8; 256];
        loop {
            if let Some(line) = self.take_line() {
                return Ok(line);
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(ConnectionError::Timeout {
                    timeout_ms: timeout.as_millis() as u64,
                }
                .into());
            }
            self.port
                .set_timeout(remaining)
                .map_err(|e| ConnectionError::SerialError {
                    reason: e.to_string(),
                })?;

            match self.port.read(&mut chunk) {
                Ok(0) => {
                    return Err(ConnectionError::ConnectionLost {
                        reason: format!("{} closed", self.name),
                    }
                    .into())
                }
                Ok(n) => self.buffer.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::TimedOut => continue,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::Io(e)),
            }
        }
    }

    fn has_buffered_input(&mut self) -> Result<bool> {
        if holds_complete_line(&self.buffer) {
            return Ok(true);
        }
        let pending = self
            .port
            .bytes_to_read()
            .map_err(|e| ConnectionError::SerialError {
                reason: e.to_string(),
            })?;
        Ok(pending > 0)
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.port.write_all(&[byte])?;
        Ok(())
    }

    fn write_str(&mut self, text: &str) -> Result<()> {
        self.port.write_all(text.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.port.flush()?;
        Ok(())
    }
}
