//! Driver configuration
//!
//! Typed configuration owned by a driver. Firmware defaults are built by
//! composition: the GRBL defaults start from the generic line-protocol
//! defaults, the Falcon2 defaults from the GRBL ones.

use crate::firmware::settings::DriverAttribute;
use laserkit_core::{AttributeValue, ConfigError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Line terminator appended to every command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LineEnding {
    /// `\n`
    Lf,
    /// `\r`
    Cr,
    /// `\r\n`
    CrLf,
}

impl LineEnding {
    /// Terminator bytes as text
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Cr => "\r",
            Self::CrLf => "\r\n",
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lf => write!(f, "LF"),
            Self::Cr => write!(f, "CR"),
            Self::CrLf => write!(f, "CRLF"),
        }
    }
}

impl FromStr for LineEnding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LF" => Ok(Self::Lf),
            "CR" => Ok(Self::Cr),
            "CRLF" => Ok(Self::CrLf),
            other => Err(format!("unknown line ending '{}'", other)),
        }
    }
}

/// Configuration of one driver instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Serial device, `auto` for the first controller port
    pub com_port: String,
    /// Serial baud rate
    pub baud_rate: u32,
    /// Line terminator
    pub line_ending: LineEnding,
    /// Substring expected in the banner, empty to skip the check
    pub identification_line: String,
    /// Block for `ok` after every line
    pub wait_for_ok: bool,
    /// Comma-separated commands sent before a job
    pub pre_job_gcode: String,
    /// Comma-separated commands sent after a job
    pub post_job_gcode: String,
    /// S value for 100% power
    pub spindle_max: f64,
    /// Send `S0` with every rapid move
    pub blank_laser_during_rapids: bool,
    /// Read timeout in milliseconds
    pub serial_timeout_ms: u64,
    /// Bed width in mm
    pub bed_width: f64,
    /// Bed height in mm
    pub bed_height: f64,
    /// Cut speed at 100% in mm/min
    pub max_speed: f64,
    /// Rapid speed in mm/min
    pub travel_speed: f64,
    /// Mirror X against the bed width
    pub flip_x: bool,
    /// Mirror Y against the bed height
    pub flip_y: bool,
    /// Home automatically when the controller is locked
    pub auto_home: bool,
    /// Air assist actuator present
    pub supports_ventilation: bool,
}

impl DriverConfig {
    /// Defaults of the generic line-protocol driver
    pub fn generic() -> Self {
        Self {
            com_port: "auto".to_string(),
            baud_rate: 115200,
            line_ending: LineEnding::Lf,
            identification_line: String::new(),
            wait_for_ok: true,
            pre_job_gcode: "G21,G90".to_string(),
            post_job_gcode: "G0 X0 Y0".to_string(),
            spindle_max: 1.0,
            blank_laser_during_rapids: false,
            serial_timeout_ms: 15000,
            bed_width: 250.0,
            bed_height: 280.0,
            max_speed: 3000.0,
            travel_speed: 3000.0,
            flip_x: false,
            flip_y: false,
            auto_home: false,
            supports_ventilation: false,
        }
    }

    /// Stock GRBL defaults
    pub fn grbl() -> Self {
        let mut config = Self::generic();
        // Grbl accepts CR, CRLF and LF; FluidNC only CRLF and LF
        config.line_ending = LineEnding::CrLf;
        config.identification_line = "Grbl".to_string();
        config.wait_for_ok = true;
        config.append_pre_job("M3");
        // laser off before returning home
        config.prepend_post_job("M5");
        config.spindle_max = 1000.0;
        // Grbl does not switch the laser off during G0 on its own
        config.blank_laser_during_rapids = true;
        config.serial_timeout_ms = 30000;
        config.auto_home = true;
        config
    }

    /// Creality Falcon2 defaults
    pub fn falcon2() -> Self {
        let mut config = Self::grbl();
        // air assist off
        config.prepend_post_job("M9");
        config.serial_timeout_ms = 10000;
        config.bed_width = 400.0;
        config.bed_height = 415.0;
        config.max_speed = 6000.0;
        config.travel_speed = 6000.0;
        config.flip_y = true;
        config.supports_ventilation = true;
        config
    }

    /// Append a command to the pre-job list
    pub fn append_pre_job(&mut self, command: &str) {
        self.pre_job_gcode = join_commands(&self.pre_job_gcode, command);
    }

    /// Put a command in front of the post-job list
    pub fn prepend_post_job(&mut self, command: &str) {
        self.post_job_gcode = join_commands(command, &self.post_job_gcode);
    }

    /// Pre-job commands in order
    pub fn pre_job_commands(&self) -> Vec<&str> {
        split_commands(&self.pre_job_gcode)
    }

    /// Post-job commands in order
    pub fn post_job_commands(&self) -> Vec<&str> {
        split_commands(&self.post_job_gcode)
    }

    /// Read timeout
    pub fn serial_timeout(&self) -> Duration {
        Duration::from_millis(self.serial_timeout_ms)
    }

    /// Current value of an attribute
    pub fn get(&self, attribute: DriverAttribute) -> AttributeValue {
        use DriverAttribute as A;
        match attribute {
            A::ComPort => self.com_port.clone().into(),
            A::BaudRate => f64::from(self.baud_rate).into(),
            A::IdentificationLine => self.identification_line.clone().into(),
            A::WaitForOk => self.wait_for_ok.into(),
            A::LineEnding => self.line_ending.to_string().into(),
            A::BedWidth => self.bed_width.into(),
            A::BedHeight => self.bed_height.into(),
            A::FlipX => self.flip_x.into(),
            A::FlipY => self.flip_y.into(),
            A::TravelSpeed => self.travel_speed.into(),
            A::MaxSpeed => self.max_speed.into(),
            A::PreJobGcode => self.pre_job_gcode.clone().into(),
            A::PostJobGcode => self.post_job_gcode.clone().into(),
            A::SerialTimeout => (self.serial_timeout_ms as f64).into(),
            A::SpindleMax => self.spindle_max.into(),
            A::BlankLaserDuringRapids => self.blank_laser_during_rapids.into(),
            A::AutoHome => self.auto_home.into(),
            A::SupportsVentilation => self.supports_ventilation.into(),
        }
    }

    /// Set an attribute, checking the value type
    pub fn set(&mut self, attribute: DriverAttribute, value: AttributeValue) -> Result<(), ConfigError> {
        use DriverAttribute as A;
        let name = attribute.name();
        let mismatch = || ConfigError::TypeMismatch {
            name: name.to_string(),
            expected: attribute.value_type().name(),
        };
        let invalid = |reason: &str| ConfigError::InvalidValue {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        match attribute {
            A::ComPort | A::IdentificationLine | A::PreJobGcode | A::PostJobGcode | A::LineEnding => {
                let text = value.as_str().ok_or_else(mismatch)?.to_string();
                match attribute {
                    A::ComPort => self.com_port = text,
                    A::IdentificationLine => self.identification_line = text,
                    A::PreJobGcode => self.pre_job_gcode = text,
                    A::PostJobGcode => self.post_job_gcode = text,
                    _ => self.line_ending = text.parse().map_err(|e: String| invalid(&e))?,
                }
            }
            A::WaitForOk
            | A::FlipX
            | A::FlipY
            | A::BlankLaserDuringRapids
            | A::AutoHome
            | A::SupportsVentilation => {
                let flag = value.as_bool().ok_or_else(mismatch)?;
                match attribute {
                    A::WaitForOk => self.wait_for_ok = flag,
                    A::FlipX => self.flip_x = flag,
                    A::FlipY => self.flip_y = flag,
                    A::BlankLaserDuringRapids => self.blank_laser_during_rapids = flag,
                    A::AutoHome => self.auto_home = flag,
                    _ => self.supports_ventilation = flag,
                }
            }
            A::BaudRate | A::SerialTimeout => {
                let number = value.as_f64().ok_or_else(mismatch)?;
                if !number.is_finite() || number <= 0.0 || number.fract() != 0.0 {
                    return Err(invalid("must be a positive integer"));
                }
                if attribute == A::BaudRate {
                    self.baud_rate = u32::try_from(number as u64)
                        .map_err(|_| invalid("out of range"))?;
                } else {
                    self.serial_timeout_ms = number as u64;
                }
            }
            A::BedWidth | A::BedHeight | A::TravelSpeed | A::MaxSpeed | A::SpindleMax => {
                let number = value.as_f64().ok_or_else(mismatch)?;
                if !number.is_finite() || number <= 0.0 {
                    return Err(invalid("must be greater than zero"));
                }
                match attribute {
                    A::BedWidth => self.bed_width = number,
                    A::BedHeight => self.bed_height = number,
                    A::TravelSpeed => self.travel_speed = number,
                    A::MaxSpeed => self.max_speed = number,
                    _ => self.spindle_max = number,
                }
            }
        }
        Ok(())
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::grbl()
    }
}

fn join_commands(first: &str, second: &str) -> String {
    match (first.is_empty(), second.is_empty()) {
        (true, _) => second.to_string(),
        (_, true) => first.to_string(),
        _ => format!("{},{}", first, second),
    }
}

fn split_commands(list: &str) -> Vec<&str> {
    list.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect()
}
