//! Drawing command translation
//!
//! Turns rapid moves, cut moves and property changes into G-code lines,
//! keeping a cache of what the controller was last told so that feed,
//! power and ventilation are only sent when they change.

use super::session::GrblSession;
use crate::communication::LineTransport;
use laserkit_core::units::{format_coordinate, to_machine_axis};
use laserkit_core::{JobError, LaserProperty, Result, VectorCommand};

/// Machine state the controller was last told about
///
/// `None` means unknown: the next cut move re-sends the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuntimeCache {
    /// Feed rate of the current property in mm/min
    pub next_feed: Option<f64>,
    /// S value of the current property
    pub next_power: Option<f64>,
    /// Feed rate last sent on a G1
    pub feed: Option<f64>,
    /// S value last sent
    pub power: Option<f64>,
    /// Ventilation state last sent
    pub ventilation: Option<bool>,
}

impl<T: LineTransport> GrblSession<'_, T> {
    /// Emit a command sequence at `resolution` DPI
    pub fn emit(&mut self, commands: &[VectorCommand], resolution: f64) -> Result<()> {
        for command in commands {
            match command {
                VectorCommand::MoveTo { x, y } => self.rapid_move(*x, *y, resolution)?,
                VectorCommand::LineTo { x, y } => self.cut_move(*x, *y, resolution)?,
                VectorCommand::SetProperty(property) => self.set_property(property)?,
            }
        }
        Ok(())
    }

    /// Pixel coordinates to machine millimeters, honoring axis flips
    pub fn machine_position(&self, x: f64, y: f64, resolution: f64) -> (f64, f64) {
        let config = self.driver.config();
        (
            to_machine_axis(x, resolution, config.bed_width, config.flip_x),
            to_machine_axis(y, resolution, config.bed_height, config.flip_y),
        )
    }

    /// Rapid move at the controller's seek rate
    fn rapid_move(&mut self, x: f64, y: f64, resolution: f64) -> Result<()> {
        let (x, y) = self.machine_position(x, y, resolution);
        let config = self.driver.config();
        // the next G1 states its feed again
        self.cache.feed = None;

        let line = if config.blank_laser_during_rapids {
            // force a new S value on the next G1
            self.cache.power = None;
            format!("G0 X{} Y{} S0", format_coordinate(x), format_coordinate(y))
        } else {
            format!("G0 X{} Y{}", format_coordinate(x), format_coordinate(y))
        };
        self.send_line(&line)
    }

    fn cut_move(&mut self, x: f64, y: f64, resolution: f64) -> Result<()> {
        let (x, y) = self.machine_position(x, y, resolution);
        let mut line = format!("G1 X{} Y{}", format_coordinate(x), format_coordinate(y));

        if let Some(power) = self.cache.next_power {
            if self.cache.power != Some(power) {
                line.push_str(&format!(" S{:.6}", power));
                self.cache.power = Some(power);
            }
        }
        if let Some(feed) = self.cache.next_feed {
            if self.cache.feed != Some(feed) {
                line.push_str(&format!(" F{}", feed as i64));
                self.cache.feed = Some(feed);
            }
        }
        self.send_line(&line)
    }

    fn set_property(&mut self, property: &LaserProperty) -> Result<()> {
        let expected = self.driver.profile().property_kind();
        if property.kind() != expected {
            return Err(JobError::ContractViolation {
                expected: expected.name(),
                received: property.kind().name(),
            }
            .into());
        }

        let config = self.driver.config();
        if config.supports_ventilation {
            if let Some(ventilation) = property.ventilation() {
                self.set_ventilation(ventilation)?;
            }
        }

        let config = self.driver.config();
        self.cache.next_feed = Some(config.max_speed * property.speed() / 100.0);
        self.cache.next_power = Some(config.spindle_max * property.power() / 100.0);
        Ok(())
    }

    fn set_ventilation(&mut self, enabled: bool) -> Result<()> {
        if self.cache.ventilation == Some(enabled) {
            return Ok(());
        }
        // M8 enables, M9 disables
        self.send_line(if enabled { "M8" } else { "M9" })?;
        tracing::debug!(
            "Ventilation {:?} -> {}",
            self.cache.ventilation,
            if enabled { "on" } else { "off" }
        );
        self.cache.ventilation = Some(enabled);
        Ok(())
    }
}
