//! GRBL driver
//!
//! The driver owns a firmware profile and its configuration. It holds no
//! connection: `open` binds it to a transport and returns a session, so a
//! clone of a driver is a deep copy of settings only.

use super::config::DriverConfig;
use super::profile::FirmwareProfile;
use super::session::GrblSession;
use crate::communication::LineTransport;
use crate::firmware::settings::{DriverAttribute, FirmwareSetting};
use crate::firmware::ControllerModel;
use laserkit_core::{
    AttributeValue, ConfigError, LaosCutterProperty, LaserProperty,
    PowerSpeedFocusFrequencyProperty, PropertyKind,
};

/// Driver for a GRBL-family laser controller
#[derive(Debug, Clone, PartialEq)]
pub struct GrblDriver {
    profile: FirmwareProfile,
    config: DriverConfig,
}

impl GrblDriver {
    /// Driver for `model` with firmware defaults
    pub fn new(model: ControllerModel) -> Result<Self, ConfigError> {
        let profile = FirmwareProfile::for_model(model)?;
        let config = profile.default_config();
        Ok(Self { profile, config })
    }

    /// Driver for `model` with an explicit configuration
    ///
    /// The only way to set fields the model does not expose as attributes.
    pub fn with_config(model: ControllerModel, config: DriverConfig) -> Result<Self, ConfigError> {
        let profile = FirmwareProfile::for_model(model)?;
        Ok(Self { profile, config })
    }

    /// Stock GRBL driver
    pub fn grbl() -> Result<Self, ConfigError> {
        Self::new(ControllerModel::Grbl)
    }

    /// Creality Falcon2 driver
    pub fn falcon2() -> Result<Self, ConfigError> {
        Self::new(ControllerModel::Falcon2)
    }

    pub fn model(&self) -> ControllerModel {
        self.profile.model()
    }

    /// Model name, used as the progress source
    pub fn model_name(&self) -> &'static str {
        self.profile.model().model_name()
    }

    pub fn profile(&self) -> &FirmwareProfile {
        &self.profile
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Names of the user-configurable attributes
    pub fn attribute_names(&self) -> Vec<&'static str> {
        self.profile.attributes().iter().map(|a| a.name()).collect()
    }

    fn exposed(&self, name: &str) -> Result<DriverAttribute, ConfigError> {
        let attribute: DriverAttribute = name.parse()?;
        if !self.profile.exposes(attribute) {
            return Err(ConfigError::AttributeNotExposed {
                name: name.to_string(),
                model: self.model_name().to_string(),
            });
        }
        Ok(attribute)
    }

    /// Current value of a named attribute
    pub fn get_attribute(&self, name: &str) -> Result<AttributeValue, ConfigError> {
        let attribute = self.exposed(name)?;
        Ok(self.config.get(attribute))
    }

    /// Set a named attribute
    ///
    /// Unknown names, names this model does not expose and values of the
    /// wrong type are rejected and leave the configuration untouched.
    pub fn set_attribute(
        &mut self,
        name: &str,
        value: impl Into<AttributeValue>,
    ) -> Result<(), ConfigError> {
        let attribute = self.exposed(name)?;
        let value = value.into();
        tracing::debug!("{}: {} = {}", self.model_name(), name, value);
        self.config.set(attribute, value)
    }

    /// Exposed attributes with their current values
    pub fn settings(&self) -> Vec<FirmwareSetting> {
        self.profile
            .attributes()
            .iter()
            .map(|attribute| FirmwareSetting {
                id: attribute.name().to_string(),
                value: self.config.get(*attribute).to_string(),
                setting_type: attribute.value_type(),
            })
            .collect()
    }

    /// Default property for vector parts on this model
    pub fn default_vector_property(&self) -> LaserProperty {
        match self.profile.property_kind() {
            PropertyKind::PowerSpeed => PowerSpeedFocusFrequencyProperty::default().into(),
            PropertyKind::LaosCutter => LaosCutterProperty {
                ventilation: self.config.supports_ventilation,
                ..LaosCutterProperty::default()
            }
            .into(),
        }
    }

    /// Bind the driver to a transport
    ///
    /// The session starts in `Idle` with an empty cache; call
    /// [`GrblSession::connect`] before sending motion.
    pub fn open<T: LineTransport>(&self, transport: T) -> GrblSession<'_, T> {
        GrblSession::new(self, transport, self.config.wait_for_ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_attribute() {
        let mut driver = GrblDriver::grbl().unwrap();
        let err = driver.set_attribute("Laser wattage", 40.0).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownAttribute { .. }));
    }

    #[test]
    fn test_hidden_attribute_is_not_settable() {
        let mut driver = GrblDriver::grbl().unwrap();
        let err = driver
            .set_attribute("Wait for OK after each line (interactive mode)", false)
            .unwrap_err();
        assert!(matches!(err, ConfigError::AttributeNotExposed { .. }));
        assert!(driver.config().wait_for_ok);
    }

    #[test]
    fn test_hidden_fields_come_from_explicit_config() {
        let mut config = DriverConfig::grbl();
        config.wait_for_ok = false;
        let driver = GrblDriver::with_config(ControllerModel::Grbl, config).unwrap();

        assert!(!driver.config().wait_for_ok);
        assert!(driver
            .get_attribute("Wait for OK after each line (interactive mode)")
            .is_err());
    }

    #[test]
    fn test_default_vector_property_follows_profile() {
        let grbl = GrblDriver::grbl().unwrap();
        assert_eq!(grbl.default_vector_property().kind(), PropertyKind::PowerSpeed);

        let mut falcon = GrblDriver::falcon2().unwrap();
        assert_eq!(falcon.default_vector_property().ventilation(), Some(true));
        falcon.set_attribute("Supports ventilation", false).unwrap();
        assert_eq!(falcon.default_vector_property().ventilation(), Some(false));
    }

    #[test]
    fn test_settings_lists_exposed_attributes() {
        let driver = GrblDriver::falcon2().unwrap();
        let settings = driver.settings();
        assert_eq!(settings.len(), driver.profile().attributes().len());
        let bed = settings.iter().find(|s| s.id == "Laserbed width");
        assert_eq!(bed.map(|s| s.value.as_str()), Some("400"));
    }
}
