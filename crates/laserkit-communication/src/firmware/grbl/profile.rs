//! Firmware profiles
//!
//! A profile captures the few points where the GRBL dialects diverge; the
//! handshake, sender and translator are shared and read these values.

use super::config::DriverConfig;
use crate::firmware::settings::{derive_attributes, DriverAttribute, GENERIC_ATTRIBUTES};
use crate::firmware::ControllerModel;
use laserkit_core::{ConfigError, PropertyKind};

/// When the handshake looks for the alarm-lock notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockCheck {
    /// Only if more input is already buffered after the banner
    WhenBuffered,
    /// Wait for a line after the banner; silence means unlocked, and
    /// auto-home homes either way
    Always,
}

const GRBL_REMOVED: &[DriverAttribute] = &[
    DriverAttribute::IdentificationLine,
    DriverAttribute::WaitForOk,
    DriverAttribute::TravelSpeed,
    DriverAttribute::LineEnding,
];

const GRBL_ADDED: &[DriverAttribute] = &[DriverAttribute::AutoHome];

const FALCON2_ADDED: &[DriverAttribute] = &[DriverAttribute::SupportsVentilation];

/// Behavioral profile of a firmware dialect
#[derive(Debug, Clone, PartialEq)]
pub struct FirmwareProfile {
    model: ControllerModel,
    identity_attempts: u8,
    lock_check: LockCheck,
    property_kind: PropertyKind,
    attributes: Vec<DriverAttribute>,
}

impl FirmwareProfile {
    /// Profile for `model`
    pub fn for_model(model: ControllerModel) -> Result<Self, ConfigError> {
        match model {
            ControllerModel::Grbl => Self::grbl(),
            ControllerModel::Falcon2 => Self::falcon2(),
        }
    }

    /// Stock GRBL: one banner read, lock check only on buffered input
    pub fn grbl() -> Result<Self, ConfigError> {
        let model = ControllerModel::Grbl;
        Ok(Self {
            model,
            identity_attempts: 1,
            lock_check: LockCheck::WhenBuffered,
            property_kind: PropertyKind::PowerSpeed,
            attributes: derive_attributes(
                model.model_name(),
                GENERIC_ATTRIBUTES,
                GRBL_REMOVED,
                GRBL_ADDED,
            )?,
        })
    }

    /// Falcon2: GRBL with a four-line banner scan, an unconditional lock
    /// check and the ventilation capability
    pub fn falcon2() -> Result<Self, ConfigError> {
        let parent = Self::grbl()?;
        let model = ControllerModel::Falcon2;
        Ok(Self {
            model,
            identity_attempts: 4,
            lock_check: LockCheck::Always,
            property_kind: PropertyKind::LaosCutter,
            attributes: derive_attributes(model.model_name(), &parent.attributes, &[], FALCON2_ADDED)?,
        })
    }

    /// Controller model
    pub fn model(&self) -> ControllerModel {
        self.model
    }

    /// How many lines the banner scan reads before giving up
    pub fn identity_attempts(&self) -> u8 {
        self.identity_attempts
    }

    /// Lock check policy
    pub fn lock_check(&self) -> LockCheck {
        self.lock_check
    }

    /// Property kind the translator accepts
    pub fn property_kind(&self) -> PropertyKind {
        self.property_kind
    }

    /// Attributes exposed through the named-attribute interface
    pub fn attributes(&self) -> &[DriverAttribute] {
        &self.attributes
    }

    /// Whether `attribute` is user-configurable on this model
    pub fn exposes(&self, attribute: DriverAttribute) -> bool {
        self.attributes.contains(&attribute)
    }

    /// Firmware defaults for a fresh driver
    pub fn default_config(&self) -> DriverConfig {
        match self.model {
            ControllerModel::Grbl => DriverConfig::grbl(),
            ControllerModel::Falcon2 => DriverConfig::falcon2(),
        }
    }
}
