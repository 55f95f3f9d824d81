//! # LaserKit Communication
//!
//! Line transports and GRBL-family firmware drivers for LaserKit.
//! Supports serial/USB controllers, file output and scripted test
//! transports; firmware support covers stock GRBL and the Creality Falcon2.

pub mod communication;
pub mod firmware;

pub use communication::{
    list_ports, LineTransport, ScriptedTransport, SerialPortInfo, SerialTransport,
    WriterTransport,
};

pub use firmware::{
    ControllerModel, DriverAttribute, DriverConfig, FirmwareProfile, GrblDriver, GrblSession,
    HandshakeState, LineEnding,
};
