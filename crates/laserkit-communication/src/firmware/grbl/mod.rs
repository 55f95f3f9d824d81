//! GRBL firmware support
//!
//! One shared state machine, line sender and translator, parameterized by a
//! [`FirmwareProfile`] for the points where GRBL derivatives differ.

pub mod config;
pub mod driver;
pub mod error_decoder;
pub mod handshake;
pub mod job;
pub mod profile;
pub mod response;
pub mod session;
pub mod translator;

pub use config::{DriverConfig, LineEnding};
pub use driver::GrblDriver;
pub use error_decoder::{decode_alarm, decode_error};
pub use handshake::{HandshakeState, HOME_COMMAND, SOFT_RESET};
pub use profile::{FirmwareProfile, LockCheck};
pub use response::{is_lock_notice, GrblResponse, LOCK_NOTICE, OK};
pub use session::{AckMode, GrblSession};
pub use translator::RuntimeCache;
