//! Data models
//!
//! Jobs, laser properties and attribute values shared by every crate.

pub mod job;
pub mod property;
pub mod value;

pub use job::{LaserJob, VectorCommand, VectorPart};
pub use property::{LaosCutterProperty, LaserProperty, PowerSpeedFocusFrequencyProperty, PropertyKind};
pub use value::{AttributeValue, ValueType};
