//! Mock peripheral implementations for testing and development.
//!
//! Each mock comes paired with a cloneable handle that drives or inspects it
//! from outside the controller that owns the device.

pub mod buzzer;
pub mod link;
pub mod rfid;

// Re-export commonly used types
pub use buzzer::{MockBuzzer, MockBuzzerHandle, PlayedTone};
pub use link::{MockLink, MockLinkHandle};
pub use rfid::{MockRfid, MockRfidHandle};
