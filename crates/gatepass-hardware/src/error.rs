//! Error types for peripheral operations.
//!
//! None of these are fatal to the terminal: the controller logs them and
//! carries on with the next cycle.

pub type Result<T> = std::result::Result<T, HardwareError>;

/// Failure reported by a reader, buzzer or radio.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// The peripheral stopped answering (SPI bus, event channel).
    #[error("Peripheral disconnected: {device}")]
    Disconnected { device: String },

    /// A write to the peripheral failed.
    #[error("Peripheral I/O failed: {message}")]
    CommunicationError { message: String },

    /// The peripheral answered with something out of range.
    #[error("Bad peripheral data: {message}")]
    InvalidData { message: String },

    /// Card serial could not be read (collision, CRC, card pulled away).
    #[error("Card read failed: {message}")]
    CardReadError { message: String },

    /// A serial read was requested while no card was in the field.
    #[error("No card in field")]
    NoCard,

    #[error("{0}")]
    Other(String),
}

impl HardwareError {
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    pub fn communication(message: impl Into<String>) -> Self {
        Self::CommunicationError {
            message: message.into(),
        }
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    pub fn card_read(message: impl Into<String>) -> Self {
        Self::CardReadError {
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}
