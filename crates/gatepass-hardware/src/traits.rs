//! Peripheral trait definitions.
//!
//! These traits are the contract between the attendance controller and the
//! board's peripherals. All use native `async fn` methods (Edition 2024
//! RPITIT), so they are used through generic parameters rather than trait
//! objects.

#![allow(async_fn_in_trait)]

use std::time::Duration;

use crate::error::Result;
use crate::types::{CardData, ReaderInfo};

/// RFID reader abstraction.
///
/// Shaped after the MFRC522 request/select/halt cycle. A scan only counts
/// when [`is_new_card_present`](RfidReader::is_new_card_present) returns
/// `true` *and* the following
/// [`read_card_serial`](RfidReader::read_card_serial) succeeds.
///
/// # Examples
///
/// ```no_run
/// use gatepass_hardware::traits::RfidReader;
/// use gatepass_hardware::Result;
///
/// async fn poll_once<R: RfidReader>(reader: &mut R) -> Result<bool> {
///     if reader.is_new_card_present().await? {
///         let card = reader.read_card_serial().await?;
///         println!("{}", card.badge_uid());
///         reader.halt_card().await?;
///         return Ok(true);
///     }
///     Ok(false)
/// }
/// ```
pub trait RfidReader: Send + Sync {
    /// Check whether a card that has not been read yet entered the field.
    ///
    /// Returns immediately; never waits for a card.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader cannot be reached.
    async fn is_new_card_present(&mut self) -> Result<bool>;

    /// Select the present card and read its UID.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No card is present
    /// - Anticollision or CRC checks fail
    /// - The device is disconnected
    async fn read_card_serial(&mut self) -> Result<CardData>;

    /// Put the selected card to sleep so the reader accepts a new one.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader cannot be reached.
    async fn halt_card(&mut self) -> Result<()>;

    /// Get reader information.
    ///
    /// # Errors
    ///
    /// Returns an error if a communication error occurs while querying
    /// reader information.
    async fn get_reader_info(&self) -> Result<ReaderInfo>;
}

/// Piezo buzzer abstraction.
///
/// `tone` starts a square wave and returns; it does not wait for the tone to
/// finish. Sequencing and gaps are the caller's job.
pub trait Buzzer: Send + Sync {
    /// Emit `frequency_hz` for `duration`.
    ///
    /// # Errors
    ///
    /// Returns an error if the PWM channel is unavailable.
    async fn tone(&mut self, frequency_hz: u32, duration: Duration) -> Result<()>;
}

/// Station-mode network link (Wi-Fi).
pub trait NetworkLink: Send + Sync {
    /// Start associating with `ssid`. Returns once the attempt has started;
    /// use [`is_connected`](NetworkLink::is_connected) to follow progress.
    ///
    /// # Errors
    ///
    /// Returns an error if the radio refuses to start.
    async fn begin(&mut self, ssid: &str) -> Result<()>;

    /// Whether the link currently has an address.
    async fn is_connected(&self) -> bool;

    /// Local address, for operator diagnostics.
    async fn local_address(&self) -> Option<String>;
}
