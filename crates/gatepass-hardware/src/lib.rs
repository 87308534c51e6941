//! Peripheral abstraction layer for the Gatepass attendance terminal.
//!
//! The terminal talks to three pieces of hardware besides its display: an
//! MFRC522-class RFID reader, a piezo buzzer, and a Wi-Fi radio. Each is
//! described by a trait so the attendance controller can run against real
//! drivers on the board and against the mocks in [`mock`] everywhere else.
//!
//! # Design Philosophy
//!
//! - **Async-first**: operations are native `async fn` in traits
//!   (Edition 2024 RPITIT), so the controller awaits them in sequence on a
//!   single task.
//! - **Poll-shaped reader**: the reader mirrors how MFRC522 firmware is
//!   driven: ask whether a new card is present, then read its serial, then
//!   halt it.
//! - **Error-aware**: all fallible operations return [`Result<T>`].
//!
//! # Example
//!
//! ```no_run
//! use gatepass_hardware::traits::RfidReader;
//! use gatepass_hardware::Result;
//!
//! async fn next_badge<R: RfidReader>(reader: &mut R) -> Result<Option<String>> {
//!     if !reader.is_new_card_present().await? {
//!         return Ok(None);
//!     }
//!     let card = reader.read_card_serial().await?;
//!     reader.halt_card().await?;
//!     Ok(Some(card.badge_uid().to_string()))
//! }
//! ```

pub mod error;
pub mod mock;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{HardwareError, Result};
pub use traits::{Buzzer, NetworkLink, RfidReader};
pub use types::{CardData, CardType, MAX_UID_LENGTH, MIN_UID_LENGTH, ReaderInfo};
