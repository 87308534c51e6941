//! Data types shared by the peripheral traits.

use gatepass_core::BadgeUid;
use serde::{Deserialize, Serialize};

use crate::{HardwareError, Result};

/// Shortest UID a reader hands out, in bytes.
///
/// Real ISO 14443 cards use 4, 7 or 10 bytes; shorter identifiers show up
/// from emulated tags and bench fixtures, so only the empty UID is refused.
pub const MIN_UID_LENGTH: usize = 1;

/// Longest UID the MFRC522 reports (triple-size UID), in bytes.
pub const MAX_UID_LENGTH: usize = 10;

/// Card family, as reported by the SAK byte during selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CardType {
    /// Mifare Classic 1K (1024 bytes).
    MifareClassic1K,

    /// Mifare Classic 4K (4096 bytes).
    MifareClassic4K,

    /// Mifare Ultralight / NTAG.
    MifareUltralight,

    /// Anything else, with its raw SAK byte.
    Unknown(u8),
}

impl CardType {
    /// Get a human-readable name for the card type.
    pub fn name(&self) -> &str {
        match self {
            Self::MifareClassic1K => "Mifare Classic 1K",
            Self::MifareClassic4K => "Mifare Classic 4K",
            Self::MifareUltralight => "Mifare Ultralight",
            Self::Unknown(_) => "Unknown",
        }
    }
}

/// A card whose serial was read successfully.
#[derive(Debug, Clone)]
pub struct CardData {
    /// Raw card identifier bytes.
    pub uid: Vec<u8>,

    /// Card type identification.
    pub card_type: CardType,

    /// When the serial was read.
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl CardData {
    /// Create card data stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if the UID is empty or longer than
    /// [`MAX_UID_LENGTH`].
    ///
    /// # Examples
    ///
    /// ```
    /// use gatepass_hardware::{CardData, CardType};
    ///
    /// let card = CardData::new(vec![0x0A, 0xFF], CardType::MifareUltralight).unwrap();
    /// assert_eq!(card.badge_uid().as_str(), "0A FF");
    ///
    /// assert!(CardData::new(vec![], CardType::MifareUltralight).is_err());
    /// ```
    pub fn new(uid: Vec<u8>, card_type: CardType) -> Result<Self> {
        if !(MIN_UID_LENGTH..=MAX_UID_LENGTH).contains(&uid.len()) {
            return Err(HardwareError::invalid_data(format!(
                "Card UID length must be between {} and {} bytes, got {}",
                MIN_UID_LENGTH,
                MAX_UID_LENGTH,
                uid.len()
            )));
        }

        Ok(Self {
            uid,
            card_type,
            timestamp: chrono::Utc::now(),
        })
    }

    /// The UID in the directory's normalized form.
    pub fn badge_uid(&self) -> BadgeUid {
        BadgeUid::from_bytes(&self.uid)
    }
}

/// RFID reader information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderInfo {
    /// Reader name (e.g., "MFRC522").
    pub name: String,

    /// Chip firmware version byte, if the reader reports one.
    pub firmware_version: Option<u8>,
}

impl ReaderInfo {
    /// Create a new ReaderInfo.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            firmware_version: None,
        }
    }

    /// Set the firmware version.
    pub fn with_firmware_version(mut self, version: u8) -> Self {
        self.firmware_version = Some(version);
        self
    }
}
