//! Mock RFID reader implementation for testing and development.
//!
//! Cards are queued through a [`MockRfidHandle`] and picked up by the reader
//! the next time it is polled, one card per poll, in the order presented.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::debug;

use crate::{
    CardData, CardType, HardwareError, Result,
    traits::RfidReader,
    types::ReaderInfo,
};

/// Mock RFID reader for testing and development.
///
/// # Examples
///
/// ```
/// use gatepass_hardware::mock::MockRfid;
/// use gatepass_hardware::traits::RfidReader;
///
/// #[tokio::main]
/// async fn main() -> gatepass_hardware::Result<()> {
///     let (mut reader, handle) = MockRfid::new();
///
///     handle.present_card(vec![0x0A, 0xFF]).await?;
///
///     assert!(reader.is_new_card_present().await?);
///     let card = reader.read_card_serial().await?;
///     assert_eq!(card.badge_uid().as_str(), "0A FF");
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockRfid {
    /// Channel receiver for card events
    event_rx: mpsc::Receiver<CardEvent>,

    /// Card detected by the last presence check, not yet read
    pending: Option<CardEvent>,

    /// Device name
    name: String,

    /// Counters shared with the handle
    stats: Arc<ReaderStats>,
}

impl MockRfid {
    /// Create a new mock RFID reader with the default name.
    ///
    /// Returns a tuple of (MockRfid, MockRfidHandle) where the handle
    /// can be used to simulate card presentations.
    pub fn new() -> (Self, MockRfidHandle) {
        Self::with_name("Mock MFRC522".to_string())
    }

    /// Create a new mock RFID reader with a custom name.
    pub fn with_name(name: String) -> (Self, MockRfidHandle) {
        let (event_tx, event_rx) = mpsc::channel(32);
        let stats = Arc::new(ReaderStats::default());

        let reader = Self {
            event_rx,
            pending: None,
            name,
            stats: Arc::clone(&stats),
        };

        let handle = MockRfidHandle { event_tx, stats };

        (reader, handle)
    }
}

impl RfidReader for MockRfid {
    async fn is_new_card_present(&mut self) -> Result<bool> {
        self.stats.polls.fetch_add(1, Ordering::SeqCst);

        if self.pending.is_none() {
            match self.event_rx.try_recv() {
                Ok(event) => {
                    debug!("{}: card entered the field", self.name);
                    self.pending = Some(event);
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    debug!("{}: event channel closed", self.name);
                    return Err(HardwareError::disconnected("RFID event channel closed"));
                }
            }
        }

        Ok(self.pending.is_some())
    }

    async fn read_card_serial(&mut self) -> Result<CardData> {
        match self.pending.take() {
            Some(CardEvent::CardPresented(card)) => Ok(card),
            Some(CardEvent::Unreadable(reason)) => Err(HardwareError::card_read(reason)),
            None => Err(HardwareError::NoCard),
        }
    }

    async fn halt_card(&mut self) -> Result<()> {
        self.stats.halts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get_reader_info(&self) -> Result<ReaderInfo> {
        Ok(ReaderInfo::new(self.name.clone()).with_firmware_version(0x92))
    }
}

/// Internal event type for mock RFID reader.
#[derive(Debug, Clone)]
enum CardEvent {
    CardPresented(CardData),
    Unreadable(String),
}

#[derive(Debug, Default)]
struct ReaderStats {
    polls: AtomicUsize,
    halts: AtomicUsize,
}

/// Handle for controlling a mock RFID reader.
#[derive(Debug, Clone)]
pub struct MockRfidHandle {
    /// Channel sender for card events
    event_tx: mpsc::Sender<CardEvent>,

    /// Counters shared with the reader
    stats: Arc<ReaderStats>,
}

impl MockRfidHandle {
    /// Present a Mifare Classic 1K card with the given UID.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The UID length is invalid
    /// - The reader has been dropped and the channel is closed
    pub async fn present_card(&self, uid: Vec<u8>) -> Result<()> {
        self.present_card_as(uid, CardType::MifareClassic1K).await
    }

    /// Present a card of a specific type.
    ///
    /// # Errors
    ///
    /// Same as [`present_card`](Self::present_card).
    pub async fn present_card_as(&self, uid: Vec<u8>, card_type: CardType) -> Result<()> {
        let card = CardData::new(uid, card_type)?;
        debug!("Presenting {} card {}", card_type.name(), card.badge_uid());
        self.send(CardEvent::CardPresented(card)).await
    }

    /// Present a card that is detected but whose serial read fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader has been dropped.
    pub async fn present_unreadable(&self, reason: impl Into<String>) -> Result<()> {
        self.send(CardEvent::Unreadable(reason.into())).await
    }

    /// Number of presence checks the reader has answered.
    pub fn poll_count(&self) -> usize {
        self.stats.polls.load(Ordering::SeqCst)
    }

    /// Number of cards halted.
    pub fn halt_count(&self) -> usize {
        self.stats.halts.load(Ordering::SeqCst)
    }

    async fn send(&self, event: CardEvent) -> Result<()> {
        self.event_tx
            .send(event)
            .await
            .map_err(|_| HardwareError::disconnected("RFID event channel closed"))
    }
}
