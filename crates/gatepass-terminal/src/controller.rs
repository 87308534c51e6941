//! Attendance controller.
//!
//! Owns the directory, the display and the state machine, and drives the
//! peripherals and remote services through one boot sequence followed by an
//! endless scan loop. Everything runs on a single task: each step is awaited
//! in order and there is never more than one scan in flight.
//!
//! # Failure handling
//!
//! Only the directory load can stop the terminal. When every attempt fails
//! the controller enters [`TerminalState::Halted`], shows the failure screen
//! and never polls the reader again. Reporter, chat, buzzer and reader
//! errors are logged and the cycle carries on.
//!
//! # Example
//!
//! ```no_run
//! use gatepass_hardware::mock::{MockBuzzer, MockLink, MockRfid};
//! use gatepass_network::{
//!     ChatNotifier, DirectoryClient, DirectoryClientConfig, ScanReporter, ScanReporterConfig,
//!     WebhookConfig,
//! };
//! use gatepass_terminal::{AttendanceController, ControllerConfig, Peripherals, Services};
//!
//! # async fn example(config: gatepass_core::TerminalConfig) -> Result<(), Box<dyn std::error::Error>> {
//! let (reader, _cards) = MockRfid::new();
//! let (buzzer, _) = MockBuzzer::new();
//! let (link, _) = MockLink::new();
//!
//! let services = Services {
//!     directory: DirectoryClient::new(DirectoryClientConfig::new(config.directory_url()))?,
//!     reporter: ScanReporter::new(ScanReporterConfig::new(config.report_url()))?,
//!     chat: ChatNotifier::new(WebhookConfig::new(config.webhook_url.clone(), config.tts))?,
//! };
//!
//! let mut controller = AttendanceController::new(
//!     Peripherals { reader, buzzer, link },
//!     services,
//!     ControllerConfig::builder().wifi_ssid(config.wifi_ssid.clone()).build(),
//! );
//! controller.run().await;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use gatepass_core::chat::ONLINE_MESSAGE;
use gatepass_core::constants::{
    DENIAL_NOTIFY_PAUSE_MS, DIRECTORY_MAX_ATTEMPTS, DIRECTORY_RETRY_DELAY_MS, FRAME_DELAY_MS,
    HALT_IDLE_MS, LINK_CONNECT_POLLS, LINK_POLL_INTERVAL_MS, READER_RESET_PAUSE_MS,
};
use gatepass_core::{
    AttendanceAction, BadgeUid, Directory, DirectoryRecord, Embed, Error, Result, ScanEvent,
    parse_directory,
};
use gatepass_hardware::{Buzzer, NetworkLink, ReaderInfo, RfidReader};
use gatepass_network::{ChatMessage, ChatSink, Delivery, DirectorySource, ScanSink};
use tracing::{debug, error, info, warn};

use crate::audio::{self, Cue};
use crate::display::{Animation, StatusDisplay, StatusFrame};
use crate::state_machine::{StateMachine, TerminalState};

/// Timing and retry settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Access point joined at boot.
    pub wifi_ssid: String,

    /// Directory download attempts before halting.
    pub max_attempts: u32,

    /// Wait between failed download attempts.
    pub retry_delay: Duration,

    /// Sleep per idle iteration once halted.
    pub halt_idle: Duration,

    /// Link status checks after `begin`.
    pub link_polls: u32,

    /// Wait between link status checks.
    pub link_poll_interval: Duration,

    /// Delay per scan-animation frame.
    pub frame_delay: Duration,

    /// Pause between the denial report and the denial chat alert.
    pub denial_pause: Duration,

    /// Pause after halting a card, before the next poll.
    pub reset_pause: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            wifi_ssid: String::new(),
            max_attempts: DIRECTORY_MAX_ATTEMPTS,
            retry_delay: Duration::from_millis(DIRECTORY_RETRY_DELAY_MS),
            halt_idle: Duration::from_millis(HALT_IDLE_MS),
            link_polls: LINK_CONNECT_POLLS,
            link_poll_interval: Duration::from_millis(LINK_POLL_INTERVAL_MS),
            frame_delay: Duration::from_millis(FRAME_DELAY_MS),
            denial_pause: Duration::from_millis(DENIAL_NOTIFY_PAUSE_MS),
            reset_pause: Duration::from_millis(READER_RESET_PAUSE_MS),
        }
    }
}

impl ControllerConfig {
    pub fn builder() -> ControllerConfigBuilder {
        ControllerConfigBuilder::default()
    }
}

/// Builder for [`ControllerConfig`].
///
/// ```
/// use std::time::Duration;
/// use gatepass_terminal::ControllerConfig;
///
/// let config = ControllerConfig::builder()
///     .wifi_ssid("EcoArchers")
///     .retry_delay(Duration::from_millis(10))
///     .build();
///
/// assert_eq!(config.max_attempts, 3);
/// assert_eq!(config.retry_delay, Duration::from_millis(10));
/// ```
#[derive(Debug, Default)]
pub struct ControllerConfigBuilder {
    config: ControllerConfig,
}

impl ControllerConfigBuilder {
    pub fn wifi_ssid(mut self, ssid: impl Into<String>) -> Self {
        self.config.wifi_ssid = ssid.into();
        self
    }

    /// Clamped to at least one attempt.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.max_attempts = attempts.max(1);
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.config.retry_delay = delay;
        self
    }

    pub fn halt_idle(mut self, idle: Duration) -> Self {
        self.config.halt_idle = idle;
        self
    }

    pub fn link_polls(mut self, polls: u32, interval: Duration) -> Self {
        self.config.link_polls = polls;
        self.config.link_poll_interval = interval;
        self
    }

    pub fn frame_delay(mut self, delay: Duration) -> Self {
        self.config.frame_delay = delay;
        self
    }

    pub fn denial_pause(mut self, pause: Duration) -> Self {
        self.config.denial_pause = pause;
        self
    }

    pub fn reset_pause(mut self, pause: Duration) -> Self {
        self.config.reset_pause = pause;
        self
    }

    pub fn build(self) -> ControllerConfig {
        self.config
    }
}

/// Local devices the controller drives.
#[derive(Debug)]
pub struct Peripherals<R, B, L> {
    pub reader: R,
    pub buzzer: B,
    pub link: L,
}

/// Remote services the controller calls.
#[derive(Debug)]
pub struct Services<F, S, C> {
    pub directory: F,
    pub reporter: S,
    pub chat: C,
}

/// Result of a directory load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryLoad {
    /// The directory now holds `records` entries.
    Loaded { records: usize, attempts: u32 },
    /// No attempt produced a usable directory.
    Exhausted { attempts: u32 },
}

impl DirectoryLoad {
    pub fn is_loaded(&self) -> bool {
        matches!(self, DirectoryLoad::Loaded { .. })
    }
}

/// Decision taken by one [`tick`](AttendanceController::tick).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Nothing was read this cycle.
    NoCard,
    Granted { record: DirectoryRecord },
    Denied { uid: BadgeUid },
}

/// The attendance terminal.
pub struct AttendanceController<R, B, L, F, S, C> {
    reader: R,
    buzzer: B,
    link: L,
    directory_source: F,
    reporter: S,
    chat: C,
    config: ControllerConfig,
    directory: Directory,
    machine: StateMachine,
    display: StatusDisplay,
    frame: usize,
    reader_info: Option<ReaderInfo>,
}

impl<R, B, L, F, S, C> AttendanceController<R, B, L, F, S, C>
where
    R: RfidReader,
    B: Buzzer,
    L: NetworkLink,
    F: DirectorySource,
    S: ScanSink,
    C: ChatSink,
{
    /// Create a controller in the `Booting` state with an empty directory.
    pub fn new(
        peripherals: Peripherals<R, B, L>,
        services: Services<F, S, C>,
        config: ControllerConfig,
    ) -> Self {
        Self {
            reader: peripherals.reader,
            buzzer: peripherals.buzzer,
            link: peripherals.link,
            directory_source: services.directory,
            reporter: services.reporter,
            chat: services.chat,
            config,
            directory: Directory::default(),
            machine: StateMachine::new(),
            display: StatusDisplay::new(),
            frame: 0,
            reader_info: None,
        }
    }

    pub fn state(&self) -> TerminalState {
        *self.machine.current_state()
    }

    pub fn is_halted(&self) -> bool {
        self.machine.is_halted()
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn display(&self) -> &StatusDisplay {
        &self.display
    }

    pub fn state_machine(&self) -> &StateMachine {
        &self.machine
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Reader identification captured at boot, if the reader answered.
    pub fn reader_info(&self) -> Option<&ReaderInfo> {
        self.reader_info.as_ref()
    }

    /// Boot, then scan forever. If boot halts, idles forever instead.
    pub async fn run(&mut self) {
        if let Err(e) = self.boot().await {
            warn!("Boot skipped: {}", e);
        }

        loop {
            self.tick().await;
        }
    }

    /// Join the network and load the directory.
    ///
    /// On success the terminal plays the success tone, posts the online
    /// message and moves to `Idle`. When every attempt fails it moves to
    /// `Halted` and shows the failure screen.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidStateTransition` if the controller has
    /// already booted.
    pub async fn boot(&mut self) -> Result<DirectoryLoad> {
        if self.state() != TerminalState::Booting {
            return Err(Error::InvalidStateTransition {
                from: self.state().to_string(),
                to: TerminalState::Booting.to_string(),
            });
        }

        info!("RFID Attendance System - Initializing...");
        match self.reader.get_reader_info().await {
            Ok(info) => {
                match info.firmware_version {
                    Some(version) => info!("RFID reader: {} (firmware 0x{:02X})", info.name, version),
                    None => info!("RFID reader: {}", info.name),
                }
                self.reader_info = Some(info);
            }
            Err(e) => warn!("RFID reader did not identify itself: {}", e),
        }
        self.connect_network().await;

        let load = self.load_directory().await;
        match load {
            DirectoryLoad::Loaded { .. } => {
                self.enter(TerminalState::Idle);
                audio::play(&mut self.buzzer, Cue::Success).await;
                info!("System Ready - RFID Scanner Active");
                self.notify(&ChatMessage::text(ONLINE_MESSAGE)).await;
            }
            DirectoryLoad::Exhausted { attempts } => {
                error!(
                    "CRITICAL: Failed to download UID database after {} attempts",
                    attempts
                );
                self.display.show(StatusFrame::database_failed());
                self.enter(TerminalState::Halted);
            }
        }

        Ok(load)
    }

    /// Download the directory again while running.
    ///
    /// Uses the same attempt budget as boot. The current directory is only
    /// replaced on success; a failed reload keeps it and the terminal keeps
    /// scanning.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidStateTransition` unless the terminal is idle.
    pub async fn reload_directory(&mut self) -> Result<DirectoryLoad> {
        if !self.state().accepts_cards() {
            return Err(Error::InvalidStateTransition {
                from: self.state().to_string(),
                to: "reload".to_string(),
            });
        }

        let load = self.load_directory().await;
        if let DirectoryLoad::Exhausted { attempts } = load {
            warn!(
                "Directory reload failed after {} attempts; keeping {} existing records",
                attempts,
                self.directory.len()
            );
        }
        Ok(load)
    }

    /// Start associating and wait for the link, up to the configured number
    /// of polls. Returns whether the link came up; failure is not fatal here.
    pub async fn connect_network(&mut self) -> bool {
        let ssid = self.config.wifi_ssid.clone();
        self.display.show(StatusFrame::connecting(&ssid));
        info!("Connecting to WiFi network: {}", ssid);

        if let Err(e) = self.link.begin(&ssid).await {
            warn!("WiFi radio failed to start: {}", e);
        }

        let mut polls = 0;
        while !self.link.is_connected().await && polls < self.config.link_polls {
            tokio::time::sleep(self.config.link_poll_interval).await;
            polls += 1;
        }

        if self.link.is_connected().await {
            let address = self.link.local_address().await.unwrap_or_default();
            info!("WiFi Connected Successfully - IP Address: {}", address);
            true
        } else {
            error!("WiFi connection failed after {} checks", polls);
            false
        }
    }

    /// One pass of the scan loop.
    ///
    /// Never polls the reader unless the terminal is idle; a halted terminal
    /// just sleeps.
    pub async fn tick(&mut self) -> ScanOutcome {
        if !self.state().accepts_cards() {
            tokio::time::sleep(self.config.halt_idle).await;
            return ScanOutcome::NoCard;
        }

        self.display.show(StatusFrame::ready_to_scan(self.frame));
        self.frame = (self.frame + 1) % Animation::Scan.frame_count();
        tokio::time::sleep(self.config.frame_delay).await;

        let uid = match self.read_card().await {
            Some(uid) => uid,
            None => return ScanOutcome::NoCard,
        };

        self.enter(TerminalState::CardDetected);
        info!("Card Scanned - UID: {}", uid);
        audio::play(&mut self.buzzer, Cue::Scan).await;

        self.display.show(StatusFrame::verifying());
        self.enter(TerminalState::Verifying);

        let outcome = match self.directory.lookup(&uid).cloned() {
            Some(record) => {
                self.grant(&uid, &record).await;
                ScanOutcome::Granted { record }
            }
            None => {
                self.deny(&uid).await;
                ScanOutcome::Denied { uid }
            }
        };

        if let Err(e) = self.reader.halt_card().await {
            warn!("Failed to halt card: {}", e);
        }
        tokio::time::sleep(self.config.reset_pause).await;
        self.enter(TerminalState::Idle);

        outcome
    }

    async fn read_card(&mut self) -> Option<BadgeUid> {
        match self.reader.is_new_card_present().await {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => {
                warn!("Reader poll failed: {}", e);
                return None;
            }
        }

        match self.reader.read_card_serial().await {
            Ok(card) => {
                debug!("Read {} card", card.card_type.name());
                Some(card.badge_uid())
            }
            Err(e) => {
                warn!("Card read failed: {}", e);
                None
            }
        }
    }

    async fn grant(&mut self, uid: &BadgeUid, record: &DirectoryRecord) {
        self.enter(TerminalState::Granted);
        info!(
            "ACCESS GRANTED: {} ({})",
            record.display_name, record.chat_handle
        );

        let embed = Embed::authorized(
            &record.display_name,
            &record.chat_handle,
            AttendanceAction::Attendance,
        );
        self.notify(&ChatMessage::embed(embed)).await;
        self.reporter.report(&ScanEvent::new(uid.clone(), true)).await;

        self.display.show(StatusFrame::granted(&record.display_name));
        audio::play(&mut self.buzzer, Cue::Success).await;
    }

    async fn deny(&mut self, uid: &BadgeUid) {
        self.enter(TerminalState::Denied);
        warn!("ACCESS DENIED: Unknown UID {}", uid);

        self.reporter.report(&ScanEvent::new(uid.clone(), false)).await;
        tokio::time::sleep(self.config.denial_pause).await;
        self.notify(&ChatMessage::embed(Embed::denied())).await;

        self.display.show(StatusFrame::denied());
        audio::play(&mut self.buzzer, Cue::Error).await;
    }

    /// Run up to `max_attempts` downloads, installing the first usable one.
    async fn load_directory(&mut self) -> DirectoryLoad {
        let max_attempts = self.config.max_attempts;

        for attempt in 1..=max_attempts {
            if !self.link.is_connected().await {
                warn!("WiFi disconnected. Reconnecting...");
                self.connect_network().await;
            }

            self.display
                .show(StatusFrame::downloading(attempt, self.frame));

            let raw = self.directory_source.fetch_raw().await;
            info!("Database Response: {} characters", raw.chars().count());

            match parse_directory(&raw) {
                Ok(records) if !records.is_empty() => {
                    info!("UID Database Downloaded Successfully: {} users", records.len());
                    for record in &records {
                        info!("  {} ({})", record.display_name, record.badge_id);
                    }

                    let count = records.len();
                    self.directory.replace(records);
                    self.display.show(StatusFrame::database_ready(self.frame));
                    return DirectoryLoad::Loaded {
                        records: count,
                        attempts: attempt,
                    };
                }
                Ok(_) => warn!("No users found in database response"),
                Err(e) => warn!("Invalid database response: {}", e),
            }

            if attempt < max_attempts {
                info!("Retrying in {}ms...", self.config.retry_delay.as_millis());
                tokio::time::sleep(self.config.retry_delay).await;
            }
        }

        DirectoryLoad::Exhausted {
            attempts: max_attempts,
        }
    }

    async fn notify(&self, message: &ChatMessage) {
        match self.chat.send(message).await {
            Delivery::Delivered => debug!("Chat notification sent"),
            Delivery::Rejected(status) => warn!("Chat notification rejected - HTTP {}", status),
            Delivery::Failed => warn!("Chat notification could not be delivered"),
        }
    }

    fn enter(&mut self, state: TerminalState) {
        if let Err(e) = self.machine.transition_to(state) {
            error!("{}", e);
        }
    }
}
