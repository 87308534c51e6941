//! Timing, retry and endpoint constants for the attendance terminal.
//!
//! These mirror the behavior of the deployed terminals. Tests override the
//! timing values through `ControllerConfig` rather than editing them here.
//!
//! # Usage
//!
//! ```
//! use gatepass_core::constants::*;
//! use std::time::Duration;
//!
//! assert_eq!(DIRECTORY_MAX_ATTEMPTS, 3);
//! let delay = Duration::from_millis(DIRECTORY_RETRY_DELAY_MS);
//! assert_eq!(delay.as_secs(), 1);
//! ```

// ============================================================================
// Directory load
// ============================================================================

/// Maximum number of directory fetch attempts during boot.
pub const DIRECTORY_MAX_ATTEMPTS: u32 = 3;

/// Delay between directory fetch attempts, in milliseconds.
pub const DIRECTORY_RETRY_DELAY_MS: u64 = 1000;

/// Interval between checks while halted, in milliseconds.
pub const HALT_IDLE_MS: u64 = 1000;

/// Characters of context shown on each side of a parse error.
pub const PARSE_EXCERPT_RADIUS: usize = 24;

// ============================================================================
// Network link
// ============================================================================

/// Number of status polls while associating with the access point.
pub const LINK_CONNECT_POLLS: u32 = 30;

/// Interval between link status polls, in milliseconds.
pub const LINK_POLL_INTERVAL_MS: u64 = 500;

// ============================================================================
// Scan loop pacing
// ============================================================================

/// Delay between animation frames on the idle screen, in milliseconds.
pub const FRAME_DELAY_MS: u64 = 42;

/// Pause between reporting a denied scan and posting the chat alert.
pub const DENIAL_NOTIFY_PAUSE_MS: u64 = 500;

/// Pause after halting the card before the reader is polled again.
pub const READER_RESET_PAUSE_MS: u64 = 250;

// ============================================================================
// HTTP
// ============================================================================

/// Base URL of the spreadsheet backend's deployed scripts.
pub const SCRIPT_BASE_URL: &str = "https://script.google.com/macros/s";

/// Query marker requesting a directory read.
pub const DIRECTORY_READ_QUERY: &str = "read";

/// Timeout for the directory fetch, in milliseconds.
pub const DIRECTORY_TIMEOUT_MS: u64 = 5000;

/// Timeout for a scan report, in milliseconds.
pub const REPORT_TIMEOUT_MS: u64 = 15000;

/// Timeout for a chat webhook post, in milliseconds.
pub const WEBHOOK_TIMEOUT_MS: u64 = 5000;

/// Maximum redirect hops followed by the directory fetch.
pub const MAX_REDIRECTS: usize = 5;

// ============================================================================
// Display geometry
// ============================================================================

/// Text lines on the 128x64 panel at text size 1.
pub const DISPLAY_LINES: usize = 8;

/// Characters per line on the 128x64 panel at text size 1.
pub const DISPLAY_COLUMNS: usize = 21;
