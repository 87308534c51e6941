//! Outbound HTTP services for the Gatepass terminal.
//!
//! The terminal talks to two remote systems:
//!
//! - **Spreadsheet backend**: serves the authorized directory
//!   ([`DirectoryClient`]) and records every scan ([`ScanReporter`]).
//! - **Chat webhook**: receives human-readable notifications
//!   ([`ChatNotifier`]) over TLS pinned to a single root certificate.
//!
//! # Design Principles
//!
//! - **No automatic retry**: the attendance controller decides retry policy
//! - **No error propagation**: every call degrades to a value the controller
//!   can inspect (an empty body, a [`Delivery`]) and logs the failure
//! - **One request per call**: responses are consumed or dropped before the
//!   call returns, on every path
//!
//! The controller depends on the [`DirectorySource`], [`ScanSink`] and
//! [`ChatSink`] traits, so tests substitute in-memory fakes.
//!
//! # Example
//!
//! ```no_run
//! use gatepass_core::TerminalConfig;
//! use gatepass_network::{DirectoryClient, DirectoryClientConfig, DirectorySource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TerminalConfig::from_env()?;
//! let client = DirectoryClient::new(DirectoryClientConfig::new(config.directory_url()))?;
//!
//! let body = client.fetch_raw().await;
//! println!("{} characters", body.len());
//! # Ok(())
//! # }
//! ```

mod certs;
mod chat;
mod directory;
mod error;
mod reporter;
mod traits;

pub use certs::GTS_ROOT_R4_PEM;
pub use chat::{ChatMessage, ChatNotifier, Delivery, WebhookConfig, WebhookPayload};
pub use directory::{DirectoryClient, DirectoryClientConfig};
pub use error::NetworkError;
pub use reporter::{ScanReporter, ScanReporterConfig};
pub use traits::{ChatSink, DirectorySource, ScanSink};
