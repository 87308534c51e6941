//! Core domain types for the Gatepass attendance terminal.
//!
//! Everything in here is free of I/O: badge identifiers, the authorized
//! directory, scan events, chat message templates and terminal
//! configuration. The hardware, network and terminal crates build on these.

pub mod chat;
pub mod config;
pub mod constants;
pub mod directory;
pub mod error;
pub mod types;

pub use chat::{AttendanceAction, Embed};
pub use config::TerminalConfig;
pub use directory::{Directory, DirectoryRecord, parse_directory};
pub use error::{Error, Result};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
