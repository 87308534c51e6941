//! Seams between the attendance controller and remote services.
//!
//! None of these methods return `Result`: failures are logged by the
//! implementation and surface only as an empty body or a [`Delivery`].

#![allow(async_fn_in_trait)]

use gatepass_core::ScanEvent;

use crate::chat::{ChatMessage, Delivery};

/// Source of the raw directory document.
pub trait DirectorySource: Send + Sync {
    /// Issue one read request and return the body, or `""` on transport
    /// failure. Never retries.
    async fn fetch_raw(&self) -> String;
}

/// Fire-and-forget sink for scan decisions.
pub trait ScanSink: Send + Sync {
    /// Send one report. The response is not inspected.
    async fn report(&self, event: &ScanEvent);
}

/// Chat notification channel.
pub trait ChatSink: Send + Sync {
    /// Post one message. Never retries.
    async fn send(&self, message: &ChatMessage) -> Delivery;
}
