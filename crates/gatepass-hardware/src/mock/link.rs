//! Mock Wi-Fi link.
//!
//! The link connects as soon as `begin` is called unless the handle marked
//! the access point unreachable. Tests drop the link from the handle to
//! exercise the reconnect path.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::{Result, traits::NetworkLink};

#[derive(Debug)]
struct LinkState {
    connected: AtomicBool,
    reachable: AtomicBool,
    begins: AtomicUsize,
}

/// Mock network link for testing and development.
///
/// # Examples
///
/// ```
/// use gatepass_hardware::mock::MockLink;
/// use gatepass_hardware::traits::NetworkLink;
///
/// #[tokio::main]
/// async fn main() -> gatepass_hardware::Result<()> {
///     let (mut link, handle) = MockLink::new();
///     assert!(!link.is_connected().await);
///
///     link.begin("EcoArchers").await?;
///     assert!(link.is_connected().await);
///     assert_eq!(handle.begin_count(), 1);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockLink {
    state: Arc<LinkState>,
}

impl MockLink {
    /// Create a disconnected link whose access point is reachable.
    pub fn new() -> (Self, MockLinkHandle) {
        let state = Arc::new(LinkState {
            connected: AtomicBool::new(false),
            reachable: AtomicBool::new(true),
            begins: AtomicUsize::new(0),
        });
        (
            Self {
                state: Arc::clone(&state),
            },
            MockLinkHandle { state },
        )
    }
}

impl NetworkLink for MockLink {
    async fn begin(&mut self, _ssid: &str) -> Result<()> {
        self.state.begins.fetch_add(1, Ordering::SeqCst);
        let reachable = self.state.reachable.load(Ordering::SeqCst);
        self.state.connected.store(reachable, Ordering::SeqCst);
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        self.state.connected.load(Ordering::SeqCst)
    }

    async fn local_address(&self) -> Option<String> {
        self.state
            .connected
            .load(Ordering::SeqCst)
            .then(|| "192.168.4.20".to_string())
    }
}

/// Handle for controlling a [`MockLink`].
#[derive(Debug, Clone)]
pub struct MockLinkHandle {
    state: Arc<LinkState>,
}

impl MockLinkHandle {
    /// Whether future `begin` calls succeed.
    pub fn set_reachable(&self, reachable: bool) {
        self.state.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Simulate losing the access point.
    pub fn drop_link(&self) {
        self.state.connected.store(false, Ordering::SeqCst);
    }

    /// Number of association attempts.
    pub fn begin_count(&self) -> usize {
        self.state.begins.load(Ordering::SeqCst)
    }
}
