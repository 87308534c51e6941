//! Mock buzzer that records every tone it is asked to play.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::{HardwareError, Result, traits::Buzzer};

/// A tone request captured by [`MockBuzzer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayedTone {
    pub frequency_hz: u32,
    pub duration: Duration,
}

#[derive(Debug, Default)]
struct BuzzerState {
    played: Mutex<Vec<PlayedTone>>,
    failing: AtomicBool,
}

/// Mock buzzer for testing and development.
///
/// # Examples
///
/// ```
/// use gatepass_hardware::mock::MockBuzzer;
/// use gatepass_hardware::traits::Buzzer;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> gatepass_hardware::Result<()> {
///     let (mut buzzer, handle) = MockBuzzer::new();
///     buzzer.tone(2200, Duration::from_millis(300)).await?;
///     assert_eq!(handle.played()[0].frequency_hz, 2200);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockBuzzer {
    state: Arc<BuzzerState>,
}

impl MockBuzzer {
    /// Create a buzzer and the handle used to inspect it.
    pub fn new() -> (Self, MockBuzzerHandle) {
        let state = Arc::new(BuzzerState::default());
        (
            Self {
                state: Arc::clone(&state),
            },
            MockBuzzerHandle { state },
        )
    }
}

impl Buzzer for MockBuzzer {
    async fn tone(&mut self, frequency_hz: u32, duration: Duration) -> Result<()> {
        if self.state.failing.load(Ordering::SeqCst) {
            return Err(HardwareError::communication("PWM channel unavailable"));
        }

        let mut played = self
            .state
            .played
            .lock()
            .map_err(|_| HardwareError::other("buzzer state poisoned"))?;
        played.push(PlayedTone {
            frequency_hz,
            duration,
        });
        Ok(())
    }
}

/// Handle for inspecting a [`MockBuzzer`].
#[derive(Debug, Clone)]
pub struct MockBuzzerHandle {
    state: Arc<BuzzerState>,
}

impl MockBuzzerHandle {
    /// Every tone played so far, oldest first.
    pub fn played(&self) -> Vec<PlayedTone> {
        self.state
            .played
            .lock()
            .map(|played| played.clone())
            .unwrap_or_default()
    }

    /// Forget recorded tones.
    pub fn clear(&self) {
        if let Ok(mut played) = self.state.played.lock() {
            played.clear();
        }
    }

    /// Make subsequent `tone` calls fail.
    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }
}
