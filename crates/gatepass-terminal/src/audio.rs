//! Buzzer feedback sequences.
//!
//! Each sequence is a list of [`ToneStep`]s. A step starts a tone and then
//! waits for `step` before the next one, so a step shorter than its tone
//! would cut the tone off.

use std::time::Duration;

use gatepass_hardware::Buzzer;
use tracing::warn;

/// One tone followed by a wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneStep {
    pub frequency_hz: u32,
    pub duration: Duration,
    /// Time from the start of this tone to the start of the next step.
    pub step: Duration,
}

impl ToneStep {
    pub const fn new(frequency_hz: u32, duration_ms: u64, step_ms: u64) -> Self {
        Self {
            frequency_hz,
            duration: Duration::from_millis(duration_ms),
            step: Duration::from_millis(step_ms),
        }
    }
}

/// Card picked up.
pub const SCAN_TONE: &[ToneStep] = &[ToneStep::new(2200, 300, 300)];

/// Access granted, also played once after boot.
pub const SUCCESS_TONE: &[ToneStep] = &[ToneStep::new(2000, 100, 150), ToneStep::new(2000, 100, 150)];

/// Access denied.
pub const ERROR_TONE: &[ToneStep] = &[
    ToneStep::new(1800, 250, 500),
    ToneStep::new(1800, 250, 500),
    ToneStep::new(1800, 250, 500),
    ToneStep::new(1800, 250, 500),
    ToneStep::new(1800, 250, 500),
];

/// Feedback events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Scan,
    Success,
    Error,
}

impl Cue {
    pub fn sequence(self) -> &'static [ToneStep] {
        match self {
            Cue::Scan => SCAN_TONE,
            Cue::Success => SUCCESS_TONE,
            Cue::Error => ERROR_TONE,
        }
    }

    /// Total wall time of the sequence.
    pub fn total_duration(self) -> Duration {
        self.sequence().iter().map(|step| step.step).sum()
    }
}

/// Play `cue` on `buzzer`. Buzzer failures are logged and the remaining
/// waits still happen, so pacing does not depend on the buzzer.
pub async fn play<B: Buzzer>(buzzer: &mut B, cue: Cue) {
    for step in cue.sequence() {
        if let Err(e) = buzzer.tone(step.frequency_hz, step.duration).await {
            warn!("Buzzer error during {:?} cue: {}", cue, e);
        }
        tokio::time::sleep(step.step).await;
    }
}
