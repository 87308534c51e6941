//! Terminal state machine.
//!
//! Tracks where the attendance controller is in its boot and scan cycle and
//! rejects any step that skips a phase.
//!
//! # States
//!
//! - `Booting`: connecting the link and loading the directory
//! - `Idle`: showing the scan animation, polling the reader
//! - `CardDetected`: a card serial was read
//! - `Verifying`: looking the badge up in the directory
//! - `Granted` / `Denied`: decision made, feedback in progress
//! - `Halted`: directory load failed; nothing runs until a restart
//!
//! # Valid Transitions
//!
//! - Booting → Idle | Halted
//! - Idle → CardDetected → Verifying → Granted | Denied
//! - Granted → Idle, Denied → Idle
//!
//! `Halted` has no outgoing transitions.
//!
//! # Examples
//!
//! ```
//! use gatepass_terminal::{StateMachine, TerminalState};
//!
//! let mut machine = StateMachine::new();
//! assert_eq!(machine.current_state(), &TerminalState::Booting);
//!
//! machine.transition_to(TerminalState::Idle).unwrap();
//! assert!(machine.transition_to(TerminalState::Granted).is_err());
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use gatepass_core::{Error, Result};

/// Maximum number of state transitions to keep in history.
///
/// A scan cycle is four transitions, so this covers the last 25 scans.
const MAX_HISTORY_SIZE: usize = 100;

/// Phase of the attendance terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalState {
    /// Connecting and loading the directory.
    Booting,

    /// Waiting for a card.
    Idle,

    /// A card serial was read.
    CardDetected,

    /// Looking the badge up.
    Verifying,

    /// Badge found in the directory.
    Granted,

    /// Badge not found.
    Denied,

    /// Directory load failed. Terminal until restart.
    Halted,
}

impl fmt::Display for TerminalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state_str = match self {
            TerminalState::Booting => "Booting",
            TerminalState::Idle => "Idle",
            TerminalState::CardDetected => "CardDetected",
            TerminalState::Verifying => "Verifying",
            TerminalState::Granted => "Granted",
            TerminalState::Denied => "Denied",
            TerminalState::Halted => "Halted",
        };
        write!(f, "{}", state_str)
    }
}

impl TerminalState {
    /// Check if transition to target state is valid from this state.
    ///
    /// # Examples
    ///
    /// ```
    /// use gatepass_terminal::TerminalState;
    ///
    /// assert!(TerminalState::Booting.can_transition_to(&TerminalState::Halted));
    /// assert!(!TerminalState::Idle.can_transition_to(&TerminalState::Halted));
    /// assert!(!TerminalState::Halted.can_transition_to(&TerminalState::Idle));
    /// ```
    pub fn can_transition_to(&self, target: &TerminalState) -> bool {
        matches!(
            (self, target),
            // From Booting
            (TerminalState::Booting, TerminalState::Idle | TerminalState::Halted)
            // From Idle
            | (TerminalState::Idle, TerminalState::CardDetected)
            // From CardDetected
            | (TerminalState::CardDetected, TerminalState::Verifying)
            // From Verifying
            | (TerminalState::Verifying, TerminalState::Granted | TerminalState::Denied)
            // Back to Idle after feedback
            | (TerminalState::Granted | TerminalState::Denied, TerminalState::Idle)
        )
    }

    /// Whether the scan loop may poll the reader in this state.
    pub fn accepts_cards(&self) -> bool {
        matches!(self, TerminalState::Idle)
    }
}

/// A single state transition with timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    /// The state transitioned from.
    pub from: TerminalState,

    /// The state transitioned to.
    pub to: TerminalState,

    /// When the transition occurred. Not serialized; deserializing sets it
    /// to the current time.
    #[serde(skip, default = "Instant::now")]
    pub timestamp: Instant,
}

impl StateTransition {
    pub fn new(from: TerminalState, to: TerminalState) -> Self {
        Self {
            from,
            to,
            timestamp: Instant::now(),
        }
    }
}

/// State machine for the terminal's boot and scan cycle.
///
/// Not thread-safe; the controller owns it on a single task.
///
/// # Examples
///
/// ```
/// use gatepass_terminal::{StateMachine, TerminalState};
///
/// let mut machine = StateMachine::new();
/// machine.transition_to(TerminalState::Idle).unwrap();
/// machine.transition_to(TerminalState::CardDetected).unwrap();
/// machine.transition_to(TerminalState::Verifying).unwrap();
/// machine.transition_to(TerminalState::Denied).unwrap();
///
/// assert_eq!(machine.history().len(), 4);
/// ```
#[derive(Debug)]
pub struct StateMachine {
    current_state: TerminalState,
    history: VecDeque<StateTransition>,
}

impl StateMachine {
    /// Create a new state machine in the `Booting` state.
    pub fn new() -> Self {
        Self {
            current_state: TerminalState::Booting,
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    /// Create a builder for a machine with a custom starting point.
    ///
    /// ```
    /// use gatepass_terminal::{StateMachine, TerminalState};
    ///
    /// let machine = StateMachine::builder()
    ///     .with_initial_state(TerminalState::Idle)
    ///     .build();
    ///
    /// assert!(machine.current_state().accepts_cards());
    /// ```
    pub fn builder() -> StateMachineBuilder {
        StateMachineBuilder::default()
    }

    pub fn current_state(&self) -> &TerminalState {
        &self.current_state
    }

    pub fn is_halted(&self) -> bool {
        self.current_state == TerminalState::Halted
    }

    /// Recent transitions, oldest first.
    pub fn history(&self) -> &VecDeque<StateTransition> {
        &self.history
    }

    /// Transition to a new state, validating the transition.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidStateTransition` if `new_state` is not
    /// reachable from the current state. The machine is left unchanged.
    pub fn transition_to(&mut self, new_state: TerminalState) -> Result<StateTransition> {
        if !self.current_state.can_transition_to(&new_state) {
            return Err(Error::InvalidStateTransition {
                from: self.current_state.to_string(),
                to: new_state.to_string(),
            });
        }

        let transition = StateTransition::new(self.current_state, new_state);

        self.current_state = new_state;
        self.add_to_history(transition.clone());

        Ok(transition)
    }

    fn add_to_history(&mut self, transition: StateTransition) {
        self.history.push_back(transition);
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`StateMachine`].
#[derive(Debug)]
pub struct StateMachineBuilder {
    initial_state: TerminalState,
}

impl StateMachineBuilder {
    pub fn with_initial_state(mut self, state: TerminalState) -> Self {
        self.initial_state = state;
        self
    }

    pub fn build(self) -> StateMachine {
        StateMachine {
            current_state: self.initial_state,
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }
}

impl Default for StateMachineBuilder {
    fn default() -> Self {
        Self {
            initial_state: TerminalState::Booting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn idle_machine() -> StateMachine {
        StateMachine::builder()
            .with_initial_state(TerminalState::Idle)
            .build()
    }

    #[test]
    fn test_new_machine_starts_booting() {
        let machine = StateMachine::new();
        assert_eq!(machine.current_state(), &TerminalState::Booting);
        assert!(machine.history().is_empty());
        assert!(!machine.is_halted());
    }

    #[test]
    fn test_boot_to_idle() {
        let mut machine = StateMachine::new();
        let transition = machine.transition_to(TerminalState::Idle).unwrap();

        assert_eq!(transition.from, TerminalState::Booting);
        assert_eq!(transition.to, TerminalState::Idle);
        assert!(machine.current_state().accepts_cards());
    }

    #[test]
    fn test_boot_to_halted_is_final() {
        let mut machine = StateMachine::new();
        machine.transition_to(TerminalState::Halted).unwrap();
        assert!(machine.is_halted());

        for target in [
            TerminalState::Booting,
            TerminalState::Idle,
            TerminalState::CardDetected,
            TerminalState::Verifying,
            TerminalState::Granted,
            TerminalState::Denied,
        ] {
            assert!(machine.transition_to(target).is_err());
        }
        assert!(machine.is_halted());
    }

    #[rstest]
    #[case(TerminalState::Granted)]
    #[case(TerminalState::Denied)]
    fn test_complete_scan_cycle(#[case] decision: TerminalState) {
        let mut machine = idle_machine();

        machine.transition_to(TerminalState::CardDetected).unwrap();
        machine.transition_to(TerminalState::Verifying).unwrap();
        machine.transition_to(decision).unwrap();
        machine.transition_to(TerminalState::Idle).unwrap();

        assert_eq!(machine.current_state(), &TerminalState::Idle);
        assert_eq!(machine.history().len(), 4);
    }

    #[rstest]
    #[case(TerminalState::Idle, TerminalState::Granted)]
    #[case(TerminalState::Idle, TerminalState::Halted)]
    #[case(TerminalState::Idle, TerminalState::Verifying)]
    #[case(TerminalState::CardDetected, TerminalState::Denied)]
    #[case(TerminalState::Granted, TerminalState::Denied)]
    #[case(TerminalState::Denied, TerminalState::CardDetected)]
    fn test_invalid_transitions(#[case] from: TerminalState, #[case] to: TerminalState) {
        let mut machine = StateMachine::builder().with_initial_state(from).build();

        let error = machine.transition_to(to).unwrap_err();

        assert!(matches!(error, Error::InvalidStateTransition { .. }));
        assert_eq!(machine.current_state(), &from);
        assert!(machine.history().is_empty());
    }

    #[test]
    fn test_invalid_transition_message() {
        let mut machine = idle_machine();
        let error = machine.transition_to(TerminalState::Granted).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid state transition from Idle to Granted"
        );
    }

    #[test]
    fn test_history_size_limit() {
        let mut machine = idle_machine();

        for _ in 0..30 {
            machine.transition_to(TerminalState::CardDetected).unwrap();
            machine.transition_to(TerminalState::Verifying).unwrap();
            machine.transition_to(TerminalState::Granted).unwrap();
            machine.transition_to(TerminalState::Idle).unwrap();
        }

        assert_eq!(machine.history().len(), MAX_HISTORY_SIZE);
        assert_eq!(machine.history().back().unwrap().to, TerminalState::Idle);
    }

    #[test]
    fn test_state_display_formatting() {
        assert_eq!(TerminalState::CardDetected.to_string(), "CardDetected");
        assert_eq!(TerminalState::Halted.to_string(), "Halted");
    }

    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_string(&TerminalState::CardDetected).unwrap();
        assert_eq!(json, "\"card_detected\"");

        let state: TerminalState = serde_json::from_str("\"halted\"").unwrap();
        assert_eq!(state, TerminalState::Halted);
    }

    #[test]
    fn test_transition_serialization_skips_timestamp() {
        let transition = StateTransition::new(TerminalState::Verifying, TerminalState::Granted);
        let json = serde_json::to_value(&transition).unwrap();

        assert_eq!(json, serde_json::json!({ "from": "verifying", "to": "granted" }));
    }
}
