//! Gatepass terminal runtime.
//!
//! This crate ties the peripherals from `gatepass-hardware` and the remote
//! services from `gatepass-network` together into the attendance terminal:
//! the [`AttendanceController`], its [`StateMachine`], the status display
//! and the buzzer cues.

pub mod audio;
pub mod controller;
pub mod display;
pub mod state_machine;

pub use audio::{Cue, ToneStep};
pub use controller::{
    AttendanceController, ControllerConfig, ControllerConfigBuilder, DirectoryLoad, Peripherals,
    ScanOutcome, Services,
};
pub use display::{
    Alignment, Animation, StatusDisplay, StatusFrame, VirtualDisplay, align_text, truncate_text,
};
pub use state_machine::{StateMachine, StateMachineBuilder, StateTransition, TerminalState};
