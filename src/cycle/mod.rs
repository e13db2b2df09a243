//! Stake/unstake cycle controller.

pub mod controller;
pub mod countdown;
pub mod types;

pub use controller::CycleController;
pub use countdown::{Countdown, WaitOutcome};
pub use types::{CycleExit, CycleState, CycleStep, StopSignal};
