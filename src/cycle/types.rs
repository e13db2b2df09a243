use crate::models::CycleConfig;
use std::fmt;
use tokio::sync::watch;

/// Step the cycle is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleStep {
    #[default]
    Idle,
    Depositing,
    WaitingAfterDeposit,
    Redeeming,
    WaitingAfterRedeem,
}

impl fmt::Display for CycleStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CycleStep::Idle => "idle",
            CycleStep::Depositing => "depositing",
            CycleStep::WaitingAfterDeposit => "waiting after deposit",
            CycleStep::Redeeming => "redeeming",
            CycleStep::WaitingAfterRedeem => "waiting after redeem",
        };
        f.write_str(label)
    }
}

/// Controller state published to status readers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleState {
    pub running: bool,
    pub stop_requested: bool,
    pub step: CycleStep,
    /// Parameters of the running cycle.
    pub config: Option<CycleConfig>,
    pub completed_cycles: u64,
    pub consecutive_faults: u32,
}

/// Why a cycle run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleExit {
    Stopped,
    DepositFailed(String),
    RedeemFailed(String),
    /// Too many consecutive iterations faulted.
    FaultLimit(u32),
}

/// Read-only view of the stop flag, polled at wait ticks and iteration start.
#[derive(Debug, Clone)]
pub struct StopSignal {
    state: watch::Receiver<CycleState>,
}

impl StopSignal {
    pub fn new(state: watch::Receiver<CycleState>) -> Self {
        Self { state }
    }

    pub fn is_requested(&self) -> bool {
        self.state.borrow().stop_requested
    }
}
