//! Deposit → wait → redeem → wait loop.

use super::countdown::{Countdown, WaitOutcome};
use super::types::{CycleExit, CycleState, CycleStep, StopSignal};
use crate::chain::ChainClient;
use crate::config::TimingConfig;
use crate::models::CycleConfig;
use crate::staking::Staker;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

enum IterationEnd {
    Continue,
    Exit(CycleExit),
}

/// Owns the single stake/unstake cycle of the process.
///
/// Clones share the same state, so the menu and the running cycle task see one
/// controller.
pub struct CycleController<C> {
    staker: Arc<Staker<C>>,
    state: Arc<watch::Sender<CycleState>>,
    countdown: Countdown,
    retry_cooldown: Duration,
    max_consecutive_faults: Option<u32>,
}

impl<C> Clone for CycleController<C> {
    fn clone(&self) -> Self {
        Self {
            staker: self.staker.clone(),
            state: self.state.clone(),
            countdown: self.countdown,
            retry_cooldown: self.retry_cooldown,
            max_consecutive_faults: self.max_consecutive_faults,
        }
    }
}

impl<C: ChainClient + 'static> CycleController<C> {
    pub fn new(staker: Arc<Staker<C>>, countdown: Countdown, timing: &TimingConfig) -> Self {
        let (state, _) = watch::channel(CycleState::default());
        Self {
            staker,
            state: Arc::new(state),
            countdown,
            retry_cooldown: timing.retry_cooldown,
            max_consecutive_faults: timing.max_consecutive_faults,
        }
    }

    pub fn status(&self) -> CycleState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CycleState> {
        self.state.subscribe()
    }

    /// Starts the cycle on a background task.
    ///
    /// Returns `None` and leaves the state untouched when a cycle is already running.
    pub fn start(&self, config: CycleConfig) -> Option<JoinHandle<CycleExit>> {
        let mut started = false;
        self.state.send_if_modified(|state| {
            if state.running {
                return false;
            }
            *state = CycleState {
                running: true,
                config: Some(config.clone()),
                ..CycleState::default()
            };
            started = true;
            true
        });
        if !started {
            warn!("[CYCLE] auto-swap is already running");
            return None;
        }

        info!(
            deposit_amount = %config.deposit_amount,
            redeem_amount = %config.redeem_amount,
            post_deposit_delay_minutes = config.post_deposit_delay_minutes,
            post_redeem_delay_minutes = config.post_redeem_delay_minutes,
            "[CYCLE] ===== starting auto swap cycle ====="
        );
        let this = self.clone();
        Some(tokio::spawn(async move { this.run(config).await }))
    }

    /// Asks the running cycle to stop at its next wait boundary.
    pub fn stop(&self) -> bool {
        let mut requested = false;
        self.state.send_if_modified(|state| {
            if !state.running {
                return false;
            }
            state.stop_requested = true;
            requested = true;
            true
        });
        if requested {
            info!("[CYCLE] stopping auto-swap after current operation completes");
        } else {
            info!("[CYCLE] auto-swap is not running");
        }
        requested
    }

    async fn run(self, config: CycleConfig) -> CycleExit {
        let stop = StopSignal::new(self.state.subscribe());
        let exit = loop {
            if stop.is_requested() {
                break CycleExit::Stopped;
            }

            // Iterations run on their own task so a panic inside one is
            // contained and treated as a transient fault.
            let iteration = {
                let this = self.clone();
                let config = config.clone();
                let stop = stop.clone();
                tokio::spawn(async move { this.run_iteration(&config, &stop).await })
            };

            match iteration.await {
                Ok(IterationEnd::Continue) => {
                    self.state.send_modify(|state| {
                        state.completed_cycles += 1;
                        state.consecutive_faults = 0;
                    });
                    info!("[CYCLE] ===== starting new cycle =====");
                }
                Ok(IterationEnd::Exit(exit)) => break exit,
                Err(err) => {
                    let faults = self.record_fault();
                    error!(error = %err, faults, "[CYCLE] error in auto-swap cycle");
                    if self.max_consecutive_faults.is_some_and(|max| faults >= max) {
                        break CycleExit::FaultLimit(faults);
                    }
                    info!(cooldown = ?self.retry_cooldown, "[CYCLE] waiting before retrying");
                    if self.countdown.wait(self.retry_cooldown, &stop).await == WaitOutcome::Cancelled {
                        break CycleExit::Stopped;
                    }
                }
            }
        };

        self.state.send_modify(|state| {
            state.running = false;
            state.stop_requested = false;
            state.step = CycleStep::Idle;
            state.config = None;
        });
        match &exit {
            CycleExit::Stopped => info!("[CYCLE] auto-swap stopped"),
            other => warn!(reason = ?other, "[CYCLE] auto-swap stopped"),
        }
        exit
    }

    async fn run_iteration(&self, config: &CycleConfig, stop: &StopSignal) -> IterationEnd {
        let network = self.staker.network();

        self.set_step(CycleStep::Depositing);
        info!(
            "[CYCLE] ----- converting {} to {} -----",
            network.native_symbol, network.share_symbol
        );
        let deposit = self.staker.deposit(&config.deposit_amount).await;
        if !deposit.success {
            warn!("[CYCLE] stopping auto-swap due to deposit failure");
            return IterationEnd::Exit(CycleExit::DepositFailed(
                deposit.failure_reason.unwrap_or_default(),
            ));
        }

        self.set_step(CycleStep::WaitingAfterDeposit);
        info!(
            "[CYCLE] waiting {} minutes before converting back to {}",
            config.post_deposit_delay_minutes, network.native_symbol
        );
        if self
            .countdown
            .wait_minutes(config.post_deposit_delay_minutes, stop)
            .await
            == WaitOutcome::Cancelled
        {
            return IterationEnd::Exit(CycleExit::Stopped);
        }

        self.set_step(CycleStep::Redeeming);
        info!(
            "[CYCLE] ----- converting {} to {} -----",
            network.share_symbol, network.native_symbol
        );
        let redeem = self.staker.redeem(&config.redeem_amount).await;
        if !redeem.success {
            warn!("[CYCLE] stopping auto-swap due to redeem failure");
            return IterationEnd::Exit(CycleExit::RedeemFailed(
                redeem.failure_reason.unwrap_or_default(),
            ));
        }

        self.set_step(CycleStep::WaitingAfterRedeem);
        info!(
            "[CYCLE] waiting {} minutes before starting next cycle",
            config.post_redeem_delay_minutes
        );
        if self
            .countdown
            .wait_minutes(config.post_redeem_delay_minutes, stop)
            .await
            == WaitOutcome::Cancelled
        {
            return IterationEnd::Exit(CycleExit::Stopped);
        }

        IterationEnd::Continue
    }

    fn set_step(&self, step: CycleStep) {
        self.state.send_modify(|state| state.step = step);
    }

    fn record_fault(&self) -> u32 {
        let mut faults = 0;
        self.state.send_modify(|state| {
            state.consecutive_faults += 1;
            faults = state.consecutive_faults;
        });
        faults
    }
}
