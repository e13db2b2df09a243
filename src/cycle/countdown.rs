//! Cancellable delay with periodic progress ticks.

use super::types::StopSignal;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep_until};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Completed,
    Cancelled,
}

/// Timer used for the configured delays.
///
/// The stop flag is polled once per tick, so cancellation takes at most one
/// tick interval.
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    minute: Duration,
    tick: Duration,
}

impl Countdown {
    pub fn new(tick: Duration) -> Self {
        Self::with_minute(Duration::from_secs(60), tick)
    }

    /// Countdown with a custom length for one delay minute.
    pub fn with_minute(minute: Duration, tick: Duration) -> Self {
        Self { minute, tick }
    }

    pub async fn wait_minutes(&self, minutes: u64, stop: &StopSignal) -> WaitOutcome {
        info!("[WAIT] waiting for {minutes} minutes");
        let minutes = u32::try_from(minutes).unwrap_or(u32::MAX);
        self.wait(self.minute.saturating_mul(minutes), stop).await
    }

    pub async fn wait(&self, total: Duration, stop: &StopSignal) -> WaitOutcome {
        let deadline = Instant::now() + total;
        let done = sleep_until(deadline);
        tokio::pin!(done);
        let mut ticker = interval_at(Instant::now() + self.tick, self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut done => break,
                _ = ticker.tick() => {
                    if stop.is_requested() {
                        info!("[WAIT] operation canceled by user");
                        return WaitOutcome::Cancelled;
                    }
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    info!(remaining_minutes = self.minutes_left(remaining), "[WAIT] remaining time");
                }
            }
        }

        if stop.is_requested() {
            info!("[WAIT] operation canceled by user");
            return WaitOutcome::Cancelled;
        }
        info!("[WAIT] wait completed");
        WaitOutcome::Completed
    }

    fn minutes_left(&self, remaining: Duration) -> u64 {
        (remaining.as_secs_f64() / self.minute.as_secs_f64()).ceil() as u64
    }
}
