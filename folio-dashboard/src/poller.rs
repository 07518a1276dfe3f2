//! Health polling loop
//!
//! Polls the health source once immediately and then on every tick. Each poll
//! runs as its own task, so a slow endpoint can produce overlapping requests;
//! whichever resolves last overwrites the metrics, even if it was issued
//! first. Out-of-order completion is accepted and not corrected.
//!
//! Failures are logged and leave the previous [`DisplayMetrics`] in place.
//! After [`PollingClient::stop`] returns, no result can touch the state: the
//! `Stopped` phase is checked under the same lock that guards the metrics.

use crate::source::{HealthPayload, HealthSource, PollError};
use crate::state::{new_state, DisplayMetrics, PollerPhase, Shared};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Point-in-time copy of the poller state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerStatus {
    pub metrics: DisplayMetrics,
    pub phase: PollerPhase,
    pub successes: u64,
    pub failures: u64,
}

impl Default for PollerStatus {
    fn default() -> Self {
        Self {
            metrics: DisplayMetrics::default(),
            phase: PollerPhase::Idle,
            successes: 0,
            failures: 0,
        }
    }
}

pub struct PollingClient {
    state: Shared<PollerStatus>,
    task: Option<JoinHandle<()>>,
}

impl PollingClient {
    /// Spawn the polling loop; the first poll fires immediately
    pub fn start(source: Arc<dyn HealthSource>, period: Duration) -> Self {
        let state = new_state(PollerStatus::default());
        let task = tokio::spawn(run_loop(source, period, state.clone()));
        info!(period_secs = period.as_secs_f64(), "health poller started");
        Self { state, task: Some(task) }
    }

    pub fn status(&self) -> PollerStatus {
        self.state.lock().clone()
    }

    #[cfg(test)]
    pub fn metrics(&self) -> DisplayMetrics {
        self.state.lock().metrics.clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Release the timer and discard any in-flight result. Idempotent.
    pub fn stop(&mut self) {
        let Some(task) = self.task.take() else { return };
        self.state.lock().phase = PollerPhase::Stopped;
        // dropping the loop also drops its JoinSet, which aborts in-flight polls
        task.abort();
        info!("health poller stopped");
    }
}

impl Drop for PollingClient {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_loop(source: Arc<dyn HealthSource>, period: Duration, state: Shared<PollerStatus>) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let source = source.clone();
                let state = state.clone();
                in_flight.spawn(async move {
                    let outcome = source.fetch().await;
                    apply_outcome(&state, outcome);
                });
            }
            Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
        }
    }
}

fn apply_outcome(state: &Shared<PollerStatus>, outcome: Result<HealthPayload, PollError>) {
    let failure = {
        let mut st = state.lock();
        if st.phase == PollerPhase::Stopped {
            debug!("discarding poll result after teardown");
            return;
        }
        match outcome {
            Ok(payload) => {
                st.metrics = payload.into();
                st.phase = PollerPhase::Live;
                st.successes += 1;
                None
            }
            Err(e) => {
                st.failures += 1;
                Some(e)
            }
        }
    };

    // log outside the lock
    if let Some(e) = failure {
        warn!("Monitoring error: {e}");
    }
}
