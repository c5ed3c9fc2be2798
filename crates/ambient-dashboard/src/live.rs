//! Periodic live-telemetry loop of a detail panel
//!
//! The loop runs as one tokio task per mounted panel. Every tick takes the
//! panel lock, checks that the panel is still mounted under the same mount
//! generation, and applies one simulator step to the heating-power metric
//! before releasing the lock. Unmounting flips `mounted` under that same
//! lock, so a tick can never land after unmount even if the task has not
//! observed cancellation yet.

use crate::detail::PanelState;
use crate::simulator::MetricSimulator;
use chrono::Utc;
use parking_lot::Mutex;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Handle to a running live loop
///
/// Dropping the handle stops the loop.
#[derive(Debug)]
pub struct LiveFeed {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl LiveFeed {
    /// Start ticking `panel` every `period`, first tick one period from now
    pub fn start<R>(
        panel: Arc<Mutex<PanelState>>,
        mut simulator: MetricSimulator<R>,
        period: Duration,
    ) -> Self
    where
        R: Rng + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let generation = panel.lock().generation;

        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    () = token.cancelled() => {
                        debug!(generation, "live feed cancelled");
                        break;
                    }
                    _ = interval.tick() => {
                        let mut state = panel.lock();
                        if !state.mounted || state.generation != generation {
                            debug!(generation, "live feed outlived its mount");
                            break;
                        }
                        let step = simulator.step(&mut state.system.metrics.heating_power);
                        state.last_synced = Some(Utc::now());
                        state.ticks += 1;
                        if let Some(step) = step {
                            trace!(
                                system_id = %state.system.id,
                                tick = state.ticks,
                                value = step.value,
                                status = %step.status,
                                trend_flipped = step.trend_flipped,
                                "live tick"
                            );
                        }
                    }
                }
            }
        });

        Self {
            cancel,
            handle: Some(handle),
        }
    }

    /// Whether the loop task is still alive
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stop the loop; idempotent
    pub fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for LiveFeed {
    fn drop(&mut self) {
        self.stop();
    }
}
