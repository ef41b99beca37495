//! Live refresh scheduler.
//!
//! Responsibilities:
//! - Track the STOPPED / ARMED / SUSPENDED state from `is_live`, the
//!   interval and whether a free-text query is active.
//! - Own the periodic timer task and restart it when the interval changes.
//!
//! Does NOT handle:
//! - Performing the fetch (the timer only sends [`Action::Tick`]).
//! - Backing off after failed ticks; every tick fires regardless of the
//!   outcome of the previous one.
//!
//! Invariants:
//! - At most one timer task is alive, and only while ARMED.
//! - Ticks carry the generation of the timer that sent them, so ticks queued
//!   by a cancelled timer can be told apart from current ones.
//! - Dropping the scheduler cancels its timer.

use std::time::Duration;
use tokio::sync::mpsc::{Sender, error::TrySendError};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info};

use crate::action::Action;

/// Scheduler state as seen by the read model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Live mode off or interval zero. No timer.
    Stopped,
    /// Timer running.
    Armed,
    /// A free-text query is active. No ticks; settings are kept.
    Suspended,
}

#[derive(Debug)]
struct Timer {
    generation: u64,
    period: Duration,
    cancel: CancellationToken,
}

/// Cancellable periodic re-fetch trigger.
#[derive(Debug)]
pub struct LiveScheduler {
    is_live: bool,
    interval: Duration,
    query_active: bool,
    timer: Option<Timer>,
    generation: u64,
    tx: Sender<Action>,
    shutdown: CancellationToken,
    tasks: TaskTracker,
}

impl LiveScheduler {
    /// Create a stopped scheduler that sends ticks on `tx`.
    ///
    /// Timer tasks are spawned on `tasks` and end when `shutdown` is cancelled.
    pub fn new(
        interval: Duration,
        tx: Sender<Action>,
        shutdown: CancellationToken,
        tasks: TaskTracker,
    ) -> Self {
        Self {
            is_live: false,
            interval,
            query_active: false,
            timer: None,
            generation: 0,
            tx,
            shutdown,
            tasks,
        }
    }

    pub fn state(&self) -> SchedulerState {
        if self.query_active {
            SchedulerState::Suspended
        } else if self.is_live && !self.interval.is_zero() {
            SchedulerState::Armed
        } else {
            SchedulerState::Stopped
        }
    }

    pub fn is_live(&self) -> bool {
        self.is_live
    }

    /// Configured period; zero means off.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_live(&mut self, live: bool) {
        self.transition(|s| s.is_live = live);
    }

    /// Change the period. While ARMED this restarts the timer.
    pub fn set_interval(&mut self, interval: Duration) {
        self.transition(|s| s.interval = interval);
    }

    /// Suspend while a free-text query is active and resume once it clears.
    pub fn set_query_active(&mut self, active: bool) {
        self.transition(|s| s.query_active = active);
    }

    /// Whether a tick from timer `generation` should trigger a fetch.
    pub fn accepts_tick(&self, generation: u64) -> bool {
        self.timer
            .as_ref()
            .is_some_and(|t| t.generation == generation)
    }

    /// Cancel the timer and turn live mode off.
    pub fn stop(&mut self) {
        self.set_live(false);
    }

    fn transition(&mut self, change: impl FnOnce(&mut Self)) {
        let before = self.state();
        change(self);
        let after = self.state();
        if before != after {
            info!(from = ?before, to = ?after, interval_secs = self.interval.as_secs(), "Live refresh state changed");
        }
        self.reconcile();
    }

    fn reconcile(&mut self) {
        let wanted = self.state() == SchedulerState::Armed;
        match &self.timer {
            Some(timer) if wanted && timer.period == self.interval => {}
            Some(_) => {
                self.cancel_timer();
                if wanted {
                    self.start_timer();
                }
            }
            None if wanted => self.start_timer(),
            None => {}
        }
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            debug!(generation = timer.generation, "Cancelling live refresh timer");
            timer.cancel.cancel();
        }
    }

    fn start_timer(&mut self) {
        self.generation += 1;
        let generation = self.generation;
        let period = self.interval;
        let cancel = self.shutdown.child_token();
        let tx = self.tx.clone();

        self.timer = Some(Timer {
            generation,
            period,
            cancel: cancel.clone(),
        });
        debug!(generation, period_secs = period.as_secs(), "Starting live refresh timer");

        self.tasks.spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => match tx.try_send(Action::Tick { generation }) {
                        Ok(()) => {}
                        Err(TrySendError::Full(_)) => {
                            // The next tick will try again
                            debug!(generation, "Action channel full, dropping live tick");
                        }
                        Err(TrySendError::Closed(_)) => break,
                    },
                }
            }
        });
    }
}

impl Drop for LiveScheduler {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
