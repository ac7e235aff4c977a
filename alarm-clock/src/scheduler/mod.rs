//! Due-alarm scheduler.
//!
//! [`AlarmScheduler`] is the periodic poller of the alarm clock: on every tick
//! it asks the shared queue for entries whose fire time has been reached, pops
//! them and hands each to a [`Notifier`].
//!
//! # Delivery
//! Due entries are popped under one queue lock
//! ([`SharedQueue::pop_due`](alarm_queue::SharedQueue::pop_due)), so an alarm
//! is notified at most once even if several pollers share the queue.  An
//! alarm whose time passed while the process was suspended fires on the next
//! tick instead of being missed.
//!
//! # Example
//! ```rust,ignore
//! let scheduler = AlarmScheduler::new(queue.clone(), LogNotifier, config.poll_interval);
//! scheduler.run(async { let _ = tokio::signal::ctrl_c().await; }).await;
//! ```

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::alarm::Alarm;
use crate::AlarmQueue;

// ── Notifier ──────────────────────────────────────────────────────────────────

/// Receives every alarm that fires.
pub trait Notifier: Send + Sync {
    fn notify(&self, alarm: &Alarm);
}

/// Default notifier: emits an `info` event per alarm.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, alarm: &Alarm) {
        info!(
            fire_at_ms = alarm.fire_at_ms(),
            local_time = %alarm.local_time(),
            "Alarm activated."
        );
    }
}

impl<F> Notifier for F
where
    F: Fn(&Alarm) + Send + Sync,
{
    fn notify(&self, alarm: &Alarm) {
        self(alarm)
    }
}

// ── AlarmScheduler ────────────────────────────────────────────────────────────

/// Polls an [`AlarmQueue`] and fires due alarms.
pub struct AlarmScheduler<N> {
    queue: AlarmQueue,
    notifier: N,
    poll_interval: Duration,
}

impl<N: Notifier> AlarmScheduler<N> {
    pub fn new(queue: AlarmQueue, notifier: N, poll_interval: Duration) -> Self {
        Self {
            queue,
            notifier,
            poll_interval,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Pops and notifies every alarm due at `now_ms`, oldest first.
    ///
    /// An empty queue is simply "nothing to do".
    pub fn check_alarms(&self, now_ms: i64) -> Vec<Alarm> {
        let fired: Vec<Alarm> = self
            .queue
            .pop_due(now_ms)
            .into_iter()
            .map(|entry| entry.into_value())
            .collect();

        for alarm in &fired {
            self.notifier.notify(alarm);
        }
        if !fired.is_empty() {
            debug!(
                fired = fired.len(),
                remaining = self.queue.len(),
                "Due alarms processed"
            );
        }
        fired
    }

    /// Runs the poll loop against the system clock until `shutdown`
    /// completes.  Returns the number of alarms fired.
    pub async fn run<F>(&self, shutdown: F) -> usize
    where
        F: Future<Output = ()>,
    {
        self.run_with_clock(shutdown, || Utc::now().timestamp_millis())
            .await
    }

    /// Like [`run`](Self::run) but reads "now" from `clock` (ms since the
    /// epoch).
    pub async fn run_with_clock<F, C>(&self, shutdown: F, clock: C) -> usize
    where
        F: Future<Output = ()>,
        C: Fn() -> i64,
    {
        info!(
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            pending = self.queue.len(),
            "Alarm scheduler started"
        );

        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut fired = 0usize;
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    fired += self.check_alarms(clock()).len();
                }
            }
        }

        info!(fired, pending = self.queue.len(), "Alarm scheduler stopped");
        fired
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
