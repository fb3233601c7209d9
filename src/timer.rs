//! Owned recurring timers.
//!
//! A [`TimerHandle`] runs a tokio task that sends a message on every tick
//! and is aborted when the handle is dropped. [`TimerSet`] keys handles so
//! restarting a timer drops (and therefore cancels) the previous one before
//! the new one can tick.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Shortest period a timer will run at.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// A recurring timer that stops when dropped.
///
/// The first tick fires immediately, matching "run now, then every
/// `period`" semantics.
#[derive(Debug)]
pub struct TimerHandle {
    task: JoinHandle<()>,
    period: Duration,
}

impl TimerHandle {
    /// Spawns a timer sending `make()` to `tx` every `period`.
    ///
    /// The task exits on its own once the receiver is gone.
    ///
    /// Must be called from within a tokio runtime.
    pub fn every<M, F>(period: Duration, tx: UnboundedSender<M>, mut make: F) -> Self
    where
        M: Send + 'static,
        F: FnMut() -> M + Send + 'static,
    {
        // interval() panics on a zero period
        let period = period.max(MIN_PERIOD);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send(make()).is_err() {
                    break;
                }
            }
        });
        Self { task, period }
    }

    /// Tick period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Whether the underlying task has stopped.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Timers keyed by owner, at most one per key.
#[derive(Debug)]
pub struct TimerSet<K> {
    timers: HashMap<K, TimerHandle>,
}

impl<K> Default for TimerSet<K> {
    fn default() -> Self {
        Self {
            timers: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Debug> TimerSet<K> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `handle` under `key`, cancelling any timer it replaces.
    ///
    /// Returns the period of the replaced timer.
    pub fn start(&mut self, key: K, handle: TimerHandle) -> Option<Duration> {
        tracing::debug!(?key, period = ?handle.period(), "timer started");
        self.timers.insert(key, handle).map(|old| old.period())
    }

    /// Cancels the timer under `key`. Returns whether one was running.
    pub fn cancel(&mut self, key: &K) -> bool {
        let removed = self.timers.remove(key).is_some();
        if removed {
            tracing::debug!(?key, "timer cancelled");
        }
        removed
    }

    /// Cancels every timer.
    pub fn clear(&mut self) {
        self.timers.clear();
    }

    /// Whether a timer is installed under `key`.
    pub fn is_active(&self, key: &K) -> bool {
        self.timers.contains_key(key)
    }

    /// Period of the timer under `key`.
    pub fn period(&self, key: &K) -> Option<Duration> {
        self.timers.get(key).map(TimerHandle::period)
    }

    /// Number of installed timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Whether no timers are installed.
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
