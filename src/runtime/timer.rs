//! Owned, cancellable one-shot timers.
//!
//! The host loop calls [`TimerQueue::run_due`] on every tick. Callbacks run
//! outside the queue lock, so a callback may schedule or cancel timers.
//! Dropping a [`TimerHandle`] does not cancel the timer; owners cancel
//! explicitly on teardown.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;

use super::clock::Clock;

type TimerCallback = Box<dyn FnOnce() + Send>;

struct PendingTimer {
    id: u64,
    deadline: Duration,
    callback: TimerCallback,
}

#[derive(Default)]
struct QueueState {
    next_id: u64,
    pending: Vec<PendingTimer>,
}

/// Queue of pending timers driven by a [`Clock`]. Clones share the queue.
#[derive(Clone)]
pub struct TimerQueue {
    clock: Arc<dyn Clock>,
    state: Arc<Mutex<QueueState>>,
}

impl TimerQueue {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: Arc::new(Mutex::new(QueueState::default())),
        }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Schedule `callback` to run once `delay` has elapsed.
    pub fn schedule<F>(&self, delay: Duration, callback: F) -> TimerHandle
    where
        F: FnOnce() + Send + 'static,
    {
        let deadline = self.clock.now() + delay;
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.pending.push(PendingTimer {
            id,
            deadline,
            callback: Box::new(callback),
        });

        TimerHandle {
            id,
            state: Arc::downgrade(&self.state),
        }
    }

    /// Fire every timer whose deadline has passed.
    ///
    /// Timers fire in deadline order, ties in scheduling order. Each timer is
    /// taken off the queue just before it runs, so a callback that cancels a
    /// later due timer stops it. Timers scheduled by a callback wait for the
    /// next call. Returns the number of callbacks run.
    pub fn run_due(&self) -> usize {
        let now = self.clock.now();
        let horizon = self.state.lock().next_id;
        let mut fired = 0;
        while let Some(timer) = self.pop_due(now, horizon) {
            (timer.callback)();
            fired += 1;
        }
        fired
    }

    fn pop_due(&self, now: Duration, horizon: u64) -> Option<PendingTimer> {
        let mut state = self.state.lock();
        let index = state
            .pending
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.deadline <= now && timer.id < horizon)
            .min_by_key(|(_, timer)| (timer.deadline, timer.id))
            .map(|(index, _)| index)?;
        Some(state.pending.remove(index))
    }

    pub fn pending_count(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.state.lock().pending.iter().map(|t| t.deadline).min()
    }
}

/// Handle to one scheduled timer.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    id: u64,
    state: Weak<Mutex<QueueState>>,
}

impl TimerHandle {
    /// Cancel the timer. Returns true if it was still pending.
    pub fn cancel(&self) -> bool {
        let Some(state) = self.state.upgrade() else {
            return false;
        };
        let mut state = state.lock();
        let before = state.pending.len();
        state.pending.retain(|timer| timer.id != self.id);
        state.pending.len() != before
    }

    pub fn is_pending(&self) -> bool {
        self.state
            .upgrade()
            .map(|state| state.lock().pending.iter().any(|t| t.id == self.id))
            .unwrap_or(false)
    }
}
