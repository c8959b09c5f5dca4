//! Deterministic virtual-time task scheduler.
//!
//! # Responsibility
//! - Hold delayed tasks keyed by virtual deadline.
//! - Hand out timer handles that can be cancelled before they fire.
//!
//! # Invariants
//! - Virtual time never moves backwards.
//! - Due tasks are released in deadline order; ties keep scheduling order.
//! - Cancelling a fired or unknown handle is a no-op.

use std::collections::BTreeMap;
use std::time::Duration;

/// Opaque handle returned for every scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(u64);

/// Single-threaded scheduler driven by an explicit virtual clock.
///
/// Nothing runs on its own: the host moves time forward and drains due
/// tasks with [`Scheduler::pop_due`].
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_seq: u64,
    queue: BTreeMap<(Duration, u64), T>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            queue: BTreeMap::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time, measured from scheduler creation.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedules `task` to become due `delay` after the current time.
    pub fn schedule(&mut self, delay: Duration, task: T) -> TimerHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        let deadline = self.now.saturating_add(delay);
        self.queue.insert((deadline, seq), task);
        TimerHandle(seq)
    }

    /// Cancels a pending task.
    ///
    /// Returns `true` only when a pending task was removed.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let key = self
            .queue
            .keys()
            .find(|(_, seq)| *seq == handle.0)
            .copied();
        match key {
            Some(key) => self.queue.remove(&key).is_some(),
            None => false,
        }
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.queue.keys().any(|(_, seq)| *seq == handle.0)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Pops the earliest task due at or before `until`.
    ///
    /// The clock jumps to the popped task's deadline, so tasks scheduled
    /// while handling it are relative to that instant.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerHandle, T)> {
        let (&(deadline, seq), _) = self.queue.first_key_value()?;
        if deadline > until {
            return None;
        }
        let task = self.queue.remove(&(deadline, seq))?;
        self.now = self.now.max(deadline);
        Some((TimerHandle(seq), task))
    }

    /// Moves the clock forward without running anything.
    pub fn advance_clock(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}
