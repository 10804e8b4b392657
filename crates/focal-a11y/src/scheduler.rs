//! Deferred work on a virtual clock
//!
//! Everything runs on one thread. Components schedule tasks with a delay
//! and the owner advances the clock. Tasks with equal deadlines fire in the
//! order they were scheduled.
//!
//! The clock stops at each deadline in turn. An owner whose tasks schedule
//! follow-ups drives the clock with `next_due`, so a follow-up is measured
//! from the deadline that produced it and can still fire in the same window:
//!
//! ```ignore
//! let until = timers.now() + elapsed;
//! while let Some(task) = timers.next_due(until) {
//!     // may call timers.schedule(..)
//! }
//! ```

use std::time::Duration;

/// Handle for cancelling a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Timer<T> {
    id: TimerId,
    deadline: Duration,
    task: T,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    timers: Vec<Timer<T>>,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            timers: Vec::new(),
        }
    }

    /// Time elapsed since the scheduler was created
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            deadline: self.now + delay,
            task,
        });
        id
    }

    /// Cancel a pending task, returning it if it had not fired
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let index = self.timers.iter().position(|t| t.id == id)?;
        Some(self.timers.remove(index).task)
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.iter().map(|t| t.deadline).min()
    }

    /// Take the earliest task due at or before `until`, moving the clock to
    /// its deadline. When nothing is due the clock moves to `until` and
    /// `None` is returned.
    pub fn next_due(&mut self, until: Duration) -> Option<T> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= until)
            .min_by_key(|(_, t)| (t.deadline, t.id))
            .map(|(i, _)| i);
        match index {
            Some(index) => {
                let timer = self.timers.remove(index);
                self.now = self.now.max(timer.deadline);
                Some(timer.task)
            }
            None => {
                self.now = self.now.max(until);
                None
            }
        }
    }

    /// Move the clock forward and take every task that came due, for
    /// owners whose tasks never reschedule
    pub fn advance(&mut self, elapsed: Duration) -> Vec<T> {
        let until = self.now + elapsed;
        std::iter::from_fn(|| self.next_due(until)).collect()
    }

    /// Take every pending task regardless of deadline, in firing order
    pub fn drain(&mut self) -> Vec<T> {
        let mut all = std::mem::take(&mut self.timers);
        all.sort_by_key(|t| (t.deadline, t.id));
        all.into_iter().map(|t| t.task).collect()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
