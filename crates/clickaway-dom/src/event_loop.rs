//! Event Loop
//!
//! Macrotask timers driven by a virtual clock. Nothing runs until the owner
//! drains the loop, so a zero-delay timer always runs after the current
//! dispatch has finished.

use std::fmt;

/// Scheduled work
pub type Task = Box<dyn FnOnce()>;

/// Timer handle returned by `set_timeout`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u32);

struct Timer {
    id: TimerId,
    due_at: u64,
    task: Task,
}

/// Timer queue with a virtual millisecond clock
#[derive(Default)]
pub struct EventLoop {
    timers: Vec<Timer>,
    next_timer_id: u32,
    current_time: u64,
}

impl EventLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a task `delay_ms` after the current virtual time
    pub fn set_timeout(&mut self, task: Task, delay_ms: u64) -> TimerId {
        let id = TimerId(self.next_timer_id);
        self.next_timer_id += 1;
        self.timers.push(Timer {
            id,
            due_at: self.current_time + delay_ms,
            task,
        });
        id
    }

    /// Cancel a pending timer
    pub fn clear_timeout(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() < before
    }

    /// Advance the virtual clock
    pub fn advance(&mut self, delta_ms: u64) {
        self.current_time += delta_ms;
    }

    pub fn now(&self) -> u64 {
        self.current_time
    }

    /// Remove and return the next due task: earliest deadline first, then
    /// scheduling order.
    pub fn pop_due(&mut self) -> Option<Task> {
        let now = self.current_time;
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_at <= now)
            .min_by_key(|(_, t)| (t.due_at, t.id))
            .map(|(i, _)| i)?;
        Some(self.timers.remove(index).task)
    }

    /// Number of scheduled timers, due or not
    pub fn pending(&self) -> usize {
        self.timers.len()
    }
}

impl fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLoop")
            .field("pending", &self.timers.len())
            .field("current_time", &self.current_time)
            .finish()
    }
}
