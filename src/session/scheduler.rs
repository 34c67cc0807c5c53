//! Cooperative band scheduler.
//!
//! Continuations are queued in FIFO order and run one at a time, so bands
//! execute strictly in the order they were scheduled and never overlap.

use std::collections::VecDeque;

/// A queued band continuation, tagged with the run generation it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledBand {
    pub generation: u64,
    pub band: u32,
}

/// FIFO of pending band continuations.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    queue: VecDeque<ScheduledBand>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a continuation to run after everything already queued.
    pub fn schedule(&mut self, task: ScheduledBand) {
        self.queue.push_back(task);
    }

    /// Take the next continuation, if any.
    pub fn next_task(&mut self) -> Option<ScheduledBand> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
