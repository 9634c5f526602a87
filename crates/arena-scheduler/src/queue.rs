//! FIFO job queue for a single scheduling level.

use std::collections::VecDeque;

use arena_core::BotId;
use serde::{Deserialize, Serialize};

/// A request to play one more game for an ordered pair of bots.
///
/// Ephemeral: jobs exist only in queues, are consumed by external workers,
/// and are never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub first: BotId,
    pub second: BotId,
}

impl Job {
    pub fn new(first: impl Into<BotId>, second: impl Into<BotId>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }
}

/// FIFO queue of jobs within one priority level.
#[derive(Debug, Default)]
pub struct JobQueue {
    jobs: VecDeque<Job>,
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, job: Job) {
        self.jobs.push_back(job);
    }

    pub fn pop(&mut self) -> Option<Job> {
        self.jobs.pop_front()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn clear(&mut self) {
        self.jobs.clear();
    }

    /// Copy of the queued jobs, front first (for inspection).
    pub fn snapshot(&self) -> Vec<Job> {
        self.jobs.iter().cloned().collect()
    }
}
