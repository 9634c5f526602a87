//! Scheduler error types.

use thiserror::Error;

/// Errors that can occur during scheduling operations.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("queue level {level} out of range (0..{num_rounds})")]
    LevelOutOfRange { level: usize, num_rounds: usize },

    #[error("state store error: {0}")]
    State(#[from] arena_state::StateError),
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;
