//! Orchestration error types.

use arena_core::{BotId, CodecError, UserId, VerdictKind};
use thiserror::Error;

/// Errors that can occur in the orchestration layer.
#[derive(Debug, Error)]
pub enum ActionsError {
    /// The execution engine reported a game that did not finish cleanly.
    /// Nothing is recorded; the caller decides whether to reschedule.
    #[error("game did not complete: {kind:?}")]
    IncompleteExecution {
        kind: VerdictKind,
        trace: Option<String>,
    },

    #[error("user not found: {0}")]
    UserNotFound(UserId),

    #[error("bot not found: {0}")]
    BotNotFound(BotId),

    #[error("move codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("state store error: {0}")]
    State(#[from] arena_state::StateError),

    #[error("scheduler error: {0}")]
    Scheduler(#[from] arena_scheduler::SchedulerError),

    #[error("engine error: {0}")]
    Engine(#[from] anyhow::Error),
}

pub type ActionsResult<T> = Result<T, ActionsError>;
