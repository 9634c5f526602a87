//! Game execution engine interface.
//!
//! Actually running two bots' code happens in a sandboxed engine outside
//! this workspace. The orchestration layer only needs to ask for one game
//! and get a [`Verdict`] back; workers and tests supply the implementation.

use std::future::Future;

use crate::types::{BotId, Verdict};

/// Plays one game between two bots and reports how it went.
///
/// `first` moves first; the verdict's score is from `first`'s perspective.
/// Engine failures that are not game outcomes (sandbox setup, I/O) surface
/// as errors rather than verdicts.
pub trait GameEngine: Send + Sync {
    fn play(
        &self,
        first: &BotId,
        second: &BotId,
    ) -> impl Future<Output = anyhow::Result<Verdict>> + Send;
}
