//! Domain types shared across the arena crates.
//!
//! Bots and users live in the state store and are referenced everywhere
//! else by opaque string ids. A `Verdict` is what the external execution
//! engine hands back after attempting one game.

use serde::{Deserialize, Serialize};

/// Unique identifier for a bot.
pub type BotId = String;

/// Unique identifier for a user account.
pub type UserId = String;

/// How a game attempt ended, as reported by the execution engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictKind {
    /// The game ran to completion and produced a score.
    Complete,
    /// A bot exceeded its move time budget.
    Timeout,
    /// A bot raised while choosing a move.
    Exception,
    /// A bot returned a move that is not legal in the current position.
    InvalidMove,
}

/// Outcome of one game attempt between two bots.
///
/// `score` is always from the first mover's perspective: 1 means the first
/// bot won, -1 the second, 0 a draw. Only `Complete` verdicts carry a
/// meaningful score; anything else is diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub kind: VerdictKind,
    pub score: i32,
    /// Board positions claimed, in play order.
    pub moves: Vec<u8>,
    /// Failure diagnostics (e.g. a traceback) for unsuccessful attempts.
    pub trace: Option<String>,
}

impl Verdict {
    /// A verdict for a cleanly finished game.
    pub fn complete(score: i32, moves: Vec<u8>) -> Self {
        Self {
            kind: VerdictKind::Complete,
            score,
            moves,
            trace: None,
        }
    }

    /// A verdict for a game that did not finish.
    pub fn failed(kind: VerdictKind, trace: impl Into<String>) -> Self {
        Self {
            kind,
            score: 0,
            moves: Vec::new(),
            trace: Some(trace.into()),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.kind == VerdictKind::Complete
    }
}
