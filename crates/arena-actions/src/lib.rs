//! arena-actions — orchestration for the bot arena.
//!
//! The operations the rest of the system calls: account and bot
//! management, scheduling passes over the ledger, and turning execution
//! verdicts into game records. Everything here is a thin combination of
//! `arena-state`, `arena-scheduler`, and the external `GameEngine`
//! collaborator; the interesting invariants live in those crates.

pub mod actions;
pub mod error;

pub use actions::Actions;
pub use error::{ActionsError, ActionsResult};
