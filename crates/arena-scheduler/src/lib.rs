//! arena-scheduler — fair game scheduling for the bot arena.
//!
//! Holds one FIFO job queue per tournament round and places jobs so that
//! draining the queues in ascending level order is breadth-first: every
//! ordered pair of bots gets its next game before any pair gets a later
//! one.
//!
//! # Architecture
//!
//! ```text
//! Scheduler
//!   ├── PlayCounts (read-only ledger view: games already on record)
//!   └── levels: RwLock<Vec<JobQueue>>
//!       ├── level 0 — highest priority, one job per pair still owed a game
//!       └── level n — jobs for pairs owed at least n+1 more games
//! ```

pub mod error;
pub mod queue;
pub mod scheduler;

pub use error::{SchedulerError, SchedulerResult};
pub use queue::{Job, JobQueue};
pub use scheduler::{PlayCounts, Scheduler};
