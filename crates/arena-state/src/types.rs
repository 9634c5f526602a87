//! Domain types persisted by the arena state store.

use arena_core::{BotId, UserId};
use serde::{Deserialize, Serialize};

// ── User ──────────────────────────────────────────────────────────

/// A user account that owns bots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: UserId,
    pub email: String,
    pub name: String,
    /// Token presented by the user's tooling when submitting bots.
    pub api_token: String,
    pub is_active: bool,
    /// The one bot currently playing for this user, if any.
    pub active_bot: Option<BotId>,
    /// Unix timestamp (seconds) when the account was created.
    pub created_at: u64,
}

// ── Bot ───────────────────────────────────────────────────────────

/// A submitted bot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BotInfo {
    pub id: BotId,
    pub user_id: UserId,
    pub name: String,
    /// The bot's source code, executed by the external engine.
    pub code: String,
    /// Whether this bot is the user's active entrant.
    pub is_active: bool,
    /// Unix timestamp (seconds) when the bot was submitted.
    pub created_at: u64,
}

// ── Game ──────────────────────────────────────────────────────────

/// One completed game, recorded exactly once and never mutated.
///
/// `score` is from `first`'s perspective: 1 = `first` won, -1 = `second`
/// won, 0 = draw. `moves` is the codec-encoded digit string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameRecord {
    pub first: BotId,
    pub second: BotId,
    pub score: i32,
    pub moves: String,
    /// Unix timestamp (seconds) when the result was recorded.
    pub created_at: u64,
}

/// Per-bot aggregate standing derived from the game ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Standing {
    pub bot: BotId,
    pub name: String,
    /// Games this bot appears in, either side.
    pub games_played: u64,
    /// Sum of scores from this bot's perspective.
    pub score: i64,
}

impl GameRecord {
    /// Key prefix shared by every game of one ordered pair.
    pub fn pair_prefix(first: &BotId, second: &BotId) -> String {
        format!("{first}:{second}:")
    }

    /// Build the composite key for the games table.
    pub fn table_key(&self, seq: u64) -> String {
        format!("{}:{}:{seq:08}", self.first, self.second)
    }
}
