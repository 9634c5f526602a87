//! redb table definitions for the arena state store.
//!
//! Each table uses `&str` keys and `&[u8]` values (JSON-serialized domain
//! types). Game keys follow `{first}:{second}:{seq}` so that one ordered
//! pair's games form a contiguous, ordered key range. Bot and user ids are
//! generated alphanumeric tokens and never contain `:`.

use redb::TableDefinition;

/// User accounts keyed by `{user_id}`.
pub const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Bots keyed by `{bot_id}`.
pub const BOTS: TableDefinition<&str, &[u8]> = TableDefinition::new("bots");

/// Game records keyed by `{first}:{second}:{seq:08}`.
pub const GAMES: TableDefinition<&str, &[u8]> = TableDefinition::new("games");
