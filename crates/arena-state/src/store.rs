//! StateStore — redb-backed persistence for the bot arena.
//!
//! Provides typed CRUD operations over users and bots, and the append-only
//! game ledger with its derived score queries. All values are
//! JSON-serialized into redb's `&[u8]` value columns. The store supports
//! both on-disk and in-memory backends (the latter for testing).

use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::debug;

use arena_core::BotId;

use crate::error::{StateError, StateResult};
use crate::tables::*;
use crate::types::*;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Thread-safe state store backed by redb.
#[derive(Clone)]
pub struct StateStore {
    db: Arc<Database>,
}

impl StateStore {
    /// Open (or create) a persistent state store at the given path.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "state store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory state store (for testing).
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory state store opened");
        Ok(store)
    }

    /// Create all tables if they don't exist yet.
    fn ensure_tables(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(USERS).map_err(map_err!(Table))?;
        txn.open_table(BOTS).map_err(map_err!(Table))?;
        txn.open_table(GAMES).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    // ── Users ──────────────────────────────────────────────────────

    /// Insert or update a user account.
    pub fn put_user(&self, user: &UserInfo) -> StateResult<()> {
        let value = serde_json::to_vec(user).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(USERS).map_err(map_err!(Table))?;
            table
                .insert(user.id.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(user = %user.id, "user stored");
        Ok(())
    }

    /// Get a user by id.
    pub fn get_user(&self, user_id: &str) -> StateResult<Option<UserInfo>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(USERS).map_err(map_err!(Table))?;
        match table.get(user_id).map_err(map_err!(Read))? {
            Some(guard) => {
                let user: UserInfo =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// List all user accounts.
    pub fn list_users(&self) -> StateResult<Vec<UserInfo>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(USERS).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let user: UserInfo =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            results.push(user);
        }
        Ok(results)
    }

    // ── Bots ───────────────────────────────────────────────────────

    /// Insert or update a bot.
    pub fn put_bot(&self, bot: &BotInfo) -> StateResult<()> {
        let value = serde_json::to_vec(bot).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(BOTS).map_err(map_err!(Table))?;
            table
                .insert(bot.id.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(bot = %bot.id, "bot stored");
        Ok(())
    }

    /// Get a bot by id.
    pub fn get_bot(&self, bot_id: &str) -> StateResult<Option<BotInfo>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(BOTS).map_err(map_err!(Table))?;
        match table.get(bot_id).map_err(map_err!(Read))? {
            Some(guard) => {
                let bot: BotInfo =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(bot))
            }
            None => Ok(None),
        }
    }

    /// List all bots.
    pub fn list_bots(&self) -> StateResult<Vec<BotInfo>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(BOTS).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let bot: BotInfo =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            results.push(bot);
        }
        Ok(results)
    }

    /// List all bots owned by a user.
    pub fn list_bots_for_user(&self, user_id: &str) -> StateResult<Vec<BotInfo>> {
        Ok(self
            .list_bots()?
            .into_iter()
            .filter(|b| b.user_id == user_id)
            .collect())
    }

    /// List the bots currently entered in the tournament.
    pub fn list_active_bots(&self) -> StateResult<Vec<BotInfo>> {
        Ok(self
            .list_bots()?
            .into_iter()
            .filter(|b| b.is_active)
            .collect())
    }

    // ── Game ledger ────────────────────────────────────────────────

    /// Append a completed game to the ledger.
    ///
    /// `moves` is the codec-encoded digit string. The record's sequence
    /// number is computed inside the write transaction, so concurrent
    /// appends for the same pair cannot collide.
    pub fn record_game(
        &self,
        first: &BotId,
        second: &BotId,
        score: i32,
        moves: &str,
    ) -> StateResult<GameRecord> {
        if !(-1..=1).contains(&score) {
            return Err(StateError::InvalidScore(score));
        }
        if first == second {
            return Err(StateError::SelfPlay(first.clone()));
        }

        let record = GameRecord {
            first: first.clone(),
            second: second.clone(),
            score,
            moves: moves.to_string(),
            created_at: epoch_secs(),
        };
        let value = serde_json::to_vec(&record).map_err(map_err!(Serialize))?;
        let prefix = GameRecord::pair_prefix(first, second);

        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let seq;
        {
            let mut table = txn.open_table(GAMES).map_err(map_err!(Table))?;
            let mut count: u64 = 0;
            for entry in table.iter().map_err(map_err!(Read))? {
                let (key, _) = entry.map_err(map_err!(Read))?;
                if key.value().starts_with(&prefix) {
                    count += 1;
                }
            }
            seq = count;
            table
                .insert(record.table_key(seq).as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%first, %second, score, seq, "game recorded");
        Ok(record)
    }

    /// Count of recorded games with this exact ordered pair.
    pub fn games_played_as_first(&self, first: &BotId, second: &BotId) -> StateResult<u64> {
        let prefix = GameRecord::pair_prefix(first, second);
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(GAMES).map_err(map_err!(Table))?;
        let mut count = 0;
        for entry in table.iter().map_err(map_err!(Read))? {
            let (key, _) = entry.map_err(map_err!(Read))?;
            if key.value().starts_with(&prefix) {
                count += 1;
            }
        }
        Ok(count)
    }

    /// List one ordered pair's games, oldest first.
    pub fn list_games_for_pair(
        &self,
        first: &BotId,
        second: &BotId,
    ) -> StateResult<Vec<GameRecord>> {
        let prefix = GameRecord::pair_prefix(first, second);
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(GAMES).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        // Key iteration is ordered and seqs are zero-padded, so this is
        // already oldest-first.
        for entry in table.iter().map_err(map_err!(Read))? {
            let (key, value) = entry.map_err(map_err!(Read))?;
            if key.value().starts_with(&prefix) {
                let record: GameRecord =
                    serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
                results.push(record);
            }
        }
        Ok(results)
    }

    /// List every recorded game.
    pub fn list_games(&self) -> StateResult<Vec<GameRecord>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(GAMES).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let record: GameRecord =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            results.push(record);
        }
        Ok(results)
    }

    /// A bot's aggregate score.
    ///
    /// Sums `score` over games the bot played first and `-score` over games
    /// it played second, so a win is +1 and a loss -1 for the bot no matter
    /// which side it played. One read transaction, so the total reflects a
    /// single consistent snapshot of the ledger.
    pub fn score(&self, bot: &BotId) -> StateResult<i64> {
        let mut total = 0i64;
        for record in self.list_games()? {
            if record.first == *bot {
                total += record.score as i64;
            } else if record.second == *bot {
                total -= record.score as i64;
            }
        }
        Ok(total)
    }

    /// Per-bot standings over the whole ledger, best score first.
    pub fn standings(&self) -> StateResult<Vec<Standing>> {
        use std::collections::HashMap;

        let bots = self.list_bots()?;
        let index: HashMap<BotId, usize> = bots
            .iter()
            .enumerate()
            .map(|(i, b)| (b.id.clone(), i))
            .collect();
        let mut rows: Vec<Standing> = bots
            .iter()
            .map(|b| Standing {
                bot: b.id.clone(),
                name: b.name.clone(),
                games_played: 0,
                score: 0,
            })
            .collect();

        for record in self.list_games()? {
            if let Some(&i) = index.get(&record.first) {
                rows[i].games_played += 1;
                rows[i].score += record.score as i64;
            }
            if let Some(&i) = index.get(&record.second) {
                rows[i].games_played += 1;
                rows[i].score -= record.score as i64;
            }
        }

        rows.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.bot.cmp(&b.bot)));
        Ok(rows)
    }
}

/// Current Unix epoch in seconds.
fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
