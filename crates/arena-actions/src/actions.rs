//! The actions façade.
//!
//! One instance per tournament process, sharing the state store and the
//! scheduler with the API layer. Account actions keep the registry
//! invariant that a user has at most one active bot; gameplay actions
//! translate engine verdicts into ledger records; scheduling actions run
//! passes over the set of active bots.

use std::sync::Arc;

use rand::Rng;
use rand::distributions::Alphanumeric;
use tracing::{debug, info};

use arena_core::{BotId, GameEngine, UserId, Verdict, encode_moves};
use arena_scheduler::Scheduler;
use arena_state::{BotInfo, GameRecord, Standing, StateStore, UserInfo};

use crate::error::{ActionsError, ActionsResult};

/// Length of user api tokens.
const API_TOKEN_LEN: usize = 12;

/// Length of the random part of generated entity ids.
const ID_LEN: usize = 8;

/// Orchestration over the store, the scheduler, and the external engine.
pub struct Actions {
    store: StateStore,
    scheduler: Arc<Scheduler>,
}

impl Actions {
    pub fn new(store: StateStore, scheduler: Arc<Scheduler>) -> Self {
        Self { store, scheduler }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    // ── Accounts ───────────────────────────────────────────────────

    /// Register a user account.
    pub fn create_user(&self, email: &str, name: &str) -> ActionsResult<UserInfo> {
        let user = UserInfo {
            id: format!("user-{}", new_token(ID_LEN)),
            email: email.to_string(),
            name: name.to_string(),
            api_token: new_token(API_TOKEN_LEN),
            is_active: true,
            active_bot: None,
            created_at: epoch_secs(),
        };
        self.store.put_user(&user)?;
        info!(user = %user.id, %email, "user created");
        Ok(user)
    }

    /// Deactivate a user and withdraw their bots from the tournament.
    pub fn deactivate_user(&self, user_id: &UserId) -> ActionsResult<UserInfo> {
        let mut user = self
            .store
            .get_user(user_id)?
            .ok_or_else(|| ActionsError::UserNotFound(user_id.clone()))?;

        for mut bot in self.store.list_bots_for_user(user_id)? {
            if bot.is_active {
                bot.is_active = false;
                self.store.put_bot(&bot)?;
            }
        }

        user.is_active = false;
        user.active_bot = None;
        self.store.put_user(&user)?;
        info!(user = %user.id, "user deactivated");
        Ok(user)
    }

    /// Submit a new bot. The newest submission becomes the user's entrant.
    pub fn create_bot(&self, user_id: &UserId, name: &str, code: &str) -> ActionsResult<BotInfo> {
        let mut user = self
            .store
            .get_user(user_id)?
            .ok_or_else(|| ActionsError::UserNotFound(user_id.clone()))?;

        // A user fields one bot at a time.
        for mut existing in self.store.list_bots_for_user(user_id)? {
            if existing.is_active {
                existing.is_active = false;
                self.store.put_bot(&existing)?;
            }
        }

        let bot = BotInfo {
            id: format!("bot-{}", new_token(ID_LEN)),
            user_id: user_id.clone(),
            name: name.to_string(),
            code: code.to_string(),
            is_active: true,
            created_at: epoch_secs(),
        };
        self.store.put_bot(&bot)?;

        user.active_bot = Some(bot.id.clone());
        self.store.put_user(&user)?;

        info!(bot = %bot.id, user = %user.id, %name, "bot created");
        Ok(bot)
    }

    /// Make one of a user's bots the active entrant, retiring the others.
    pub fn set_bot_active(&self, bot_id: &BotId) -> ActionsResult<BotInfo> {
        let target = self
            .store
            .get_bot(bot_id)?
            .ok_or_else(|| ActionsError::BotNotFound(bot_id.clone()))?;

        let mut activated = target.clone();
        for mut sibling in self.store.list_bots_for_user(&target.user_id)? {
            let should_be_active = sibling.id == *bot_id;
            if sibling.is_active != should_be_active {
                sibling.is_active = should_be_active;
                self.store.put_bot(&sibling)?;
            }
            if should_be_active {
                activated = sibling;
            }
        }

        if let Some(mut user) = self.store.get_user(&target.user_id)? {
            user.active_bot = Some(bot_id.clone());
            self.store.put_user(&user)?;
        }

        info!(bot = %bot_id, user = %target.user_id, "bot set active");
        Ok(activated)
    }

    // ── Gameplay ───────────────────────────────────────────────────

    /// Run one game through the execution engine and record the result.
    ///
    /// The engine runs outside any lock; only the verdict touches the
    /// ledger.
    pub async fn play_game<E: GameEngine>(
        &self,
        engine: &E,
        first: &BotId,
        second: &BotId,
    ) -> ActionsResult<GameRecord> {
        let verdict = engine.play(first, second).await?;
        self.report_result(first, second, &verdict)
    }

    /// Record an execution verdict in the ledger.
    ///
    /// Verdicts for games that did not finish are rejected and leave the
    /// ledger untouched, so the pair can simply be rescheduled. No retry
    /// happens here.
    pub fn report_result(
        &self,
        first: &BotId,
        second: &BotId,
        verdict: &Verdict,
    ) -> ActionsResult<GameRecord> {
        if !verdict.is_complete() {
            debug!(%first, %second, kind = ?verdict.kind, "discarding incomplete execution");
            return Err(ActionsError::IncompleteExecution {
                kind: verdict.kind,
                trace: verdict.trace.clone(),
            });
        }

        let moves = encode_moves(&verdict.moves)?;
        let record = self.store.record_game(first, second, verdict.score, &moves)?;
        info!(%first, %second, score = record.score, "game result recorded");
        Ok(record)
    }

    // ── Scheduling ─────────────────────────────────────────────────

    /// Queue the unplayed games between one bot and every active bot.
    pub async fn request_games_for_bot(&self, bot_id: &BotId) -> ActionsResult<usize> {
        let bot = self
            .store
            .get_bot(bot_id)?
            .ok_or_else(|| ActionsError::BotNotFound(bot_id.clone()))?;

        let others: Vec<BotId> = self
            .store
            .list_active_bots()?
            .into_iter()
            .map(|b| b.id)
            .filter(|id| *id != bot.id)
            .collect();

        Ok(self.scheduler.schedule_bot(&bot.id, &others).await?)
    }

    /// Queue the unplayed games among all active bots.
    pub async fn request_all_games(&self) -> ActionsResult<usize> {
        let bots: Vec<BotId> = self
            .store
            .list_active_bots()?
            .into_iter()
            .map(|b| b.id)
            .collect();

        Ok(self.scheduler.schedule_all(&bots).await?)
    }

    // ── Reads ──────────────────────────────────────────────────────

    /// A bot's aggregate score.
    pub fn score(&self, bot_id: &BotId) -> ActionsResult<i64> {
        Ok(self.store.score(bot_id)?)
    }

    /// Per-bot standings, best first.
    pub fn standings(&self) -> ActionsResult<Vec<Standing>> {
        Ok(self.store.standings()?)
    }
}

/// Random alphanumeric token of the given length.
fn new_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Current Unix epoch in seconds.
fn epoch_secs() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
