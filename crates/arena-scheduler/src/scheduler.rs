//! Scheduler — fair placement of tournament games across leveled queues.
//!
//! Every ordered pair of bots owes the tournament `num_rounds` games. A
//! pair that has already played `p` of them gets one job in each of the
//! levels `0..num_rounds - p`: the level index is the number of games the
//! pair will still owe after the queued one is played. Draining level 0
//! before level 1, level 1 before level 2, and so on therefore gives every
//! pair its next game before any pair gets a later one.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use arena_core::BotId;
use arena_state::{StateResult, StateStore};

use crate::error::{SchedulerError, SchedulerResult};
use crate::queue::{Job, JobQueue};

/// Read-only view of how many games an ordered pair has on record.
///
/// This is the only question the scheduler ever asks the ledger, split out
/// so tests can substitute an in-memory map for the real store.
pub trait PlayCounts: Send + Sync {
    fn games_as_first(&self, first: &BotId, second: &BotId) -> StateResult<u64>;
}

impl PlayCounts for StateStore {
    fn games_as_first(&self, first: &BotId, second: &BotId) -> StateResult<u64> {
        self.games_played_as_first(first, second)
    }
}

/// The scheduler owns one FIFO queue per tournament round.
///
/// Queue mutation goes through a single `RwLock` writer, so enqueues from
/// scheduling passes and dequeues from workers never interleave within a
/// queue; length and snapshot reads share the read side.
pub struct Scheduler {
    num_rounds: usize,
    levels: RwLock<Vec<JobQueue>>,
    counts: Arc<dyn PlayCounts>,
}

impl Scheduler {
    /// Create a scheduler with `num_rounds` empty queues.
    pub fn new(counts: Arc<dyn PlayCounts>, num_rounds: usize) -> Self {
        let levels = (0..num_rounds).map(|_| JobQueue::new()).collect();
        Self {
            num_rounds,
            levels: RwLock::new(levels),
            counts,
        }
    }

    /// The per-pair game target (also the number of levels).
    pub fn num_rounds(&self) -> usize {
        self.num_rounds
    }

    /// Empty every queue. Recorded games are untouched.
    pub async fn clear_all(&self) {
        let mut levels = self.levels.write().await;
        for queue in levels.iter_mut() {
            queue.clear();
        }
        debug!("all queues cleared");
    }

    /// Number of jobs waiting in one level.
    pub async fn queue_len(&self, level: usize) -> SchedulerResult<usize> {
        self.check_level(level)?;
        let levels = self.levels.read().await;
        Ok(levels[level].len())
    }

    /// Copy of one level's jobs, front first (for monitoring/admin).
    pub async fn queue_jobs(&self, level: usize) -> SchedulerResult<Vec<Job>> {
        self.check_level(level)?;
        let levels = self.levels.read().await;
        Ok(levels[level].snapshot())
    }

    /// All levels' depths, level 0 first.
    pub async fn queue_depths(&self) -> Vec<usize> {
        let levels = self.levels.read().await;
        levels.iter().map(|q| q.len()).collect()
    }

    /// Pop the oldest job from one level.
    pub async fn dequeue(&self, level: usize) -> SchedulerResult<Option<Job>> {
        self.check_level(level)?;
        let mut levels = self.levels.write().await;
        Ok(levels[level].pop())
    }

    /// Pop the oldest job from the highest-priority non-empty level.
    ///
    /// This packages the breadth-first drain convention for workers:
    /// level 0 empties completely before anything comes out of level 1.
    pub async fn next_job(&self) -> Option<Job> {
        let mut levels = self.levels.write().await;
        levels.iter_mut().find_map(|queue| queue.pop())
    }

    /// Queue the games an ordered pair still owes.
    ///
    /// A pair that has played `p` games gets one job in each of levels
    /// `num_rounds - 1 - p` down to 0, so every pair still owed a game
    /// lands exactly one job in level 0. Fully played pairs are a no-op.
    /// Returns the number of jobs queued.
    pub async fn schedule_pair(&self, first: &BotId, second: &BotId) -> SchedulerResult<usize> {
        if first == second {
            warn!(%first, "refusing to schedule a bot against itself");
            return Ok(0);
        }

        let played = self.counts.games_as_first(first, second)? as usize;
        if played >= self.num_rounds {
            debug!(%first, %second, played, "pair fully played, nothing to schedule");
            return Ok(0);
        }

        let mut levels = self.levels.write().await;
        for round in played..self.num_rounds {
            // The job for round `round` lands in the level equal to the
            // number of games left after it is played.
            levels[self.num_rounds - 1 - round].push(Job {
                first: first.clone(),
                second: second.clone(),
            });
        }

        let queued = self.num_rounds - played;
        debug!(%first, %second, played, queued, "pair scheduled");
        Ok(queued)
    }

    /// Queue both directions of every pairing involving `bot`.
    ///
    /// The game is directional, so (bot, other) and (other, bot) each track
    /// their own play count and are scheduled independently.
    pub async fn schedule_bot(&self, bot: &BotId, others: &[BotId]) -> SchedulerResult<usize> {
        let mut queued = 0;
        for other in others {
            if other == bot {
                continue;
            }
            queued += self.schedule_pair(bot, other).await?;
            queued += self.schedule_pair(other, bot).await?;
        }
        info!(%bot, opponents = others.len(), queued, "bot scheduled");
        Ok(queued)
    }

    /// Queue both directions of every distinct pairing among `bots`.
    pub async fn schedule_all(&self, bots: &[BotId]) -> SchedulerResult<usize> {
        let mut queued = 0;
        for (i, a) in bots.iter().enumerate() {
            for b in &bots[i + 1..] {
                queued += self.schedule_pair(a, b).await?;
                queued += self.schedule_pair(b, a).await?;
            }
        }
        info!(bots = bots.len(), queued, "full round-robin scheduled");
        Ok(queued)
    }

    fn check_level(&self, level: usize) -> SchedulerResult<()> {
        if level >= self.num_rounds {
            return Err(SchedulerError::LevelOutOfRange {
                level,
                num_rounds: self.num_rounds,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory ledger fake: pair → games already played.
    struct FixedCounts(HashMap<(BotId, BotId), u64>);

    impl PlayCounts for FixedCounts {
        fn games_as_first(&self, first: &BotId, second: &BotId) -> StateResult<u64> {
            Ok(self
                .0
                .get(&(first.clone(), second.clone()))
                .copied()
                .unwrap_or(0))
        }
    }

    fn counts(entries: &[(&str, &str, u64)]) -> Arc<FixedCounts> {
        Arc::new(FixedCounts(
            entries
                .iter()
                .map(|(a, b, n)| ((a.to_string(), b.to_string()), *n))
                .collect(),
        ))
    }

    fn ids(names: &[&str]) -> Vec<BotId> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn unplayed_pair_gets_one_job_per_level() {
        let scheduler = Scheduler::new(counts(&[]), 5);

        let queued = scheduler
            .schedule_pair(&"a".to_string(), &"b".to_string())
            .await
            .unwrap();

        assert_eq!(queued, 5);
        assert_eq!(scheduler.queue_depths().await, vec![1, 1, 1, 1, 1]);
    }

    #[tokio::test]
    async fn partially_played_pair_fills_lowest_levels() {
        // 2 games on record: jobs land in levels 2, 1, 0.
        let scheduler = Scheduler::new(counts(&[("a", "b", 2)]), 5);

        scheduler
            .schedule_pair(&"a".to_string(), &"b".to_string())
            .await
            .unwrap();

        assert_eq!(scheduler.queue_depths().await, vec![1, 1, 1, 0, 0]);
    }

    #[tokio::test]
    async fn both_directions_schedule_independently() {
        // (a,b) has 2 games, (b,a) has 1: the per-level totals are the
        // worked example [2, 2, 2, 1, 0].
        let scheduler = Scheduler::new(counts(&[("a", "b", 2), ("b", "a", 1)]), 5);
        let (a, b) = ("a".to_string(), "b".to_string());

        scheduler.schedule_pair(&a, &b).await.unwrap();
        scheduler.schedule_pair(&b, &a).await.unwrap();

        assert_eq!(scheduler.queue_depths().await, vec![2, 2, 2, 1, 0]);
    }

    #[tokio::test]
    async fn fully_played_pair_is_a_noop() {
        let scheduler = Scheduler::new(counts(&[("a", "b", 5)]), 5);

        let queued = scheduler
            .schedule_pair(&"a".to_string(), &"b".to_string())
            .await
            .unwrap();

        assert_eq!(queued, 0);
        assert_eq!(scheduler.queue_depths().await, vec![0, 0, 0, 0, 0]);
    }

    #[tokio::test]
    async fn overplayed_pair_is_a_noop() {
        let scheduler = Scheduler::new(counts(&[("a", "b", 7)]), 5);

        let queued = scheduler
            .schedule_pair(&"a".to_string(), &"b".to_string())
            .await
            .unwrap();

        assert_eq!(queued, 0);
    }

    #[tokio::test]
    async fn self_pair_is_a_noop() {
        let scheduler = Scheduler::new(counts(&[]), 5);

        let queued = scheduler
            .schedule_pair(&"a".to_string(), &"a".to_string())
            .await
            .unwrap();

        assert_eq!(queued, 0);
        assert_eq!(scheduler.queue_depths().await, vec![0, 0, 0, 0, 0]);
    }

    #[tokio::test]
    async fn schedule_bot_skips_itself() {
        let scheduler = Scheduler::new(counts(&[]), 2);
        let bots = ids(&["a", "b", "a"]);

        let queued = scheduler.schedule_bot(&"a".to_string(), &bots).await.unwrap();

        // Only (a,b) and (b,a), 2 jobs each.
        assert_eq!(queued, 4);
    }

    #[tokio::test]
    async fn level_zero_drains_one_job_per_pair() {
        // Fresh 3-bot tournament: level 0 holds exactly one job per
        // ordered pair before anything is available from level 1.
        let scheduler = Scheduler::new(counts(&[]), 5);

        scheduler.schedule_all(&ids(&["a", "b", "c"])).await.unwrap();
        assert_eq!(scheduler.queue_depths().await, vec![6, 6, 6, 6, 6]);

        let mut drained = Vec::new();
        while let Some(job) = scheduler.dequeue(0).await.unwrap() {
            drained.push((job.first, job.second));
        }

        assert_eq!(drained.len(), 6);
        for pair in [
            ("a", "b"),
            ("b", "a"),
            ("a", "c"),
            ("c", "a"),
            ("b", "c"),
            ("c", "b"),
        ] {
            let pair = (pair.0.to_string(), pair.1.to_string());
            assert_eq!(drained.iter().filter(|p| **p == pair).count(), 1);
        }
    }

    #[tokio::test]
    async fn schedule_all_matches_worked_scenario() {
        // Three bots with (a,b)x2, (b,a)x1, (a,c)x2, (c,a)x1 on record and
        // (b,c)/(c,b) unplayed.
        let scheduler = Scheduler::new(
            counts(&[("a", "b", 2), ("b", "a", 1), ("a", "c", 2), ("c", "a", 1)]),
            5,
        );

        scheduler.schedule_all(&ids(&["a", "b", "c"])).await.unwrap();

        assert_eq!(scheduler.queue_depths().await, vec![6, 6, 6, 4, 2]);
    }

    #[tokio::test]
    async fn rescheduling_without_clear_duplicates_pending_jobs() {
        // The scheduler is idempotent against recorded games only, not
        // queue contents: callers clear before a fresh full pass.
        let scheduler = Scheduler::new(counts(&[]), 3);
        let (a, b) = ("a".to_string(), "b".to_string());

        scheduler.schedule_pair(&a, &b).await.unwrap();
        scheduler.schedule_pair(&a, &b).await.unwrap();
        assert_eq!(scheduler.queue_depths().await, vec![2, 2, 2]);

        scheduler.clear_all().await;
        scheduler.schedule_pair(&a, &b).await.unwrap();
        assert_eq!(scheduler.queue_depths().await, vec![1, 1, 1]);
    }

    #[tokio::test]
    async fn dequeue_is_fifo_within_a_level() {
        let scheduler = Scheduler::new(counts(&[]), 1);
        let bots = ids(&["a", "b", "c"]);

        scheduler.schedule_all(&bots).await.unwrap();

        let head = scheduler.dequeue(0).await.unwrap().unwrap();
        assert_eq!((head.first.as_str(), head.second.as_str()), ("a", "b"));
        let next = scheduler.dequeue(0).await.unwrap().unwrap();
        assert_eq!((next.first.as_str(), next.second.as_str()), ("b", "a"));
    }

    #[tokio::test]
    async fn next_job_prefers_lower_levels() {
        let scheduler = Scheduler::new(counts(&[("a", "b", 1)]), 3);
        let (a, b) = ("a".to_string(), "b".to_string());

        // (a,b) played 1: jobs in levels 1 and 0. (b,a) unplayed: jobs in
        // levels 2, 1, 0.
        scheduler.schedule_pair(&a, &b).await.unwrap();
        scheduler.schedule_pair(&b, &a).await.unwrap();
        assert_eq!(scheduler.queue_depths().await, vec![2, 2, 1]);

        // Level 0 drains first, then 1, then 2.
        let mut from_levels = Vec::new();
        while scheduler.next_job().await.is_some() {
            from_levels.push(scheduler.queue_depths().await);
        }
        assert_eq!(
            from_levels,
            vec![
                vec![1, 2, 1],
                vec![0, 2, 1],
                vec![0, 1, 1],
                vec![0, 0, 1],
                vec![0, 0, 0],
            ]
        );
    }

    #[tokio::test]
    async fn level_bounds_are_checked() {
        let scheduler = Scheduler::new(counts(&[]), 5);

        assert!(matches!(
            scheduler.queue_len(5).await,
            Err(SchedulerError::LevelOutOfRange { level: 5, .. })
        ));
        assert!(matches!(
            scheduler.dequeue(9).await,
            Err(SchedulerError::LevelOutOfRange { level: 9, .. })
        ));
        assert!(scheduler.queue_len(4).await.is_ok());
    }

    #[tokio::test]
    async fn clear_all_empties_every_level() {
        let scheduler = Scheduler::new(counts(&[]), 4);
        scheduler.schedule_all(&ids(&["a", "b"])).await.unwrap();

        scheduler.clear_all().await;

        assert_eq!(scheduler.queue_depths().await, vec![0, 0, 0, 0]);
        assert!(scheduler.next_job().await.is_none());
    }

    #[tokio::test]
    async fn counts_come_from_the_real_store_too() {
        // Same worked example as above, driven through the StateStore
        // implementation of PlayCounts.
        let store = StateStore::open_in_memory().unwrap();
        let (a, b) = ("a".to_string(), "b".to_string());
        store.record_game(&a, &b, 1, "01478").unwrap();
        store.record_game(&a, &b, -1, "01478").unwrap();
        store.record_game(&b, &a, 1, "01478").unwrap();

        let scheduler = Scheduler::new(Arc::new(store), 5);
        scheduler.schedule_bot(&a, &[b.clone()]).await.unwrap();

        assert_eq!(scheduler.queue_depths().await, vec![2, 2, 2, 1, 0]);
    }
}
