use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use bonds_core::codec::{
    self, ANSWER_STATS_KEY, DecodedStore, LEGACY_KEYS, LEGACY_LEVEL_PROGRESS_KEY,
    LEGACY_STAR_LEVEL_KEY, LEGACY_STARS_KEY, LEGACY_STATS_KEY, PROGRESS_STORE_KEY,
};
use bonds_core::model::{
    AnswerStats, GameId, GameProgressRecord, GameStats, MAX_STARS, ProgressStore, RecordError,
};
use bonds_core::progression::{ProgressChange, apply_answer};
use storage::repository::KeyValueStore;

use crate::error::TrackerError;
use crate::report::GameReport;

//
// ─── ANSWER OUTCOME ────────────────────────────────────────────────────────────
//

/// Result of recording one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub game: GameId,
    pub record: GameProgressRecord,
    pub change: ProgressChange,
    /// False when the write-through save failed; the in-memory update still applies.
    pub persisted: bool,
}

impl AnswerOutcome {
    /// True exactly once per level gained, for one-shot celebrations.
    #[must_use]
    pub fn is_level_up(&self) -> bool {
        self.change.is_level_up()
    }
}

//
// ─── TRACKER ───────────────────────────────────────────────────────────────────
//

/// Per-game star and level progress, persisted write-through to a
/// `KeyValueStore`.
///
/// Every mutation updates the in-memory store first and then saves the whole
/// store. Save failures are logged and never returned, so a broken backend
/// cannot interrupt play.
pub struct ProgressTracker {
    kv: Arc<dyn KeyValueStore>,
    store: ProgressStore,
    stats: AnswerStats,
}

impl ProgressTracker {
    /// Creates a tracker with an empty store; nothing is read from `kv`.
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            store: ProgressStore::new(),
            stats: AnswerStats::new(),
        }
    }

    /// Creates a tracker and loads the persisted progress.
    pub async fn load(kv: Arc<dyn KeyValueStore>) -> Self {
        let mut tracker = Self::new(kv);
        tracker.load_from_store().await;
        tracker
    }

    #[must_use]
    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    #[must_use]
    pub fn stats(&self) -> &AnswerStats {
        &self.stats
    }

    /// Current record for `game`, or a zero record if it was never played.
    #[must_use]
    pub fn get_record(&self, game: &GameId) -> GameProgressRecord {
        self.store.get(game)
    }

    #[must_use]
    pub fn game_stats(&self, game: &GameId) -> GameStats {
        self.stats.get(game)
    }

    /// Applies an answer to `game`, then saves.
    pub async fn record_answer(&mut self, game: &GameId, is_correct: bool) -> AnswerOutcome {
        let record = self.store.entry(game);
        let change = apply_answer(record, is_correct);
        let record = *record;
        self.stats.record(game, is_correct);

        debug!(
            game = %game,
            is_correct,
            ?change,
            progress = record.progress,
            stars = record.stars,
            level = record.level,
            "answer recorded"
        );
        if change.is_level_up() {
            info!(game = %game, level = record.level, "level up");
        }

        let persisted = self.persist().await;
        AnswerOutcome {
            game: game.clone(),
            record,
            change,
            persisted,
        }
    }

    /// Overwrites the stars and level of `game`, keeping its bar and lifetime count.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Record` if `stars` exceeds the star bar.
    pub async fn set_rewards(
        &mut self,
        game: &GameId,
        stars: u32,
        level: u32,
    ) -> Result<GameProgressRecord, TrackerError> {
        if stars > MAX_STARS {
            return Err(RecordError::StarsOutOfRange(stars).into());
        }
        let record = self.store.entry(game);
        record.stars = stars;
        record.level = level;
        let record = *record;

        info!(game = %game, stars, level, "rewards edited");
        self.persist().await;
        Ok(record)
    }

    /// Forgets one game's progress and attempt counters.
    ///
    /// Returns the removed record, if the game had one.
    pub async fn reset_game(&mut self, game: &GameId) -> Option<GameProgressRecord> {
        let removed = self.store.remove(game);
        self.stats.remove(game);
        info!(game = %game, "game progress reset");
        self.persist().await;
        removed
    }

    /// Clears every game's progress and attempt counters.
    pub async fn reset_all(&mut self) {
        self.store.clear();
        self.stats.clear();
        info!("all progress reset");
        self.persist().await;
        for key in LEGACY_KEYS {
            if let Err(err) = self.kv.remove(key).await {
                warn!(key, error = %err, "failed to remove legacy progress key");
            }
        }
    }

    /// Replaces the in-memory state with what is persisted and returns the store.
    ///
    /// Missing or malformed data yields an empty store. Older layouts are
    /// migrated and saved in the current layout.
    pub async fn load_from_store(&mut self) -> ProgressStore {
        let (store, store_migrated) = self.read_store().await;
        let (stats, stats_migrated) = self.read_stats().await;
        self.store = store;
        self.stats = stats;

        if store_migrated || stats_migrated {
            info!(games = self.store.len(), "migrated legacy progress");
            self.persist().await;
        }
        self.store.clone()
    }

    /// Per-game summary rows: known games first, then any others that were played.
    #[must_use]
    pub fn report(&self) -> Vec<GameReport> {
        let mut games = GameId::known();
        for (game, _) in self.store.iter() {
            if !games.contains(game) {
                games.push(game.clone());
            }
        }
        games
            .into_iter()
            .map(|game| {
                let record = self.store.get(&game);
                let stats = self.stats.get(&game);
                GameReport::new(game, record, stats)
            })
            .collect()
    }

    //
    // ─── PERSISTENCE ───────────────────────────────────────────────────────────
    //

    async fn persist(&self) -> bool {
        let store_saved = match codec::encode_store(&self.store) {
            Ok(raw) => self.save(PROGRESS_STORE_KEY, &raw).await,
            Err(err) => {
                warn!(error = %err, "failed to encode progress store");
                false
            }
        };
        let stats_saved = match codec::encode_stats(&self.stats) {
            Ok(raw) => self.save(ANSWER_STATS_KEY, &raw).await,
            Err(err) => {
                warn!(error = %err, "failed to encode answer stats");
                false
            }
        };
        store_saved && stats_saved
    }

    async fn save(&self, key: &str, raw: &str) -> bool {
        match self.kv.set(key, raw).await {
            Ok(()) => true,
            Err(err) => {
                warn!(key, error = %err, "failed to save progress");
                false
            }
        }
    }

    async fn read(&self, key: &str) -> Option<String> {
        match self.kv.get(key).await {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "failed to read progress");
                None
            }
        }
    }

    /// Returns the store and whether it came from a legacy layout.
    async fn read_store(&self) -> (ProgressStore, bool) {
        match self.kv.get(PROGRESS_STORE_KEY).await {
            Ok(Some(raw)) => return (decode_or_empty(PROGRESS_STORE_KEY, &raw), false),
            Ok(None) => {}
            Err(err) => {
                // unreadable backend: legacy keys are not consulted
                warn!(key = PROGRESS_STORE_KEY, error = %err, "failed to read progress");
                return (ProgressStore::new(), false);
            }
        }

        if let Some(raw) = self.read(LEGACY_LEVEL_PROGRESS_KEY).await {
            if let Some(store) = decode_legacy(LEGACY_LEVEL_PROGRESS_KEY, &raw) {
                return (store, true);
            }
        }

        let stars = self.read(LEGACY_STARS_KEY).await;
        let star_level = self.read(LEGACY_STAR_LEVEL_KEY).await;
        match codec::migrate_flat(stars.as_deref(), star_level.as_deref()) {
            Ok(Some(store)) => (store, true),
            Ok(None) => (ProgressStore::new(), false),
            Err(err) => {
                warn!(error = %err, "ignoring malformed legacy star keys");
                (ProgressStore::new(), false)
            }
        }
    }

    /// Returns the stats and whether they came from the legacy key.
    async fn read_stats(&self) -> (AnswerStats, bool) {
        let (key, raw, migrated) = match self.read(ANSWER_STATS_KEY).await {
            Some(raw) => (ANSWER_STATS_KEY, raw, false),
            None => match self.read(LEGACY_STATS_KEY).await {
                Some(raw) => (LEGACY_STATS_KEY, raw, true),
                None => return (AnswerStats::new(), false),
            },
        };
        match codec::decode_stats(&raw) {
            Ok(stats) => (stats, migrated),
            Err(err) => {
                warn!(key, error = %err, "discarding malformed answer stats");
                (AnswerStats::new(), false)
            }
        }
    }
}

fn decode_or_empty(key: &str, raw: &str) -> ProgressStore {
    match codec::decode_store(raw) {
        Ok(decoded) => keep_valid(key, decoded),
        Err(err) => {
            warn!(key, error = %err, "discarding malformed progress store");
            ProgressStore::new()
        }
    }
}

/// Like `decode_or_empty`, but malformed legacy data counts as absent so the
/// older flat keys still get their turn.
fn decode_legacy(key: &str, raw: &str) -> Option<ProgressStore> {
    match codec::decode_store(raw) {
        Ok(decoded) => Some(keep_valid(key, decoded)),
        Err(err) => {
            warn!(key, error = %err, "ignoring malformed legacy progress");
            None
        }
    }
}

fn keep_valid(key: &str, DecodedStore { store, rejected }: DecodedStore) -> ProgressStore {
    for (game, reason) in rejected {
        warn!(key, game = %game, error = %reason, "dropping invalid progress record");
    }
    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryStore;

    fn game(id: &str) -> GameId {
        GameId::new(id).unwrap()
    }

    fn tracker() -> (ProgressTracker, InMemoryStore) {
        let kv = InMemoryStore::new();
        (ProgressTracker::new(Arc::new(kv.clone())), kv)
    }

    #[tokio::test]
    async fn first_answer_creates_record() {
        let (mut tracker, _) = tracker();
        let outcome = tracker.record_answer(&game("pattern"), true).await;
        assert_eq!(outcome.record.correct_count, 1);
        assert_eq!(outcome.record.progress, 1);
        assert!(outcome.persisted);
        assert!(tracker.store().contains(&game("pattern")));
    }

    #[tokio::test]
    async fn get_record_does_not_create() {
        let (tracker, _) = tracker();
        assert!(tracker.get_record(&game("diceGame")).is_zero());
        assert!(tracker.store().is_empty());
    }

    #[tokio::test]
    async fn answers_write_through() {
        let (mut tracker, kv) = tracker();
        tracker.record_answer(&game("numberBond"), true).await;
        let raw = kv.get(PROGRESS_STORE_KEY).await.unwrap().unwrap();
        let saved = codec::decode_store(&raw).unwrap().store;
        assert_eq!(saved, *tracker.store());
        assert!(kv.get(ANSWER_STATS_KEY).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn set_rewards_rejects_overfull_star_bar() {
        let (mut tracker, _) = tracker();
        let err = tracker
            .set_rewards(&game("comparison"), MAX_STARS + 1, 0)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TrackerError::Record(RecordError::StarsOutOfRange(6))
        ));
        assert!(tracker.store().is_empty());
    }

    #[tokio::test]
    async fn set_rewards_keeps_bar_and_count() {
        let (mut tracker, _) = tracker();
        let bond = game("numberBond");
        tracker.record_answer(&bond, true).await;
        tracker.record_answer(&bond, true).await;
        let record = tracker.set_rewards(&bond, 3, 7).await.unwrap();
        assert_eq!(record.correct_count, 2);
        assert_eq!(record.progress, 2);
        assert_eq!((record.stars, record.level), (3, 7));
    }

    #[tokio::test]
    async fn reset_game_only_touches_that_game() {
        let (mut tracker, _) = tracker();
        tracker.record_answer(&game("pattern"), true).await;
        tracker.record_answer(&game("comparison"), true).await;
        let removed = tracker.reset_game(&game("pattern")).await;
        assert_eq!(removed.map(|r| r.correct_count), Some(1));
        assert!(!tracker.store().contains(&game("pattern")));
        assert_eq!(tracker.get_record(&game("comparison")).correct_count, 1);
        assert_eq!(tracker.game_stats(&game("pattern")), GameStats::default());
    }

    #[tokio::test]
    async fn report_lists_known_games_then_others() {
        let (mut tracker, _) = tracker();
        tracker.record_answer(&game("wordBuilder"), true).await;
        let report = tracker.report();
        assert_eq!(report.len(), bonds_core::model::KNOWN_GAMES.len() + 1);
        assert_eq!(report[0].game, GameId::default_game());
        let last = report.last().unwrap();
        assert_eq!(last.name, "Word Builder");
        assert_eq!(last.percent_correct, 100);
    }
}
