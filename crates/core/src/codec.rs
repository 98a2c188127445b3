//! JSON layout of the persisted progress data, including the older layouts
//! written by earlier versions of the app.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::model::{
    AnswerStats, GameId, GameIdError, GameProgressRecord, ProgressStore, RecordError,
};

/// Key holding the per-game progress map.
pub const PROGRESS_STORE_KEY: &str = "progressStore";
/// Key holding the per-game attempt counters.
pub const ANSWER_STATS_KEY: &str = "answerStats";

/// Per-game map written before the store was renamed; uses `correct` for
/// the lifetime counter.
pub const LEGACY_LEVEL_PROGRESS_KEY: &str = "mathGameLevelProgress";
/// Attempt counters written before the store was renamed.
pub const LEGACY_STATS_KEY: &str = "mathGameStats";
/// Flat single-game star count.
pub const LEGACY_STARS_KEY: &str = "stars";
/// Flat single-game level.
pub const LEGACY_STAR_LEVEL_KEY: &str = "starLevel";

/// Keys that may hold legacy data and are safe to drop once migrated.
pub const LEGACY_KEYS: [&str; 4] = [
    LEGACY_LEVEL_PROGRESS_KEY,
    LEGACY_STATS_KEY,
    LEGACY_STARS_KEY,
    LEGACY_STAR_LEVEL_KEY,
];

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreDecodeError {
    #[error("malformed progress data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed legacy value for `{key}`: {raw:?}")]
    LegacyValue { key: &'static str, raw: String },

    #[error("invalid game id in progress data: {0}")]
    Game(#[from] GameIdError),

    #[error(transparent)]
    Record(#[from] RecordError),
}

/// Why a decoded record was left out of the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RejectReason {
    #[error(transparent)]
    Invalid(#[from] RecordError),

    #[error("key {raw:?} names a game that already has a record")]
    Duplicate { raw: String },
}

//
// ─── PROGRESS STORE ────────────────────────────────────────────────────────────
//

/// Result of decoding a progress map.
///
/// Records that parse but break the counter bounds, or whose key trims to a
/// game that already has a record, are left out of `store` and listed in
/// `rejected` so the caller can report them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedStore {
    pub store: ProgressStore,
    pub rejected: Vec<(GameId, RejectReason)>,
}

/// Serializes the store as `{ gameId: { correctCount, progress, stars, level } }`.
///
/// # Errors
///
/// Returns `serde_json::Error` if serialization fails.
pub fn encode_store(store: &ProgressStore) -> Result<String, serde_json::Error> {
    serde_json::to_string(store)
}

/// Parses a progress map in the current or the `mathGameLevelProgress` layout.
///
/// # Errors
///
/// Returns `StoreDecodeError::Json` if the text is not a JSON object of records,
/// or `StoreDecodeError::Game` if a key is blank.
pub fn decode_store(raw: &str) -> Result<DecodedStore, StoreDecodeError> {
    let parsed: BTreeMap<String, GameProgressRecord> = serde_json::from_str(raw)?;

    // already-trimmed keys claim their game before padded variants of them
    let (exact, padded): (Vec<_>, Vec<_>) =
        parsed.into_iter().partition(|(key, _)| key.trim() == key.as_str());

    let mut decoded = DecodedStore::default();
    let mut seen = BTreeSet::new();
    for (key, record) in exact.into_iter().chain(padded) {
        let game = GameId::new(key.as_str())?;
        if !seen.insert(game.clone()) {
            decoded
                .rejected
                .push((game, RejectReason::Duplicate { raw: key }));
            continue;
        }
        match record.validate() {
            Ok(()) => decoded.store.insert(game, record),
            Err(err) => decoded.rejected.push((game, err.into())),
        }
    }
    Ok(decoded)
}

/// Builds a store from the flat `stars` / `starLevel` values, assigning them
/// to the default game.
///
/// Returns `Ok(None)` when neither value is present.
///
/// # Errors
///
/// Returns `StoreDecodeError` if a value is not a non-negative integer or the
/// star count is out of range.
pub fn migrate_flat(
    stars: Option<&str>,
    star_level: Option<&str>,
) -> Result<Option<ProgressStore>, StoreDecodeError> {
    if stars.is_none() && star_level.is_none() {
        return Ok(None);
    }

    let stars = parse_legacy_count(LEGACY_STARS_KEY, stars)?;
    let level = parse_legacy_count(LEGACY_STAR_LEVEL_KEY, star_level)?;
    let record = GameProgressRecord::from_persisted(0, 0, stars, level)?;

    let mut store = ProgressStore::new();
    store.insert(GameId::default_game(), record);
    Ok(Some(store))
}

fn parse_legacy_count(key: &'static str, raw: Option<&str>) -> Result<u32, StoreDecodeError> {
    let Some(raw) = raw else {
        return Ok(0);
    };
    // values were written through JSON.stringify, so "3" and "\"3\"" both occur
    let trimmed = raw.trim().trim_matches('"');
    trimmed.parse().map_err(|_| StoreDecodeError::LegacyValue {
        key,
        raw: raw.to_owned(),
    })
}

//
// ─── ANSWER STATS ──────────────────────────────────────────────────────────────
//

/// Serializes attempt counters as `{ gameId: { correct, totalAttempts } }`.
///
/// # Errors
///
/// Returns `serde_json::Error` if serialization fails.
pub fn encode_stats(stats: &AnswerStats) -> Result<String, serde_json::Error> {
    serde_json::to_string(stats)
}

/// Parses attempt counters; the legacy `mathGameStats` value has the same shape.
///
/// # Errors
///
/// Returns `StoreDecodeError::Json` on malformed input.
pub fn decode_stats(raw: &str) -> Result<AnswerStats, StoreDecodeError> {
    Ok(serde_json::from_str(raw)?)
}
