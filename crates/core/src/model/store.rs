use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::ids::GameId;
use crate::model::record::GameProgressRecord;

/// Progress records for every game that has been played.
///
/// Records are created lazily; reading an unknown game yields a zero record
/// without inserting it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressStore {
    records: BTreeMap<GameId, GameProgressRecord>,
}

impl ProgressStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record for `game`, or a zero record if it was never played.
    #[must_use]
    pub fn get(&self, game: &GameId) -> GameProgressRecord {
        self.records.get(game).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn contains(&self, game: &GameId) -> bool {
        self.records.contains_key(game)
    }

    /// Mutable access to the record for `game`, creating a zero record first.
    pub fn entry(&mut self, game: &GameId) -> &mut GameProgressRecord {
        self.records.entry(game.clone()).or_default()
    }

    pub fn insert(&mut self, game: GameId, record: GameProgressRecord) {
        self.records.insert(game, record);
    }

    pub fn remove(&mut self, game: &GameId) -> Option<GameProgressRecord> {
        self.records.remove(game)
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GameId, &GameProgressRecord)> {
        self.records.iter()
    }
}

impl FromIterator<(GameId, GameProgressRecord)> for ProgressStore {
    fn from_iter<T: IntoIterator<Item = (GameId, GameProgressRecord)>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
