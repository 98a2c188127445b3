use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::ids::GameId;

/// Lifetime attempt counters for one game, used for the correctness column
/// of the progress report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameStats {
    pub correct: u32,
    pub total_attempts: u32,
}

impl GameStats {
    pub fn record(&mut self, is_correct: bool) {
        self.total_attempts = self.total_attempts.saturating_add(1);
        if is_correct {
            self.correct = self.correct.saturating_add(1);
        }
    }

    /// Whole-number percentage of correct attempts; 0 before the first attempt.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn percent_correct(&self) -> u32 {
        if self.total_attempts == 0 {
            return 0;
        }
        // imported stats may carry correct > total_attempts
        let ratio = (f64::from(self.correct) / f64::from(self.total_attempts)).min(1.0);
        (ratio * 100.0).round() as u32
    }
}

/// Attempt counters for every game, persisted next to the progress store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerStats {
    games: BTreeMap<GameId, GameStats>,
}

impl AnswerStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, game: &GameId, is_correct: bool) -> GameStats {
        let entry = self.games.entry(game.clone()).or_default();
        entry.record(is_correct);
        *entry
    }

    #[must_use]
    pub fn get(&self, game: &GameId) -> GameStats {
        self.games.get(game).copied().unwrap_or_default()
    }

    pub fn remove(&mut self, game: &GameId) -> Option<GameStats> {
        self.games.remove(game)
    }

    pub fn clear(&mut self) {
        self.games.clear();
    }
}
