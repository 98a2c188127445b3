use serde::Serialize;

use bonds_core::model::{GOAL, GameId, GameProgressRecord, GameStats, MasteryTier};

/// One row of the progress report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameReport {
    pub game: GameId,
    pub name: String,
    pub level: u32,
    pub stars: u32,
    pub progress: u32,
    pub goal: u32,
    pub correct_count: u32,
    pub total_attempts: u32,
    pub percent_correct: u32,
    pub tier: MasteryTier,
}

impl GameReport {
    #[must_use]
    pub fn new(game: GameId, record: GameProgressRecord, stats: GameStats) -> Self {
        Self {
            name: game.display_name(),
            game,
            level: record.level,
            stars: record.stars,
            progress: record.progress,
            goal: GOAL,
            correct_count: record.correct_count,
            total_attempts: stats.total_attempts,
            percent_correct: stats.percent_correct(),
            tier: MasteryTier::for_level(record.level),
        }
    }

    #[must_use]
    pub fn is_played(&self) -> bool {
        self.total_attempts > 0 || self.correct_count > 0 || self.level > 0 || self.stars > 0
    }
}
