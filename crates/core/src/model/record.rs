use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Correct answers needed to earn one star.
pub const GOAL: u32 = 5;

/// Stars that fill the bar; earning the last one rolls over into a level.
pub const MAX_STARS: u32 = 5;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RecordError {
    #[error("progress must be below the star goal, got {0}")]
    ProgressOutOfRange(u32),

    #[error("stars exceed the star bar, got {0}")]
    StarsOutOfRange(u32),
}

//
// ─── RECORD ────────────────────────────────────────────────────────────────────
//

/// Per-game mastery counters.
///
/// Serialized as `{ correctCount, progress, stars, level }`. Missing fields
/// decode as zero and the older `correct` field name is accepted for
/// `correctCount`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameProgressRecord {
    #[serde(alias = "correct")]
    pub correct_count: u32,
    pub progress: u32,
    pub stars: u32,
    pub level: u32,
}

impl GameProgressRecord {
    /// A record with every counter at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from persisted counters, checking the bounds.
    ///
    /// # Errors
    ///
    /// Returns `RecordError` if `progress` or `stars` is out of range.
    pub fn from_persisted(
        correct_count: u32,
        progress: u32,
        stars: u32,
        level: u32,
    ) -> Result<Self, RecordError> {
        let record = Self {
            correct_count,
            progress,
            stars,
            level,
        };
        record.validate()?;
        Ok(record)
    }

    /// Checks `progress < GOAL` and `stars <= MAX_STARS`.
    ///
    /// # Errors
    ///
    /// Returns the first violated bound.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.progress >= GOAL {
            return Err(RecordError::ProgressOutOfRange(self.progress));
        }
        if self.stars > MAX_STARS {
            return Err(RecordError::StarsOutOfRange(self.stars));
        }
        Ok(())
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}
