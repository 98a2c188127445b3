use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Games shipped with the app, in menu order.
pub const KNOWN_GAMES: [&str; 7] = [
    "numberBond",
    "comparison",
    "pattern",
    "weightPuzzle",
    "numberLadder",
    "shapePuzzle",
    "diceGame",
];

/// Game that receives progress migrated from the old single-game layout.
pub const DEFAULT_GAME: &str = "numberBond";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameIdError {
    #[error("game id cannot be empty")]
    Empty,
}

/// Key identifying one game's progress record, e.g. `numberBond`.
///
/// Any non-blank string is accepted; unknown games simply get their own record.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    /// Creates a new `GameId` from a trimmed, non-empty string.
    ///
    /// # Errors
    ///
    /// Returns `GameIdError::Empty` if the value is blank.
    pub fn new(id: impl Into<String>) -> Result<Self, GameIdError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(GameIdError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the default game used for legacy migration.
    #[must_use]
    pub fn default_game() -> Self {
        Self(DEFAULT_GAME.to_owned())
    }

    /// Returns the ids of all known games.
    #[must_use]
    pub fn known() -> Vec<Self> {
        KNOWN_GAMES.iter().map(|id| Self((*id).to_owned())).collect()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-friendly name: `weightPuzzle` becomes `Weight Puzzle`.
    #[must_use]
    pub fn display_name(&self) -> String {
        let mut out = String::with_capacity(self.0.len() + 4);
        for (idx, ch) in self.0.chars().enumerate() {
            if idx == 0 {
                out.extend(ch.to_uppercase());
            } else if ch.is_uppercase() {
                out.push(' ');
                out.push(ch);
            } else {
                out.push(ch);
            }
        }
        out
    }
}

impl<'de> Deserialize<'de> for GameId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        GameId::new(raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Debug for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GameId({})", self.0)
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for GameId {
    type Err = GameIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameId::new(s)
    }
}

impl AsRef<str> for GameId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
