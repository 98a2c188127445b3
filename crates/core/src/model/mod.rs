mod ids;
mod mastery;
mod record;
mod stats;
mod store;

pub use ids::{DEFAULT_GAME, GameId, GameIdError, KNOWN_GAMES};
pub use mastery::{MASTERY_PALETTE_LEN, MasteryTier, Medal};
pub use record::{GOAL, GameProgressRecord, MAX_STARS, RecordError};
pub use stats::{AnswerStats, GameStats};
pub use store::ProgressStore;
