#![forbid(unsafe_code)]

pub mod codec;
pub mod model;
pub mod progression;

pub use model::{AnswerStats, GameId, GameProgressRecord, GameStats, MasteryTier, ProgressStore};
pub use progression::{ProgressChange, apply_answer};
