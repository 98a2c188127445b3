#![forbid(unsafe_code)]

pub mod error;
pub mod progress_tracker;
pub mod report;

pub use error::TrackerError;
pub use progress_tracker::{AnswerOutcome, ProgressTracker};
pub use report::GameReport;
