//! Star and level transitions for a single game's record.
//!
//! A correct answer fills the progress bar; a full bar becomes a star and the
//! star that would complete the star bar becomes a level instead. A wrong
//! answer steps back once: progress first, then a star, then a level (which
//! refills the star bar).

use serde::Serialize;

use crate::model::{GOAL, GameProgressRecord, MAX_STARS};

/// What a single answer did to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProgressChange {
    /// The progress bar moved forward without completing.
    Progressed,
    /// The progress bar filled and turned into a star.
    StarEarned,
    /// The star bar filled and rolled over into a new level.
    LevelUp,
    /// A wrong answer took back one step.
    Regressed,
    /// A wrong answer with nothing left to take back.
    AtFloor,
}

impl ProgressChange {
    /// True only for the answer that incremented the level.
    #[must_use]
    pub fn is_level_up(self) -> bool {
        matches!(self, Self::LevelUp)
    }
}

/// Applies one answer to `record` and reports the resulting change.
///
/// # Examples
///
/// ```
/// # use bonds_core::model::GameProgressRecord;
/// # use bonds_core::progression::{apply_answer, ProgressChange};
/// let mut record = GameProgressRecord::from_persisted(0, 4, 4, 3)?;
/// assert_eq!(apply_answer(&mut record, true), ProgressChange::LevelUp);
/// assert_eq!((record.progress, record.stars, record.level), (0, 0, 4));
/// # Ok::<(), bonds_core::model::RecordError>(())
/// ```
pub fn apply_answer(record: &mut GameProgressRecord, is_correct: bool) -> ProgressChange {
    if is_correct {
        advance(record)
    } else {
        regress(record)
    }
}

fn advance(record: &mut GameProgressRecord) -> ProgressChange {
    record.correct_count = record.correct_count.saturating_add(1);
    record.progress += 1;
    if record.progress < GOAL {
        return ProgressChange::Progressed;
    }

    record.progress = 0;
    let stars = record.stars + 1;
    if stars >= MAX_STARS {
        record.stars = 0;
        record.level = record.level.saturating_add(1);
        ProgressChange::LevelUp
    } else {
        record.stars = stars;
        ProgressChange::StarEarned
    }
}

fn regress(record: &mut GameProgressRecord) -> ProgressChange {
    if record.progress > 0 {
        record.progress -= 1;
    } else if record.stars > 0 {
        record.stars -= 1;
    } else if record.level > 0 {
        record.level -= 1;
        record.stars = MAX_STARS;
    } else {
        return ProgressChange::AtFloor;
    }
    ProgressChange::Regressed
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn record(progress: u32, stars: u32, level: u32) -> GameProgressRecord {
        GameProgressRecord::from_persisted(0, progress, stars, level).unwrap()
    }

    fn triple(record: &GameProgressRecord) -> (u32, u32, u32) {
        (record.progress, record.stars, record.level)
    }

    #[test]
    fn correct_answer_moves_progress() {
        let mut rec = record(1, 0, 0);
        assert_eq!(apply_answer(&mut rec, true), ProgressChange::Progressed);
        assert_eq!(triple(&rec), (2, 0, 0));
        assert_eq!(rec.correct_count, 1);
    }

    #[test]
    fn full_progress_bar_becomes_a_star() {
        let mut rec = record(4, 2, 0);
        assert_eq!(apply_answer(&mut rec, true), ProgressChange::StarEarned);
        assert_eq!(triple(&rec), (0, 3, 0));
    }

    #[test]
    fn full_star_bar_levels_up() {
        let mut rec = record(4, 4, 3);
        let change = apply_answer(&mut rec, true);
        assert!(change.is_level_up());
        assert_eq!(triple(&rec), (0, 0, 4));
    }

    #[test]
    fn borrowed_star_bar_levels_up_on_next_star() {
        let mut rec = record(4, MAX_STARS, 1);
        assert!(apply_answer(&mut rec, true).is_level_up());
        assert_eq!(triple(&rec), (0, 0, 2));
    }

    #[test]
    fn wrong_answer_takes_progress_first() {
        let mut rec = record(3, 2, 1);
        assert_eq!(apply_answer(&mut rec, false), ProgressChange::Regressed);
        assert_eq!(triple(&rec), (2, 2, 1));
    }

    #[test]
    fn wrong_answer_takes_star_when_bar_empty() {
        let mut rec = record(0, 2, 1);
        apply_answer(&mut rec, false);
        assert_eq!(triple(&rec), (0, 1, 1));
    }

    #[test]
    fn wrong_answer_borrows_from_level() {
        let mut rec = record(0, 0, 2);
        assert_eq!(apply_answer(&mut rec, false), ProgressChange::Regressed);
        assert_eq!(triple(&rec), (0, 5, 1));
    }

    #[test]
    fn wrong_answer_at_floor_is_noop() {
        let mut rec = record(0, 0, 0);
        assert_eq!(apply_answer(&mut rec, false), ProgressChange::AtFloor);
        assert!(rec.is_zero());
    }

    #[test]
    fn wrong_answer_keeps_correct_count() {
        let mut rec = GameProgressRecord::from_persisted(9, 2, 0, 0).unwrap();
        apply_answer(&mut rec, false);
        assert_eq!(rec.correct_count, 9);
    }

    #[test]
    fn borrow_then_five_correct_restores_level() {
        let mut rec = record(0, 0, 2);
        apply_answer(&mut rec, false);
        for _ in 0..GOAL {
            apply_answer(&mut rec, true);
        }
        assert_eq!(triple(&rec), (0, 0, 2));
    }

    #[test]
    fn five_correct_from_fresh_earns_first_star() {
        let mut rec = GameProgressRecord::new();
        let changes: Vec<_> = (0..5).map(|_| apply_answer(&mut rec, true)).collect();
        assert_eq!(changes.last(), Some(&ProgressChange::StarEarned));
        assert_eq!(rec.correct_count, 5);
        assert_eq!(triple(&rec), (0, 1, 0));
    }

    #[test]
    fn invariants_hold_over_random_walk() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut rec = GameProgressRecord::new();
        let (mut level_ups, mut borrows, mut floors) = (0, 0, 0);

        // slightly above even odds so the walk climbs into levels and still
        // falls back to the floor
        for step in 0..50_000u32 {
            let before = rec;
            let is_correct = rng.random_bool(0.6);
            let change = apply_answer(&mut rec, is_correct);

            assert!(rec.validate().is_ok(), "step {step}: {rec:?}");
            let expected = before.correct_count + u32::from(is_correct);
            assert_eq!(rec.correct_count, expected, "step {step}");

            let borrowed = !is_correct && rec.level + 1 == before.level;
            match change {
                ProgressChange::LevelUp => {
                    assert_eq!(rec.level, before.level + 1, "step {step}");
                    assert_eq!((rec.progress, rec.stars), (0, 0));
                    level_ups += 1;
                }
                ProgressChange::AtFloor => {
                    assert_eq!((before.progress, before.stars, before.level), (0, 0, 0));
                    assert_eq!(rec, before);
                    floors += 1;
                }
                _ if borrowed => {
                    assert_eq!((before.progress, before.stars), (0, 0));
                    assert_eq!(rec.stars, MAX_STARS);
                    borrows += 1;
                }
                _ => assert_eq!(rec.level, before.level, "step {step}: {change:?}"),
            }
        }

        assert!(level_ups > 0);
        assert!(borrows > 0);
        assert!(floors > 0);
    }

    #[test]
    fn change_serializes_in_camel_case() {
        assert_eq!(
            serde_json::to_value(ProgressChange::LevelUp).unwrap(),
            serde_json::json!("levelUp")
        );
    }
}
