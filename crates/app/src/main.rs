mod args;

use std::sync::Arc;

use bonds_core::model::{GOAL, GameProgressRecord, MAX_STARS, MasteryTier};
use bonds_core::progression::ProgressChange;
use rand::seq::IndexedRandom;
use services::{GameReport, ProgressTracker};
use storage::repository::Storage;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::args::{Args, ArgsError, Command, DB_URL_ENV, print_usage, sqlite_file_path};

const CORRECT_MESSAGES: [&str; 5] = [
    "Awesome!",
    "You got it!",
    "Super!",
    "Brilliant!",
    "Fantastic!",
];

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn star_row(stars: u32) -> String {
    (0..MAX_STARS)
        .map(|idx| if idx < stars { '★' } else { '☆' })
        .collect()
}

fn progress_bar(progress: u32) -> String {
    (0..GOAL)
        .map(|idx| if idx < progress { '█' } else { '░' })
        .collect()
}

fn tier_label(tier: MasteryTier) -> String {
    let mut label = tier.medal.label().to_string();
    if tier.spinning {
        label.push_str(" (spinning)");
    } else if tier.sparkling {
        label.push_str(" (sparkling)");
    }
    label
}

fn print_record(name: &str, record: &GameProgressRecord) {
    println!(
        "{name}: level {} {} [{}] {}/{}  mastery: {}",
        record.level,
        star_row(record.stars),
        progress_bar(record.progress),
        record.progress,
        GOAL,
        tier_label(MasteryTier::for_level(record.level)),
    );
}

fn print_report(rows: &[GameReport]) {
    for row in rows {
        println!(
            "{:<14} level {:>3}  {}  [{}] {}/{}  {:>3}% correct  {}",
            row.name,
            row.level,
            star_row(row.stars),
            progress_bar(row.progress),
            row.progress,
            row.goal,
            row.percent_correct,
            tier_label(row.tier),
        );
    }
}

fn feedback(change: ProgressChange) -> String {
    match change {
        ProgressChange::Progressed => {
            let cheer = CORRECT_MESSAGES
                .choose(&mut rand::rng())
                .copied()
                .unwrap_or("Nice!");
            format!("✅ {cheer}")
        }
        ProgressChange::StarEarned => "⭐ You earned a star!".to_string(),
        ProgressChange::LevelUp => "🎉 Level up! 🎉".to_string(),
        ProgressChange::Regressed | ProgressChange::AtFloor => "❌ Oops, try again!".to_string(),
    }
}

/// Creates the directory that will hold a file-backed database.
fn prepare_db_dir(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = sqlite_file_path(db_url) else {
        return Ok(());
    };
    if path.as_os_str().is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = Args::parse(std::env::args().skip(1), std::env::var(DB_URL_ENV).ok())
        .map_err(|e| {
            eprintln!("{e}");
            print_usage();
            e
        })?;

    if parsed.command == Command::Help {
        print_usage();
        return Ok(());
    }

    prepare_db_dir(&parsed.db_url)?;
    debug!(db_url = %parsed.db_url, "opening progress store");
    let storage = Storage::sqlite(&parsed.db_url).await?;
    let mut tracker = ProgressTracker::load(Arc::clone(&storage.kv)).await;

    match parsed.command {
        Command::Answer { game, is_correct } => {
            let outcome = tracker.record_answer(&game, is_correct).await;
            if parsed.json {
                println!("{}", serde_json::to_string(&outcome)?);
            } else {
                println!("{}", feedback(outcome.change));
                print_record(&game.display_name(), &outcome.record);
            }
        }
        Command::Show { game } => {
            let record = tracker.get_record(&game);
            if parsed.json {
                println!("{}", serde_json::to_string(&record)?);
            } else {
                print_record(&game.display_name(), &record);
            }
        }
        Command::Report => {
            let rows = tracker.report();
            if parsed.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if rows.iter().any(GameReport::is_played) {
                print_report(&rows);
            } else {
                println!("No data yet. Play a few rounds!");
            }
        }
        Command::Reset { game: Some(game) } => {
            tracker.reset_game(&game).await;
            println!("Cleared progress for {}.", game.display_name());
        }
        Command::Reset { game: None } => {
            tracker.reset_all().await;
            println!("Cleared all progress.");
        }
        Command::Set { game, stars, level } => {
            let record = tracker.set_rewards(&game, stars, level).await?;
            print_record(&game.display_name(), &record);
        }
        Command::Help => print_usage(),
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    init_logging();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
