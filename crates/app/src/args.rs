use std::fmt;
use std::path::{Path, PathBuf};

use bonds_core::model::{GameId, GameIdError};

pub const DEFAULT_DB_URL: &str = "sqlite://progress.sqlite3";
pub const DB_URL_ENV: &str = "BONDS_DB_URL";

const MEMORY_DB_URL: &str = "sqlite::memory:";
const FILE_URL_PREFIX: &str = "sqlite://";

#[derive(Debug, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    MissingArgument { command: &'static str, name: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidDbUrl { raw: String },
    InvalidGame(GameIdError),
    InvalidAnswer { raw: String },
    InvalidCount { name: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArgument { command, name } => {
                write!(f, "{command} requires <{name}>")
            }
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidGame(err) => write!(f, "invalid game: {err}"),
            ArgsError::InvalidAnswer { raw } => {
                write!(f, "invalid answer (expected right or wrong): {raw}")
            }
            ArgsError::InvalidCount { name, raw } => write!(f, "invalid <{name}> value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Answer { game: GameId, is_correct: bool },
    Show { game: GameId },
    Report,
    Reset { game: Option<GameId> },
    Set { game: GameId, stars: u32, level: u32 },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub db_url: String,
    pub json: bool,
    pub command: Command,
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  bonds [--db <sqlite_url>] [--json] <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  answer <game> <right|wrong>   record one answer");
    eprintln!("  show <game>                   print one game's progress");
    eprintln!("  report                        print every game's progress");
    eprintln!("  reset [game]                  clear one game, or everything");
    eprintln!("  set <game> <stars> <level>    overwrite a game's rewards");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  {DB_URL_ENV}, RUST_LOG");
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn require_positional(
    positional: &mut impl Iterator<Item = String>,
    command: &'static str,
    name: &'static str,
) -> Result<String, ArgsError> {
    positional
        .next()
        .ok_or(ArgsError::MissingArgument { command, name })
}

fn parse_game(raw: String) -> Result<GameId, ArgsError> {
    GameId::new(raw).map_err(ArgsError::InvalidGame)
}

fn parse_answer(raw: String) -> Result<bool, ArgsError> {
    match raw.to_ascii_lowercase().as_str() {
        "right" | "correct" | "yes" | "y" => Ok(true),
        "wrong" | "incorrect" | "no" | "n" => Ok(false),
        _ => Err(ArgsError::InvalidAnswer { raw }),
    }
}

fn parse_count(raw: String, name: &'static str) -> Result<u32, ArgsError> {
    raw.parse()
        .map_err(|_| ArgsError::InvalidCount { name, raw: raw.clone() })
}

impl Args {
    /// Parses flags anywhere on the command line; the first positional
    /// argument names the subcommand.
    pub fn parse(
        argv: impl IntoIterator<Item = String>,
        env_db_url: Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut db_url = env_db_url.map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut json = false;
        let mut positional = Vec::new();

        let mut args = argv.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--json" => json = true,
                "--help" | "-h" => {
                    return Ok(Self {
                        db_url,
                        json,
                        command: Command::Help,
                    });
                }
                flag if flag.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        let command = match positional.next().as_deref() {
            None | Some("report") => Command::Report,
            Some("answer") => {
                let game = parse_game(require_positional(&mut positional, "answer", "game")?)?;
                let answer = require_positional(&mut positional, "answer", "right|wrong")?;
                Command::Answer {
                    game,
                    is_correct: parse_answer(answer)?,
                }
            }
            Some("show") => Command::Show {
                game: parse_game(require_positional(&mut positional, "show", "game")?)?,
            },
            Some("reset") => Command::Reset {
                game: positional.next().map(parse_game).transpose()?,
            },
            Some("set") => {
                let game = parse_game(require_positional(&mut positional, "set", "game")?)?;
                let stars = require_positional(&mut positional, "set", "stars")?;
                let level = require_positional(&mut positional, "set", "level")?;
                Command::Set {
                    game,
                    stars: parse_count(stars, "stars")?,
                    level: parse_count(level, "level")?,
                }
            }
            Some("help") => Command::Help,
            Some(other) => return Err(ArgsError::UnknownCommand(other.to_owned())),
        };

        if let Some(extra) = positional.next() {
            return Err(ArgsError::UnknownArg(extra));
        }

        Ok(Self {
            db_url,
            json,
            command,
        })
    }
}

/// Turns a bare or `sqlite:`-prefixed path into an absolute `sqlite://` URL.
pub fn normalize_sqlite_url(raw: String) -> String {
    let raw = raw.trim();
    if raw == MEMORY_DB_URL || raw.starts_with(FILE_URL_PREFIX) {
        return raw.to_owned();
    }

    let path = Path::new(raw.strip_prefix("sqlite:").unwrap_or(raw));
    let absolute = match std::env::current_dir() {
        Ok(cwd) if path.is_relative() => cwd.join(path),
        _ => path.to_path_buf(),
    };
    format!("{FILE_URL_PREFIX}{}", absolute.display())
}

/// File path named by a `sqlite://` URL, without its query string.
///
/// Returns `None` for in-memory and non-file URLs.
pub fn sqlite_file_path(db_url: &str) -> Option<PathBuf> {
    let rest = db_url.strip_prefix(FILE_URL_PREFIX)?;
    let path = rest.split_once('?').map_or(rest, |(path, _)| path);
    Some(PathBuf::from(path))
}
