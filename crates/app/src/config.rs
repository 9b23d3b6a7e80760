use std::fmt;
use std::time::Duration;

use services::QuizSettings;

#[derive(Debug)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidQuizSecs { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidQuizSecs { raw } => {
                write!(
                    f,
                    "invalid --quiz-secs value (expected 1 to {MAX_QUIZ_SECS} seconds): {raw}"
                )
            }
        }
    }
}

impl std::error::Error for ArgsError {}

/// Relative to the working directory; normalized to an absolute URL.
pub const DEFAULT_DB_URL: &str = "sqlite:lms.sqlite3";

/// Longest accepted quiz countdown (one day).
pub const MAX_QUIZ_SECS: u64 = 24 * 60 * 60;

/// Startup configuration: defaults, then environment, then flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub db_url: String,
    pub quiz: QuizSettings,
    pub help: bool,
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_quiz_secs(raw: &str) -> Option<Duration> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| (1..=MAX_QUIZ_SECS).contains(secs))
        .map(Duration::from_secs)
}

impl Args {
    /// Parse from the process environment and command line.
    ///
    /// # Errors
    ///
    /// Returns `ArgsError` for unknown flags or invalid values.
    pub fn from_env() -> Result<Self, ArgsError> {
        Self::parse(
            std::env::var("LMS_DB_URL").ok(),
            std::env::var("LMS_QUIZ_SECS").ok(),
            std::env::args().skip(1),
        )
    }

    /// # Errors
    ///
    /// Returns `ArgsError` for unknown flags or invalid values.
    pub fn parse(
        env_db_url: Option<String>,
        env_quiz_secs: Option<String>,
        args: impl IntoIterator<Item = String>,
    ) -> Result<Self, ArgsError> {
        let mut db_url = normalize_sqlite_url(
            env_db_url
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DB_URL.to_string()),
        );
        let mut quiz = QuizSettings::default();
        if let Some(raw) = env_quiz_secs {
            quiz.duration =
                parse_quiz_secs(&raw).ok_or(ArgsError::InvalidQuizSecs { raw: raw.clone() })?;
        }
        let mut help = false;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--quiz-secs" => {
                    let value = require_value(&mut args, "--quiz-secs")?;
                    quiz.duration = parse_quiz_secs(&value)
                        .ok_or(ArgsError::InvalidQuizSecs { raw: value.clone() })?;
                }
                "--help" | "-h" => help = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, quiz, help })
    }
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--db <sqlite_url>] [--quiz-secs <seconds>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --quiz-secs 300");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LMS_DB_URL, LMS_QUIZ_SECS, RUST_LOG");
}

/// Turn relative `sqlite:` paths into absolute `sqlite://` URLs.
#[must_use]
pub fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Make sure the database file and its directory exist.
///
/// # Errors
///
/// Returns an error if the URL has no path or the file cannot be created.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn defaults_apply_without_env_or_flags() {
        let parsed = Args::parse(None, None, Vec::new()).unwrap();
        assert!(parsed.db_url.starts_with("sqlite:///"));
        assert!(parsed.db_url.ends_with("/lms.sqlite3"));
        assert_eq!(parsed.quiz.duration, Duration::from_secs(300));
        assert!(!parsed.help);
    }

    #[test]
    fn flags_override_environment() {
        let parsed = Args::parse(
            Some("sqlite:///tmp/env.sqlite3".into()),
            Some("120".into()),
            args(&["--db", "sqlite:///tmp/flag.sqlite3", "--quiz-secs", "45"]),
        )
        .unwrap();
        assert_eq!(parsed.db_url, "sqlite:///tmp/flag.sqlite3");
        assert_eq!(parsed.quiz.duration, Duration::from_secs(45));
    }

    #[test]
    fn environment_quiz_secs_must_be_positive() {
        let err = Args::parse(None, Some("0".into()), Vec::new()).unwrap_err();
        assert!(matches!(err, ArgsError::InvalidQuizSecs { .. }));
    }

    #[test]
    fn quiz_secs_above_one_day_are_rejected() {
        let err = Args::parse(None, None, args(&["--quiz-secs", "18446744073709551615"]))
            .unwrap_err();
        assert!(matches!(err, ArgsError::InvalidQuizSecs { .. }));
        assert!(matches!(
            Args::parse(None, Some("86401".into()), Vec::new()).unwrap_err(),
            ArgsError::InvalidQuizSecs { .. }
        ));
        let parsed = Args::parse(None, None, args(&["--quiz-secs", "86400"])).unwrap();
        assert_eq!(parsed.quiz.duration, Duration::from_secs(MAX_QUIZ_SECS));
    }

    #[test]
    fn rejects_unknown_and_incomplete_flags() {
        assert!(matches!(
            Args::parse(None, None, args(&["--verbose"])).unwrap_err(),
            ArgsError::UnknownArg(_)
        ));
        assert!(matches!(
            Args::parse(None, None, args(&["--db"])).unwrap_err(),
            ArgsError::MissingValue { flag: "--db" }
        ));
    }

    #[test]
    fn relative_paths_become_absolute_urls() {
        let url = normalize_sqlite_url("sqlite:data/lms.sqlite3".into());
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("data/lms.sqlite3"));
        assert_eq!(
            normalize_sqlite_url("sqlite::memory:".into()),
            "sqlite::memory:"
        );
    }
}
