use crate::dates::parse_date_list;
use chrono::NaiveDate;
use std::{env, path::PathBuf, time::Duration};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_NOTES_DIR: &str = "json";
const DEFAULT_DATES: &str = "2025-07-20,2025-07-19,2025-07-18";
const DEFAULT_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_PREFS_PATH: &str = "data/preferences.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PORT must be a number between 0 and 65535, got {0:?}")]
    InvalidPort(String),

    #[error("NOTES_DATES contains an invalid date {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("NOTES_FETCH_TIMEOUT_MS must be a positive number of milliseconds, got {0:?}")]
    InvalidTimeout(String),
}

/// Where note documents are retrieved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotesLocation {
    Directory(PathBuf),
    Remote(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub notes: NotesLocation,
    pub dates: Vec<NaiveDate>,
    pub fetch_timeout: Duration,
    pub prefs_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(value))?,
            None => DEFAULT_PORT,
        };

        let notes = match lookup("NOTES_BASE_URL").filter(|url| !url.trim().is_empty()) {
            Some(url) => NotesLocation::Remote(url.trim().trim_end_matches('/').to_string()),
            None => NotesLocation::Directory(PathBuf::from(
                lookup("NOTES_DIR").unwrap_or_else(|| DEFAULT_NOTES_DIR.to_string()),
            )),
        };

        let dates = parse_date_list(&lookup("NOTES_DATES").unwrap_or_else(|| DEFAULT_DATES.to_string()))
            .map_err(ConfigError::InvalidDate)?;

        let fetch_timeout = match lookup("NOTES_FETCH_TIMEOUT_MS") {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                _ => return Err(ConfigError::InvalidTimeout(value)),
            },
            None => Duration::from_millis(DEFAULT_TIMEOUT_MS),
        };

        let prefs_path = PathBuf::from(
            lookup("APP_PREFS_PATH").unwrap_or_else(|| DEFAULT_PREFS_PATH.to_string()),
        );

        Ok(Self {
            port,
            notes,
            dates,
            fetch_timeout,
            prefs_path,
        })
    }
}
