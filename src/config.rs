use std::path::PathBuf;

use chrono::Duration;
use chrono_tz::Tz;
use thiserror::Error;

use crate::reminders::LocalClock;

/// Application-level constants
pub const APP_NAME: &str = "Praxis";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Hours subtracted from UTC to approximate clinic-local time when no zone is configured.
pub const DEFAULT_LOCAL_OFFSET_HOURS: i64 = 4;

/// Push gateway request timeout.
pub const DEFAULT_PUSH_TIMEOUT_SECS: u64 = 15;

const ENV_DB_PATH: &str = "PRAXIS_DB_PATH";
const ENV_REMINDER_TZ: &str = "PRAXIS_REMINDER_TZ";
const ENV_REMINDER_OFFSET_HOURS: &str = "PRAXIS_REMINDER_OFFSET_HOURS";
const ENV_PUSH_URL: &str = "PRAXIS_PUSH_URL";
const ENV_PUSH_TOKEN: &str = "PRAXIS_PUSH_TOKEN";
const ENV_PUSH_TIMEOUT_SECS: &str = "PRAXIS_PUSH_TIMEOUT_SECS";

/// Default tracing filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "info,praxis_lib=debug"
}

/// Get the application data directory (~/Praxis/).
///
/// Falls back to the working directory when no home directory is known
/// (containers, service accounts).
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default SQLite database location.
pub fn default_db_path() -> PathBuf {
    app_data_dir().join("praxis.db")
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid local offset: {0} (expected whole hours between -23 and 23)")]
    InvalidOffset(String),

    #[error("Unknown IANA time zone: {0}")]
    UnknownTimeZone(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Push gateway settings. Absent when no gateway URL is configured.
#[derive(Debug, Clone, PartialEq)]
pub struct PushConfig {
    pub url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
}

/// Runtime configuration for the reminder core.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderConfig {
    pub db_path: PathBuf,
    pub local_clock: LocalClock,
    pub push: Option<PushConfig>,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            local_clock: LocalClock::default(),
            push: None,
        }
    }
}

impl ReminderConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// A configured time zone takes precedence over the fixed offset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let db_path = get(ENV_DB_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);

        let local_clock = match get(ENV_REMINDER_TZ) {
            Some(name) => {
                let tz: Tz = name
                    .parse()
                    .map_err(|_| ConfigError::UnknownTimeZone(name.clone()))?;
                LocalClock::Zone(tz)
            }
            None => match get(ENV_REMINDER_OFFSET_HOURS) {
                Some(raw) => LocalClock::FixedOffset(parse_offset_hours(&raw)?),
                None => LocalClock::default(),
            },
        };

        let push = match get(ENV_PUSH_URL) {
            Some(url) => {
                let timeout_secs = match get(ENV_PUSH_TIMEOUT_SECS) {
                    Some(raw) => raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                        key: ENV_PUSH_TIMEOUT_SECS,
                        value: raw,
                    })?,
                    None => DEFAULT_PUSH_TIMEOUT_SECS,
                };
                Some(PushConfig {
                    url,
                    token: get(ENV_PUSH_TOKEN),
                    timeout_secs,
                })
            }
            None => None,
        };

        Ok(Self {
            db_path,
            local_clock,
            push,
        })
    }
}

fn parse_offset_hours(raw: &str) -> Result<Duration, ConfigError> {
    let hours: i64 = raw
        .parse()
        .map_err(|_| ConfigError::InvalidOffset(raw.to_string()))?;
    if !(-23..=23).contains(&hours) {
        return Err(ConfigError::InvalidOffset(raw.to_string()));
    }
    Ok(Duration::hours(hours))
}
