//! Bot configuration.
//!
//! Built once at startup and shared read-only afterwards. Sources, highest
//! priority first:
//! 1. Environment variables (`TALLY_*`, `__` between sections, e.g.
//!    `TALLY_SLACK__TOKEN`, `TALLY_GOAL__TARGET_VALUE`)
//! 2. The TOML file given with `--config` (default `tally.toml`, optional)
//! 3. Built-in defaults
//!
//! A `.env` file in the working directory is loaded into the environment
//! first.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tally_chat::SlackConfig;
use tally_core::GoalSpec;
use tally_progress::DEFAULT_VELOCITY_WINDOW;
use thiserror::Error;
use tracing::{debug, warn};

/// Default config file name.
pub const DEFAULT_CONFIG_FILE: &str = "tally.toml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// A configuration field has an invalid value.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

const fn default_port() -> u16 {
    3000
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    #[serde(default)]
    pub slack: SlackSection,

    /// Channel the tally is counted in and the report is posted to.
    #[serde(default)]
    pub channel: String,

    /// HTTP port for the Slack Events API listener.
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub goal: GoalSection,

    #[serde(default)]
    pub report: ReportSection,

    #[serde(default)]
    pub storage: StorageSection,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            slack: SlackSection::default(),
            channel: String::new(),
            port: default_port(),
            goal: GoalSection::default(),
            report: ReportSection::default(),
            storage: StorageSection::default(),
        }
    }
}

/// Slack credentials and client settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SlackSection {
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_base() -> String {
    tally_chat::slack::DEFAULT_API_BASE.to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for SlackSection {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_base: default_api_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// The counting goal.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoalSection {
    pub target_date: NaiveDate,
    pub target_value: i64,
}

impl Default for GoalSection {
    fn default() -> Self {
        Self {
            target_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap_or_default(),
            target_value: 300_000,
        }
    }
}

/// Daily report settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportSection {
    /// UTC time of day the report fires, `HH:MM`.
    #[serde(default = "default_report_at")]
    pub at: String,
    /// How many recent messages to scan for the latest tally.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Days averaged for the velocity line.
    #[serde(default = "default_velocity_window")]
    pub velocity_window: usize,
}

fn default_report_at() -> String {
    "00:00".to_string()
}

const fn default_history_limit() -> usize {
    100
}

const fn default_velocity_window() -> usize {
    DEFAULT_VELOCITY_WINDOW
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            at: default_report_at(),
            history_limit: default_history_limit(),
            velocity_window: default_velocity_window(),
        }
    }
}

/// Where daily records are kept.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSection {
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from(".tally")
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

impl BotConfig {
    /// Load from defaults, the TOML file at `path` (if it exists) and the
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::figment(path).extract().map_err(ConfigError::from)
    }

    /// Like [`load`](Self::load), after loading `.env` from the current
    /// directory. A missing `.env` is fine; an unreadable one is logged and
    /// skipped.
    pub fn load_with_dotenv(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenv_outcome(dotenvy::dotenv());
        Self::load(path)
    }

    /// The provider chain, exposed so tests can extract from it directly.
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        if file.exists() {
            figment = figment.merge(Toml::file(file));
        }

        figment.merge(Env::prefixed("TALLY_").split("__"))
    }

    /// Check everything the live bot needs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slack.token.trim().is_empty() {
            return Err(ConfigError::invalid("slack.token", "must be set"));
        }
        if self.channel.trim().is_empty() {
            return Err(ConfigError::invalid("channel", "must be set"));
        }
        if self.report.velocity_window == 0 {
            return Err(ConfigError::invalid("report.velocity_window", "must be at least 1"));
        }
        self.report_time()?;
        Ok(())
    }

    /// Parsed report time of day (UTC).
    pub fn report_time(&self) -> Result<NaiveTime, ConfigError> {
        NaiveTime::parse_from_str(&self.report.at, "%H:%M")
            .map_err(|e| ConfigError::invalid("report.at", format!("expected HH:MM: {e}")))
    }

    /// The goal as the engine sees it.
    pub fn goal(&self) -> GoalSpec {
        GoalSpec::new(self.goal.target_date, self.goal.target_value)
    }

    /// Settings for the Slack client.
    pub fn slack_config(&self) -> SlackConfig {
        SlackConfig {
            token: self.slack.token.clone(),
            api_base: self.slack.api_base.clone(),
            timeout: Duration::from_secs(self.slack.timeout_secs),
        }
    }
}

/// Log the result of loading a `.env` file, returning the path loaded.
fn dotenv_outcome(result: Result<PathBuf, dotenvy::Error>) -> Option<PathBuf> {
    match result {
        Ok(path) => {
            debug!("Loaded environment from {}", path.display());
            Some(path)
        }
        Err(e) if e.not_found() => None,
        Err(e) => {
            warn!("Ignoring unreadable .env file: {}", e);
            None
        }
    }
}
