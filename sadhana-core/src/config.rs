//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/sadhana/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/sadhana/` (~/.config/sadhana/)
//! - Data: `$XDG_DATA_HOME/sadhana/` (~/.local/share/sadhana/)
//! - State/Logs: `$XDG_STATE_HOME/sadhana/` (~/.local/state/sadhana/)

use crate::analytics::calendar::Calendar;
use crate::analytics::heatmap::{DEFAULT_WEEKS, MAX_WEEKS};
use crate::error::{Error, Result};
use chrono::FixedOffset;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Day-boundary settings
    #[serde(default)]
    pub practice: PracticeConfig,

    /// Heatmap window settings
    #[serde(default)]
    pub heatmap: HeatmapConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Practice day settings.
///
/// Sessions are bucketed into calendar days using either the machine's local
/// timezone or, when `utc_offset` is set, a fixed offset such as `"+05:30"`.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct PracticeConfig {
    /// Fixed UTC offset for the practice day, e.g. "+05:30" or "-08:00"
    pub utc_offset: Option<String>,
}

impl PracticeConfig {
    /// Build the calendar used for day bucketing.
    pub fn calendar(&self) -> Result<Calendar> {
        match self.utc_offset.as_deref() {
            None => Ok(Calendar::Local),
            Some(raw) => parse_utc_offset(raw).map(Calendar::Fixed),
        }
    }
}

/// Parse an offset of the form `+HH:MM`, `-HH:MM`, `+HHMM` or `Z`.
fn parse_utc_offset(raw: &str) -> Result<FixedOffset> {
    let raw = raw.trim();
    let invalid = || Error::Config(format!("invalid practice.utc_offset: {:?}", raw));

    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = match raw.as_bytes().first() {
        Some(b'+') => (1, &raw[1..]),
        Some(b'-') => (-1, &raw[1..]),
        _ => return Err(invalid()),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
    let minutes: i32 = digits[2..].parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// Heatmap configuration
#[derive(Debug, Deserialize)]
pub struct HeatmapConfig {
    /// Number of trailing weeks shown in the heatmap
    #[serde(default = "default_heatmap_weeks")]
    pub weeks: usize,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            weeks: default_heatmap_weeks(),
        }
    }
}

impl HeatmapConfig {
    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.weeks == 0 {
            return Err(Error::Config(
                "heatmap.weeks must be at least 1".to_string(),
            ));
        }
        if self.weeks > MAX_WEEKS {
            return Err(Error::Config(format!(
                "heatmap.weeks must be at most {}, got {}",
                MAX_WEEKS, self.weeks
            )));
        }
        Ok(())
    }
}

fn default_heatmap_weeks() -> usize {
    DEFAULT_WEEKS
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate all sections
    pub fn validate(&self) -> Result<()> {
        self.practice.calendar()?;
        self.heatmap.validate()
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/sadhana/config.toml` (~/.config/sadhana/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("sadhana").join("config.toml")
    }

    /// Returns the data directory path (for SQLite database)
    ///
    /// `$XDG_DATA_HOME/sadhana/` (~/.local/share/sadhana/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("sadhana")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/sadhana/` (~/.local/state/sadhana/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("sadhana")
    }

    /// Returns the database file path
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("sadhana.db")
    }

    /// Returns the log file path
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("sadhana.log")
    }
}
