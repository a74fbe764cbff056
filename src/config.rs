//! Application configuration
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use crate::clock::{is_valid_timestamp_format, DEFAULT_TIMESTAMP_FORMAT};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "TT_DATA_DIR";

const APP_DIR: &str = "task-tracker";

const TICK_RATE_RANGE: RangeInclusive<u64> = 1..=1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the store and the log live (defaults to the platform data dir)
    pub data_dir: Option<PathBuf>,
    /// chrono format string for task timestamps
    pub timestamp_format: String,
    /// Event poll interval; also how often stopwatches refresh on screen
    pub tick_rate_ms: u64,
    /// tracing filter used when RUST_LOG is unset
    pub log_filter: String,
    /// Mouse drag and drop
    pub mouse: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            tick_rate_ms: 200,
            log_filter: "info".to_string(),
            mouse: true,
        }
    }
}

impl Config {
    /// Resolved data directory: env override, then config, then platform default
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let base = directories::BaseDirs::new().context("cannot determine the home directory")?;
        Ok(base.data_dir().join(APP_DIR))
    }

    /// Replace hand-edited values the board can't run with.
    ///
    /// Runs before logging is set up, so problems go to stderr.
    fn sanitize(&mut self) {
        let rate = self.tick_rate_ms.clamp(*TICK_RATE_RANGE.start(), *TICK_RATE_RANGE.end());
        if rate != self.tick_rate_ms {
            eprintln!("Warning: tick_rate_ms {} out of range, using {}", self.tick_rate_ms, rate);
            self.tick_rate_ms = rate;
        }
        if !is_valid_timestamp_format(&self.timestamp_format) {
            eprintln!(
                "Warning: invalid timestamp_format '{}', using the default",
                self.timestamp_format
            );
            self.timestamp_format = DEFAULT_TIMESTAMP_FORMAT.to_string();
        }
    }

    /// Update one field from its textual form
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "data_dir" => {
                self.data_dir = if value.trim().is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            "timestamp_format" => {
                if value.trim().is_empty() {
                    anyhow::bail!("timestamp_format cannot be empty");
                }
                if !is_valid_timestamp_format(value) {
                    anyhow::bail!("timestamp_format '{}' is not a valid strftime format", value);
                }
                self.timestamp_format = value.to_string();
            }
            "tick_rate_ms" => {
                let rate: u64 = value
                    .parse()
                    .with_context(|| format!("tick_rate_ms must be a number, got '{}'", value))?;
                if !TICK_RATE_RANGE.contains(&rate) {
                    anyhow::bail!("tick_rate_ms must be between 1 and 1000");
                }
                self.tick_rate_ms = rate;
            }
            "log_filter" => self.log_filter = value.to_string(),
            "mouse" => {
                self.mouse = value
                    .parse()
                    .with_context(|| format!("mouse must be true or false, got '{}'", value))?;
            }
            _ => anyhow::bail!(
                "unknown config key '{}' (data_dir, timestamp_format, tick_rate_ms, log_filter, mouse)",
                key
            ),
        }
        Ok(())
    }
}

/// Config file location
/// Windows: %APPDATA%\task-tracker\config.toml
/// macOS: ~/Library/Application Support/task-tracker/config.toml
/// Linux: ~/.config/task-tracker/config.toml
pub fn get_config_path() -> Result<PathBuf> {
    let base = directories::BaseDirs::new().context("cannot determine the home directory")?;
    Ok(base.config_dir().join(APP_DIR).join("config.toml"))
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("cannot parse {}", path.display()))?;
    config.sanitize();

    Ok(config)
}

pub fn save_config_to(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;

    Ok(())
}

/// Load the config, writing the defaults on first run
pub fn load_or_init() -> Result<Config> {
    let path = get_config_path()?;
    if !path.exists() {
        let config = Config::default();
        // A read-only config dir shouldn't stop the app
        if let Err(e) = save_config_to(&path, &config) {
            eprintln!("Warning: cannot write default config to {}: {}", path.display(), e);
        }
        return Ok(config);
    }
    load_config_from(&path)
}

pub fn show_config() -> Result<()> {
    let path = get_config_path()?;
    let config = load_config_from(&path)?;
    println!("Current configuration:");
    println!("  data_dir:          {}", config.data_dir()?.display());
    println!("  timestamp_format:  {}", config.timestamp_format);
    println!("  tick_rate_ms:      {}", config.tick_rate_ms);
    println!("  log_filter:        {}", config.log_filter);
    println!("  mouse:             {}", config.mouse);
    println!();
    println!("Config file: {}", path.display());
    Ok(())
}

pub fn set_value(key: &str, value: &str) -> Result<()> {
    let path = get_config_path()?;
    let mut config = load_config_from(&path)?;
    config.set(key, value)?;
    save_config_to(&path, &config)?;
    println!("✓ {} set to {}", key, value);
    Ok(())
}
