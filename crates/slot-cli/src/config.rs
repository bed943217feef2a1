//! Persistent settings: selected calendar, default working hours, last location.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use slot_engine::{parse_tz, WorkingHours};
use tracing::debug;

/// Working hours as stored on disk (`HH:MM` strings).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursConfig {
    pub start: String,
    pub end: String,
}

impl Default for HoursConfig {
    fn default() -> Self {
        Self {
            start: "11:00".to_string(),
            end: "19:00".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub selected_calendar: Option<String>,
    pub working_hours: HoursConfig,
    pub last_location: String,
    /// IANA zone the working hours are defined in.
    pub reference_timezone: String,
    /// JSON file the calendars are read from.
    pub calendar_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            selected_calendar: None,
            working_hours: HoursConfig::default(),
            last_location: String::new(),
            reference_timezone: "UTC".to_string(),
            calendar_file: None,
        }
    }
}

impl Config {
    /// Load from `path`, or return defaults if the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Write to `path` as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json + "\n")
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        debug!(path = %path.display(), "saved config");
        Ok(())
    }

    pub fn working_hours(&self) -> Result<WorkingHours> {
        WorkingHours::parse(&self.working_hours.start, &self.working_hours.end)
            .context("Configured working hours are invalid; fix them with `slots config set`")
    }

    pub fn reference_tz(&self) -> Result<Tz> {
        parse_tz(&self.reference_timezone).context("Configured reference timezone is invalid")
    }
}

/// `<config dir>/slots/config.json`, or `./slots-config.json` without a config dir.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("slots").join("config.json"))
        .unwrap_or_else(|| PathBuf::from("slots-config.json"))
}
