//! Configuration file management
//!
//! This module handles loading and saving `config.json`. Loading is lenient:
//! every field is validated on its own, out-of-range intervals are clamped,
//! and a file that cannot be parsed is backed up and replaced by defaults.
//! Saving goes through a temporary file in the same directory followed by a
//! rename, so a reader never sees a partially written config.

use crate::constants::{
    CONFIG_BACKUP_SUFFIX, CONFIG_SCHEMA_VERSION, INTERVAL_DEFAULT_SECONDS, INTERVAL_MAX_SECONDS,
    INTERVAL_MIN_SECONDS,
};
use crate::error::ConfigError;
use crate::platform;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Last known running state, used to restore the session on next launch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunningState {
    Running,
    #[default]
    Stopped,
}

impl RunningState {
    pub fn from_running(is_running: bool) -> Self {
        if is_running {
            RunningState::Running
        } else {
            RunningState::Stopped
        }
    }
}

impl fmt::Display for RunningState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunningState::Running => f.write_str("running"),
            RunningState::Stopped => f.write_str("stopped"),
        }
    }
}

/// Application configuration stored in config.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Seconds between nudges (10-300, default: 30)
    pub interval_seconds: u64,
    /// Register the app to launch at login
    pub auto_start: bool,
    /// Running state at last shutdown (restoration hint only)
    pub last_state: RunningState,
    /// Config schema version (X.Y.Z)
    pub version: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval_seconds: INTERVAL_DEFAULT_SECONDS,
            auto_start: false,
            last_state: RunningState::Stopped,
            version: CONFIG_SCHEMA_VERSION.to_string(),
        }
    }
}

/// Clamp an interval into the allowed range
pub fn clamp_interval(seconds: u64) -> u64 {
    seconds.clamp(INTERVAL_MIN_SECONDS, INTERVAL_MAX_SECONDS)
}

/// True for `X.Y.Z` where each part is one or more ASCII digits
pub fn is_semver(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

impl Config {
    /// Validate config values
    ///
    /// Returns a list of problems (empty if valid).
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !(INTERVAL_MIN_SECONDS..=INTERVAL_MAX_SECONDS).contains(&self.interval_seconds) {
            errors.push(format!(
                "interval_seconds must be between {} and {}, got {}",
                INTERVAL_MIN_SECONDS, INTERVAL_MAX_SECONDS, self.interval_seconds
            ));
        }
        if !is_semver(&self.version) {
            errors.push(format!(
                "version must match semver format (X.Y.Z), got {}",
                self.version
            ));
        }
        errors
    }

    /// Build a config from arbitrary JSON, repairing each field independently
    ///
    /// Returns the repaired config and a list of warnings describing every
    /// field that was clamped, coerced or replaced.
    pub fn from_json_value(value: &Value) -> (Self, Vec<String>) {
        let defaults = Config::default();
        let mut warnings = Vec::new();

        let interval_seconds = match value.get("interval_seconds") {
            None | Some(Value::Null) => defaults.interval_seconds,
            Some(raw) => match parse_interval(raw) {
                Some(seconds) => {
                    let clamped = clamp_interval(seconds);
                    if clamped != seconds {
                        warnings.push(format!(
                            "interval_seconds {} out of range, clamped to {}",
                            seconds, clamped
                        ));
                    }
                    clamped
                }
                None => {
                    warnings.push(format!(
                        "interval_seconds {} is not a number, using default {}",
                        raw, defaults.interval_seconds
                    ));
                    defaults.interval_seconds
                }
            },
        };

        let auto_start = match value.get("auto_start") {
            None | Some(Value::Null) => defaults.auto_start,
            Some(raw) => match coerce_bool(raw) {
                Some(flag) => {
                    if !raw.is_boolean() {
                        warnings.push(format!("auto_start {} coerced to {}", raw, flag));
                    }
                    flag
                }
                None => {
                    warnings.push(format!("auto_start {} is not a boolean, using false", raw));
                    false
                }
            },
        };

        let last_state = match value.get("last_state").and_then(Value::as_str) {
            Some("running") => RunningState::Running,
            Some("stopped") | None => RunningState::Stopped,
            Some(other) => {
                warnings.push(format!("last_state '{}' unknown, using stopped", other));
                RunningState::Stopped
            }
        };

        let version = match value.get("version").and_then(Value::as_str) {
            Some(v) if is_semver(v) => v.to_string(),
            Some(v) => {
                warnings.push(format!(
                    "version '{}' is not X.Y.Z, using {}",
                    v, CONFIG_SCHEMA_VERSION
                ));
                defaults.version.clone()
            }
            None => defaults.version.clone(),
        };

        (
            Self {
                interval_seconds,
                auto_start,
                last_state,
                version,
            },
            warnings,
        )
    }

    /// Load config from a specific path
    ///
    /// Returns `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Failed to read file
    /// - The file is not valid UTF-8 JSON, or not a JSON object
    pub fn load_from_path(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        // Invalid UTF-8 surfaces as a parse error, so it gets backed up
        let value: Value = serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if !value.is_object() {
            return Err(ConfigError::Parse {
                path: path.to_path_buf(),
                source: <serde_json::Error as serde::de::Error>::custom(
                    "top-level value is not an object",
                ),
            });
        }

        let (config, warnings) = Self::from_json_value(&value);
        for warning in &warnings {
            warn!("Config {}: {}", path.display(), warning);
        }
        Ok(Some(config))
    }

    /// Save config atomically to a specific path
    ///
    /// Creates the parent directory if it doesn't exist. The file is written
    /// to a temporary sibling, synced, then renamed over the target.
    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(|source| ConfigError::Directory {
            path: dir.to_path_buf(),
            source,
        })?;

        let write_err = |source: std::io::Error| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| write_err(std::io::Error::other(e)))?;

        let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
        temp.write_all(contents.as_bytes()).map_err(write_err)?;
        temp.write_all(b"\n").map_err(write_err)?;
        temp.as_file().sync_all().map_err(write_err)?;
        temp.persist(path).map_err(|e| write_err(e.error))?;

        Ok(())
    }
}

fn parse_interval(raw: &Value) -> Option<u64> {
    match raw {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Some(u)
            } else if n.as_i64().is_some() {
                // Negative; clamps to the minimum
                Some(0)
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite())
                    .map(|f| f.max(0.0).round() as u64)
            }
        }
        Value::String(s) => parse_interval_text(s),
        _ => None,
    }
}

/// Parse an interval written as text; negative values map to 0 so the
/// caller's clamp raises them to the minimum
pub(crate) fn parse_interval_text(text: &str) -> Option<u64> {
    let text = text.trim();
    text.parse::<u64>()
        .ok()
        .or_else(|| text.parse::<i64>().ok().map(|_| 0))
}

fn coerce_bool(raw: &Value) -> Option<bool> {
    match raw {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Owned configuration plus the file it lives in
///
/// The store never fails the process: read problems fall back to defaults and
/// write problems leave the store running from memory.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    config: Config,
    persisted: bool,
    /// False when an existing file could be neither read nor backed up;
    /// saving would destroy it
    writable: bool,
}

impl ConfigStore {
    /// Open the config at the standard location
    ///
    /// - macOS: `~/Library/Application Support/anti-screensaver/config.json`
    /// - Linux: `~/.config/anti-screensaver/config.json`
    /// - Windows: `%APPDATA%\anti-screensaver\config.json`
    pub fn open_default() -> Self {
        match platform::config_file_path() {
            Ok(path) => Self::open(path),
            Err(e) => {
                warn!("{} - configuration will not be saved", e);
                Self::in_memory(Config::default())
            }
        }
    }

    /// Open (or create) the config at a specific path
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let (config, writable) = match Config::load_from_path(&path) {
            Ok(Some(config)) => {
                info!("Configuration loaded from: {}", path.display());
                return Self {
                    path,
                    config,
                    persisted: true,
                    writable: true,
                };
            }
            Ok(None) => {
                info!("No configuration at {}, creating defaults", path.display());
                (Config::default(), true)
            }
            Err(e @ ConfigError::Parse { .. }) => {
                warn!("{}", e);
                match backup_file(&path) {
                    Ok(backup) => {
                        warn!("Corrupted config backed up to {}", backup.display());
                        (Config::default(), true)
                    }
                    Err(err) => {
                        warn!("Failed to back up corrupted config, leaving it untouched: {}", err);
                        (Config::default(), false)
                    }
                }
            }
            Err(e) => {
                warn!("{} - using defaults without saving", e);
                (Config::default(), false)
            }
        };

        let mut store = Self {
            path,
            config,
            persisted: false,
            writable,
        };
        if writable {
            store.commit();
        }
        store
    }

    /// A store that never touches disk
    pub fn in_memory(config: Config) -> Self {
        Self {
            path: PathBuf::new(),
            config,
            persisted: false,
            writable: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn interval(&self) -> u64 {
        self.config.interval_seconds
    }

    pub fn auto_start(&self) -> bool {
        self.config.auto_start
    }

    pub fn last_state(&self) -> RunningState {
        self.config.last_state
    }

    /// Whether the last save reached disk
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Set the interval, clamped into range. Returns the stored value.
    pub fn set_interval(&mut self, seconds: u64) -> u64 {
        let clamped = clamp_interval(seconds);
        if clamped != seconds {
            warn!("Interval {} out of range, clamped to {}", seconds, clamped);
        }
        self.config.interval_seconds = clamped;
        clamped
    }

    pub fn set_auto_start(&mut self, enabled: bool) {
        self.config.auto_start = enabled;
    }

    pub fn set_last_state(&mut self, state: RunningState) {
        self.config.last_state = state;
    }

    /// Write the current config to disk
    pub fn save(&self) -> Result<(), ConfigError> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigError::NoConfigDir);
        }
        if !self.writable {
            return Err(ConfigError::Protected {
                path: self.path.clone(),
            });
        }
        self.config.save_to_path(&self.path)
    }

    /// Save, downgrading failure to a warning
    ///
    /// Returns false when the config only lives in memory now.
    pub fn commit(&mut self) -> bool {
        match self.save() {
            Ok(()) => {
                self.persisted = true;
                log::debug!("Configuration saved to: {}", self.path.display());
                true
            }
            Err(e) => {
                self.persisted = false;
                warn!("Continuing with in-memory configuration: {}", e);
                false
            }
        }
    }
}

fn backup_file(path: &Path) -> std::io::Result<PathBuf> {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".");
    name.push(CONFIG_BACKUP_SUFFIX);
    let backup = path.with_file_name(name);
    fs::copy(path, &backup)?;
    Ok(backup)
}
