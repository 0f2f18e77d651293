//! Error taxonomy for the library crate
//!
//! Binaries wrap these in `anyhow` with context; library code returns them
//! directly so callers can match on the recoverable cases.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration load/save failures. Always recovered by the store.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create config directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine the user configuration directory")]
    NoConfigDir,
    #[error("config file {path} could not be read; not overwriting it")]
    Protected { path: PathBuf },
}

/// Movement engine command and runtime failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("movement engine is already running")]
    AlreadyRunning,
    #[error("interval must be between {min} and {max} seconds, got {got}")]
    InvalidInterval { got: u64, min: u64, max: u64 },
    #[error("mouse movement failed {failures} times in a row: {last_error}")]
    RepeatedFailures { failures: u32, last_error: String },
}

/// Platform mouse controller failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MouseError {
    #[error("mouse control unavailable: {0}")]
    Unavailable(String),
    #[error("mouse input failed: {0}")]
    Input(String),
}

/// Single-instance guard failures.
#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("another instance is already running (lock held on {0})")]
    AlreadyRunning(PathBuf),
    #[error("failed to open lock file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Auto-start registration failures.
#[derive(Debug, Error)]
pub enum AutoStartError {
    #[error("auto-start file error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("auto-start command `{command}` failed: {message}")]
    Command { command: String, message: String },
    #[error("could not determine the path of the running executable: {0}")]
    NoExecutable(#[source] std::io::Error),
    #[error("auto-start is not supported on this platform")]
    Unsupported,
}
