//! Configuration overrides for Anti-Screensaver
//!
//! This module handles the environment variable that can optionally override
//! the interval from the config file. The primary configuration source is
//! config.json (see config_file module).
//!
//! Environment variables (all optional):
//! - ANTI_SCREENSAVER_INTERVAL: Override the movement interval for this run
//!
//! Precedence: command-line flag > environment variable > config file.

use crate::config_file::{clamp_interval, parse_interval_text};
use crate::constants::{INTERVAL_MAX_SECONDS, INTERVAL_MIN_SECONDS};
use log::{debug, info, warn};
use std::env;

pub const INTERVAL_ENV_VAR: &str = "ANTI_SCREENSAVER_INTERVAL";

/// Parse an interval override value
///
/// Returns Some(seconds) clamped into 10-300, or None if not a number.
/// Negative values clamp to the minimum, as they do in config.json.
pub fn parse_interval_value(val: &str) -> Option<u64> {
    match parse_interval_text(val) {
        Some(seconds) => {
            let clamped = clamp_interval(seconds);
            if clamped != seconds {
                warn!(
                    "Interval override '{}' out of range ({}-{} seconds), clamped to {}",
                    val.trim(),
                    INTERVAL_MIN_SECONDS,
                    INTERVAL_MAX_SECONDS,
                    clamped
                );
            }
            Some(clamped)
        }
        None => {
            warn!("Failed to parse interval override '{}'. Ignored.", val);
            None
        }
    }
}

/// Parse the ANTI_SCREENSAVER_INTERVAL environment variable
pub fn parse_interval_override() -> Option<u64> {
    match env::var(INTERVAL_ENV_VAR) {
        Ok(val) => {
            let parsed = parse_interval_value(&val);
            if let Some(seconds) = parsed {
                info!("Interval set via environment variable: {} seconds", seconds);
            }
            parsed
        }
        Err(_) => {
            debug!("{} not set.", INTERVAL_ENV_VAR);
            None
        }
    }
}

/// Interval override for this run: command-line flag, then environment
///
/// Returns None when neither is set, meaning the config file value applies.
pub fn resolve_interval_override(cli: Option<u64>) -> Option<u64> {
    if let Some(seconds) = cli {
        let clamped = clamp_interval(seconds);
        if clamped != seconds {
            warn!(
                "Invalid --interval value: {} (must be {}-{} seconds). Clamped to {}.",
                seconds, INTERVAL_MIN_SECONDS, INTERVAL_MAX_SECONDS, clamped
            );
        } else {
            info!("Interval set via --interval argument: {} seconds", seconds);
        }
        return Some(clamped);
    }
    parse_interval_override()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_interval_valid_values() {
        assert_eq!(parse_interval_value("10"), Some(10), "Should accept 10 seconds");
        assert_eq!(parse_interval_value("60"), Some(60), "Should accept 60 seconds");
        assert_eq!(parse_interval_value(" 120 "), Some(120), "Should trim whitespace");
        assert_eq!(parse_interval_value("300"), Some(300), "Should accept 300 seconds");
    }

    #[test]
    fn test_parse_interval_boundary_cases() {
        assert_eq!(parse_interval_value("9"), Some(10), "Should clamp 9 up to 10");
        assert_eq!(parse_interval_value("0"), Some(10), "Should clamp 0 up to 10");
        assert_eq!(parse_interval_value("301"), Some(300), "Should clamp 301 down to 300");
        assert_eq!(parse_interval_value("5000"), Some(300), "Should clamp 5000 down to 300");
        assert_eq!(parse_interval_value("-60"), Some(10), "Should clamp negative value up to 10");
    }

    #[test]
    fn test_parse_interval_invalid_values() {
        assert_eq!(parse_interval_value("-6.5"), None, "Should reject fractional value");
        assert_eq!(parse_interval_value("invalid"), None, "Should reject non-numeric value");
        assert_eq!(parse_interval_value("30s"), None, "Should reject value with units");
        assert_eq!(parse_interval_value(""), None, "Should reject empty string");
    }

    #[test]
    fn test_resolve_interval_precedence() {
        // Only this test touches the variable
        env::set_var(INTERVAL_ENV_VAR, "45");
        assert_eq!(resolve_interval_override(Some(90)), Some(90), "CLI flag wins");
        assert_eq!(resolve_interval_override(None), Some(45), "Environment used without flag");
        assert_eq!(resolve_interval_override(Some(1)), Some(10), "CLI flag is clamped");

        env::set_var(INTERVAL_ENV_VAR, "garbage");
        assert_eq!(resolve_interval_override(None), None, "Bad environment is ignored");

        env::remove_var(INTERVAL_ENV_VAR);
        assert_eq!(resolve_interval_override(None), None, "Config file applies when nothing is set");
    }
}
