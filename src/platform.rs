//! Platform detection and per-OS paths
//!
//! The platform is detected once at startup and passed to the factories that
//! pick the mouse controller and the auto-start registration.

use crate::constants::{APP_DIR_NAME, CONFIG_FILE_NAME, LOCK_FILE_NAME};
use crate::error::ConfigError;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    Other,
}

impl Platform {
    /// Detect the platform this binary was built for
    pub fn detect() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Other
        }
    }

    /// True for a Linux session that only exposes Wayland
    ///
    /// Synthetic relative moves generally do not reach Wayland compositors
    /// unless XWayland is available.
    pub fn is_wayland_only(&self) -> bool {
        *self == Platform::Linux
            && std::env::var_os("WAYLAND_DISPLAY").is_some()
            && std::env::var_os("DISPLAY").is_none()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Windows => "windows",
            Platform::MacOs => "macos",
            Platform::Linux => "linux",
            Platform::Other => "other",
        };
        f.write_str(name)
    }
}

/// Get the application config directory
///
/// - macOS: `~/Library/Application Support/anti-screensaver`
/// - Linux: `~/.config/anti-screensaver`
/// - Windows: `%APPDATA%\anti-screensaver`
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or(ConfigError::NoConfigDir)
}

/// Get the standard config file path
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Get the single-instance lock file path (system temp dir)
pub fn lock_file_path() -> PathBuf {
    std::env::temp_dir().join(LOCK_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_matches_build_target() {
        let platform = Platform::detect();
        #[cfg(target_os = "linux")]
        assert_eq!(platform, Platform::Linux);
        #[cfg(target_os = "macos")]
        assert_eq!(platform, Platform::MacOs);
        #[cfg(target_os = "windows")]
        assert_eq!(platform, Platform::Windows);
        let _ = platform;
    }

    #[test]
    fn test_lock_file_in_temp_dir() {
        let path = lock_file_path();
        assert!(path.starts_with(std::env::temp_dir()));
        assert!(path.ends_with(LOCK_FILE_NAME));
    }

    #[test]
    fn test_non_linux_is_never_wayland_only() {
        assert!(!Platform::Windows.is_wayland_only());
        assert!(!Platform::MacOs.is_wayland_only());
    }
}
