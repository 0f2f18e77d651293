//! Centralized constants for Anti-Screensaver
//!
//! This module contains all configurable numerical values used throughout
//! the application. Each constant includes documentation on its purpose,
//! unit, and recommended value range.

// ============================================================================
// MOVEMENT INTERVAL
// ============================================================================

/// Minimum interval between two mouse nudges.
/// Unit: seconds
/// Range: Fixed minimum, do not change without updating tray presets
pub const INTERVAL_MIN_SECONDS: u64 = 10;

/// Maximum interval between two mouse nudges.
/// Unit: seconds
/// Range: Fixed maximum (5 minutes), most idle timers are longer than this
pub const INTERVAL_MAX_SECONDS: u64 = 300;

/// Default interval when no config exists.
/// Unit: seconds
pub const INTERVAL_DEFAULT_SECONDS: u64 = 30;

/// Intervals offered in the tray "Interval" submenu.
/// Unit: seconds
/// Range: Every entry must lie within INTERVAL_MIN_SECONDS..=INTERVAL_MAX_SECONDS
pub const INTERVAL_PRESETS_SECONDS: [u64; 5] = [10, 30, 60, 120, 300];

// ============================================================================
// MOVEMENT ENGINE
// ============================================================================

/// Size of each nudge along both axes.
/// Unit: pixels
/// Range: 1-2 (anything larger becomes visible)
pub const NUDGE_PIXELS: i32 = 1;

/// Consecutive failed movements that stop the engine.
/// Unit: count
pub const ERROR_THRESHOLD: u32 = 5;

/// Consecutive failures after which the user gets a warning notification.
/// Unit: count
/// Range: Must be < ERROR_THRESHOLD
pub const FAILURE_WARNING_THRESHOLD: u32 = 3;

// ============================================================================
// POLLING & EVENT LOOP
// ============================================================================

/// How often the tray refreshes its tooltip and status line while idle.
/// Unit: milliseconds
/// Recommended range: 500-2000 (status text shows whole seconds)
pub const UI_REFRESH_INTERVAL_MS: u64 = 1000;

// ============================================================================
// TRAY ICON
// ============================================================================

/// Edge length of the generated tray icon.
/// Unit: pixels
/// Range: 16-64 (the OS scales it down to the tray height)
pub const TRAY_ICON_SIZE: u32 = 32;

/// Fill color while the engine is running (RGBA, green).
pub const TRAY_ICON_RUNNING_RGBA: [u8; 4] = [76, 175, 80, 255];

/// Fill color while the engine is stopped (RGBA, gray).
pub const TRAY_ICON_STOPPED_RGBA: [u8; 4] = [128, 128, 128, 255];

// ============================================================================
// NOTIFICATION TIMEOUTS
// ============================================================================

/// Standard notification display duration.
/// Unit: milliseconds
/// Recommended range: 2000-5000 (long enough to read, short enough to not annoy)
pub const NOTIFICATION_TIMEOUT_MS: u32 = 3000;

/// Error notification display duration (longer for important messages).
/// Unit: milliseconds
/// Recommended range: 4000-10000 (errors need more attention)
pub const NOTIFICATION_ERROR_TIMEOUT_MS: u32 = 5000;

// ============================================================================
// FILES
// ============================================================================

/// Directory name under the platform config dir.
pub const APP_DIR_NAME: &str = "anti-screensaver";

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Suffix appended to a corrupted config file before it is replaced.
pub const CONFIG_BACKUP_SUFFIX: &str = "bak";

/// Single-instance lock file name (placed in the temp dir).
pub const LOCK_FILE_NAME: &str = "anti-screensaver.lock";

/// Schema version written to new config files.
/// Range: Must match `\d+\.\d+\.\d+`
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";

// ============================================================================
// AUTO-START
// ============================================================================

/// Name used for the Windows Run key value.
pub const AUTOSTART_RUN_VALUE: &str = "AntiScreensaver";

/// macOS LaunchAgent label (also the plist file stem).
pub const AUTOSTART_LAUNCH_AGENT_LABEL: &str = "com.antiscreensaver.mousemover";

/// XDG autostart desktop entry file name.
pub const AUTOSTART_DESKTOP_FILE: &str = "anti-screensaver.desktop";

/// Flag passed to the binary when launched at login.
pub const MINIMIZED_FLAG: &str = "--minimized";
