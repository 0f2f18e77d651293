//! Launch-at-login registration
//!
//! Each OS keeps the registration somewhere different: an XDG desktop entry,
//! a LaunchAgent plist, or a value under the Windows Run key. All of them
//! relaunch the current executable with `--minimized`.

pub mod desktop_entry;
pub mod launch_agent;
pub mod run_key;

pub use desktop_entry::DesktopEntryAutoStart;
pub use launch_agent::LaunchAgentAutoStart;
pub use run_key::RunKeyAutoStart;

use crate::error::AutoStartError;
use crate::platform::Platform;
use std::path::PathBuf;

pub trait AutoStart {
    /// Register the app to start at login (idempotent)
    fn enable(&self) -> Result<(), AutoStartError>;

    /// Remove the registration (no-op when absent)
    fn disable(&self) -> Result<(), AutoStartError>;

    fn is_enabled(&self) -> bool;

    /// Human readable location of the registration, for logs
    fn location(&self) -> String;
}

/// Path of the running binary
pub fn current_exe() -> Result<PathBuf, AutoStartError> {
    std::env::current_exe().map_err(AutoStartError::NoExecutable)
}

/// Pick the registration mechanism for a platform
pub fn for_platform(
    platform: Platform,
    exe: PathBuf,
) -> Result<Box<dyn AutoStart>, AutoStartError> {
    match platform {
        Platform::Linux => Ok(Box::new(DesktopEntryAutoStart::for_user(exe)?)),
        Platform::MacOs => Ok(Box::new(LaunchAgentAutoStart::for_user(exe)?)),
        Platform::Windows => Ok(Box::new(RunKeyAutoStart::new(exe))),
        Platform::Other => Err(AutoStartError::Unsupported),
    }
}
