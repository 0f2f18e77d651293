//! Application controller
//!
//! Owns the configuration store, the movement engine and the auto-start
//! registration, and turns user commands into [`Notice`]s for whatever UI is
//! attached (tray notifications or terminal output).

use crate::app_state::ApplicationState;
use crate::autostart::AutoStart;
use crate::config_file::{ConfigStore, RunningState};
use crate::constants::FAILURE_WARNING_THRESHOLD;
use crate::engine::{EngineEvent, MovementEngine};
use crate::error::EngineError;
use crate::mouse::MouseController;
use crate::scheduler::{Clock, SystemClock};
use log::{error, info, warn};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Display-ready message produced by a command or a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub body: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn warning(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn error(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            body: body.into(),
        }
    }
}

pub struct AppController<M: MouseController, C: Clock = SystemClock> {
    config: ConfigStore,
    engine: MovementEngine<M, C>,
    autostart: Option<Box<dyn AutoStart>>,
    /// Interval from --interval / environment, not persisted
    interval_override: Option<u64>,
    /// Last known OS registration; querying it can spawn a process
    auto_start_registered: bool,
}

impl<M: MouseController, C: Clock> AppController<M, C> {
    pub fn new(
        config: ConfigStore,
        engine: MovementEngine<M, C>,
        autostart: Option<Box<dyn AutoStart>>,
    ) -> Self {
        let auto_start_registered = autostart.as_ref().is_some_and(|a| a.is_enabled());
        Self {
            config,
            engine,
            autostart,
            interval_override: None,
            auto_start_registered,
        }
    }

    /// Use `interval` for this process instead of the configured one
    pub fn with_interval_override(mut self, interval: Option<u64>) -> Self {
        self.interval_override = interval;
        self
    }

    /// Interval the next start will use
    pub fn effective_interval(&self) -> u64 {
        self.interval_override.unwrap_or_else(|| self.config.interval())
    }

    pub fn start(&mut self) -> Notice {
        let interval = self.effective_interval();
        match self.engine.start(interval) {
            Ok(()) => Notice::info(
                "Anti-Screensaver",
                format!("Mouse movement started (every {}s)", interval),
            ),
            Err(EngineError::AlreadyRunning) => {
                Notice::info("Anti-Screensaver", "Mouse movement is already running")
            }
            Err(e) => {
                error!("Failed to start movement engine: {}", e);
                Notice::error("Start Error", e.to_string())
            }
        }
    }

    pub fn stop(&mut self) -> Notice {
        if self.engine.stop() {
            Notice::info("Anti-Screensaver", "Mouse movement stopped")
        } else {
            Notice::info("Anti-Screensaver", "Mouse movement is already stopped")
        }
    }

    pub fn toggle(&mut self) -> Notice {
        if self.engine.is_running() {
            self.stop()
        } else {
            self.start()
        }
    }

    /// Persist a new interval and retune a running engine
    pub fn set_interval(&mut self, seconds: u64) -> Notice {
        let stored = self.config.set_interval(seconds);
        self.interval_override = None;
        let saved = self.config.commit();

        if let Err(e) = self.engine.set_interval(stored) {
            error!("Engine rejected interval {}: {}", stored, e);
            return Notice::error("Interval Update Error", e.to_string());
        }

        let body = format!("Interval set to {}s", stored);
        if saved {
            Notice::info("Anti-Screensaver", body)
        } else {
            Notice::warning(
                "Anti-Screensaver",
                format!("{} (could not be saved to disk)", body),
            )
        }
    }

    /// Register or unregister launch at login, then persist the choice
    pub fn set_auto_start(&mut self, enabled: bool) -> Notice {
        let Some(autostart) = self.autostart.as_ref() else {
            warn!("Auto-start requested but not available on this platform");
            return Notice::warning(
                "Auto-Start",
                "Launch at login is not supported on this platform",
            );
        };

        let result = if enabled {
            autostart.enable()
        } else {
            autostart.disable()
        };

        match result {
            Ok(()) => {
                self.auto_start_registered = enabled;
                self.config.set_auto_start(enabled);
                self.config.commit();
                let body = if enabled {
                    "Anti-Screensaver will start at login"
                } else {
                    "Anti-Screensaver will no longer start at login"
                };
                Notice::info("Auto-Start", body)
            }
            Err(e) => {
                error!("Failed to update auto-start: {}", e);
                Notice::error("Auto-Start Error", e.to_string())
            }
        }
    }

    /// Bring the OS registration in line with the config file
    ///
    /// Covers a binary that moved since it was registered and a registration
    /// removed behind our back.
    pub fn reconcile_auto_start(&mut self) {
        let Some(autostart) = self.autostart.as_ref() else {
            return;
        };
        let wanted = self.config.auto_start();
        if wanted {
            // Rewrite unconditionally so the stored exe path is current
            match autostart.enable() {
                Ok(()) => self.auto_start_registered = true,
                Err(e) => {
                    warn!("Failed to refresh auto-start registration: {}", e);
                    self.auto_start_registered = autostart.is_enabled();
                }
            }
        } else if self.auto_start_registered {
            info!(
                "Auto-start registered at {} but disabled in config",
                autostart.location()
            );
        }
    }

    /// Whether this platform has a launch-at-login mechanism at all
    pub fn auto_start_available(&self) -> bool {
        self.autostart.is_some()
    }

    /// Registration state as of startup or the last change made here
    pub fn auto_start_enabled(&self) -> bool {
        self.auto_start_registered
    }

    /// Resume a session that was running at last shutdown
    pub fn restore_last_state(&mut self) -> Option<Notice> {
        if self.config.last_state() == RunningState::Running {
            info!("Restoring running state from last session");
            Some(self.start())
        } else {
            None
        }
    }

    /// Run a due tick and translate the outcome for the UI
    pub fn poll(&mut self) -> Option<Notice> {
        match self.engine.poll()? {
            EngineEvent::Moved(_) => None,
            EngineEvent::MoveFailed { consecutive, error } => {
                if consecutive >= FAILURE_WARNING_THRESHOLD {
                    Some(Notice::warning(
                        "Anti-Screensaver Error",
                        format!("Multiple movement failures ({}): {}", consecutive, error),
                    ))
                } else {
                    None
                }
            }
            EngineEvent::AutoStopped(reason) => Some(Notice::error(
                "Auto-Stopped",
                format!(
                    "Mouse movement was stopped due to repeated failures.\n{}\nPlease check your system permissions.",
                    reason
                ),
            )),
        }
    }

    /// Stop the engine and persist the last running state
    pub fn shutdown(&mut self) {
        let was_running = self.engine.is_running();
        self.engine.stop();
        self.config
            .set_last_state(RunningState::from_running(was_running));
        self.config.commit();
        info!("Shutdown complete (last state: {})", self.config.last_state());
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.engine.next_deadline()
    }

    /// Length of the running session, measured on the engine's clock
    pub fn session_elapsed(&self) -> Option<Duration> {
        self.engine.state().session_elapsed(self.engine.clock().now())
    }

    pub fn snapshot(&self) -> ApplicationState {
        self.engine.state().snapshot()
    }

    pub fn engine(&self) -> &MovementEngine<M, C> {
        &self.engine
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }
}
