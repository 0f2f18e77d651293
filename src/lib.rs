// Library interface for Anti-Screensaver
// Shared by the tray app, the headless CLI and the integration tests

pub mod app_state;
pub mod autostart;
pub mod config;
pub mod config_file;
pub mod constants;
pub mod controller;
pub mod engine;
pub mod error;
pub mod instance_lock;
pub mod logging;
pub mod mouse;
pub mod platform;
pub mod scheduler;
pub mod ui;

pub use app_state::{AppState, ApplicationState};
pub use config_file::{Config, ConfigStore, RunningState};
pub use controller::{AppController, Notice, NoticeLevel};
pub use engine::{EngineEvent, MovementEngine};
pub use error::{AutoStartError, ConfigError, EngineError, InstanceError, MouseError};
pub use instance_lock::InstanceLock;
pub use mouse::{MouseController, MouseMovement};
pub use platform::Platform;

use anyhow::{Context, Result};
use log::{info, warn};

/// Controller wired to the real pointer, config file and login registration
pub type SystemController = AppController<Box<dyn MouseController>>;

/// Build the controller both binaries run
///
/// The auto-start registration is optional: if it cannot be set up the app
/// still runs and the menu entry reports it as unsupported.
pub fn build_controller(platform: Platform, interval_override: Option<u64>) -> Result<SystemController> {
    let mouse = mouse::create_controller(platform).context("Failed to initialize mouse control")?;
    if !mouse.test_control() {
        warn!("Mouse position could not be read; movements may fail");
    }

    let config = ConfigStore::open_default();
    info!(
        "Loaded config from {} (interval {}s, auto-start {}, last state {})",
        config.path().display(),
        config.interval(),
        config.auto_start(),
        config.last_state()
    );

    let autostart = match autostart::current_exe().and_then(|exe| autostart::for_platform(platform, exe)) {
        Ok(autostart) => Some(autostart),
        Err(e) => {
            warn!("Auto-start unavailable: {}", e);
            None
        }
    };

    let engine = MovementEngine::new(mouse, AppState::new());
    Ok(AppController::new(config, engine, autostart).with_interval_override(interval_override))
}
