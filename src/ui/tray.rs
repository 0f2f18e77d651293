//! Tray icon and its dropdown menu
//!
//! The menu is rebuilt from a [`TrayView`] on every refresh; nothing in here
//! owns application state. Menu clicks are mapped back to [`TrayCommand`]s
//! for the controller.

use crate::app_state::ApplicationState;
use crate::constants::INTERVAL_PRESETS_SECONDS;
use crate::ui::icon;
use anyhow::{Context, Result};
use log::{debug, error};
use std::time::{Duration, Instant};
use tray_icon::menu::{CheckMenuItem, Menu, MenuId, MenuItem, PredefinedMenuItem, Submenu};
use tray_icon::{TrayIcon, TrayIconBuilder};

const APP_TITLE: &str = "Anti-Screensaver Mouse Mover";

/// What a menu click asks the controller to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayCommand {
    Toggle,
    SetInterval(u64),
    ToggleAutoStart,
    ShowVersion,
    Quit,
}

/// Everything the tray displays, captured once per refresh
#[derive(Debug, Clone)]
pub struct TrayView {
    pub state: ApplicationState,
    pub interval_seconds: u64,
    pub auto_start: bool,
    /// False when no launch-at-login mechanism exists on this platform
    pub auto_start_available: bool,
    /// Length of the current session, None when stopped
    pub uptime: Option<Duration>,
    pub now: Instant,
}

pub fn toggle_label(running: bool) -> &'static str {
    if running {
        "Stop"
    } else {
        "Start"
    }
}

fn format_duration(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

fn format_ago(elapsed: Duration) -> String {
    format!("{} ago", format_duration(elapsed))
}

/// Disabled status line shown under the toggle
pub fn status_line(view: &TrayView) -> String {
    let state = &view.state;
    if state.is_running {
        match state.last_movement_timestamp {
            Some(at) => format!(
                "Running: {} moves, last {}",
                state.movement_count,
                format_ago(view.now.saturating_duration_since(at))
            ),
            None => format!("Running: {} moves", state.movement_count),
        }
    } else if state.stop_reason.is_some() {
        "Stopped after repeated failures".to_string()
    } else {
        "Stopped".to_string()
    }
}

/// Hover text of the tray icon
pub fn tooltip(view: &TrayView) -> String {
    let state = &view.state;
    let status = if state.is_running { "Running" } else { "Stopped" };
    let mut text = format!(
        "{}\nStatus: {}\nInterval: {}s",
        APP_TITLE, status, view.interval_seconds
    );
    if state.is_running {
        if let Some(uptime) = view.uptime {
            text.push_str(&format!("\nUptime: {}", format_duration(uptime)));
        }
        if state.movement_count > 0 {
            text.push_str(&format!("\nMovements: {}", state.movement_count));
        }
    }
    if state.error_count > 0 {
        text.push_str(&format!("\nFailures in a row: {}", state.error_count));
    }
    text
}

fn interval_label(seconds: u64) -> String {
    if seconds % 60 == 0 {
        let minutes = seconds / 60;
        format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" })
    } else {
        format!("{} seconds", seconds)
    }
}

pub struct TrayMenu {
    menu: Menu,
    toggle_item: MenuItem,
    status_item: MenuItem,
    interval_menu: Submenu,
    interval_items: Vec<(u64, CheckMenuItem)>,
    autostart_item: CheckMenuItem,
    version_item: MenuItem,
    quit_item: MenuItem,
    tray: Option<TrayIcon>,
    shown_running: Option<bool>,
}

impl TrayMenu {
    pub fn new(version: &str) -> Result<Self> {
        let toggle_item = MenuItem::new(toggle_label(false), true, None);
        let status_item = MenuItem::new("Stopped", false, None);
        let interval_menu = Submenu::new("Interval", true);
        let mut interval_items = Vec::with_capacity(INTERVAL_PRESETS_SECONDS.len());
        for seconds in INTERVAL_PRESETS_SECONDS {
            let item = CheckMenuItem::new(interval_label(seconds), true, false, None);
            interval_menu
                .append(&item)
                .context("Failed to add interval menu item")?;
            interval_items.push((seconds, item));
        }
        let autostart_item = CheckMenuItem::new("Start at login", true, false, None);
        let version_item = MenuItem::new(format!("Version {}", version), true, None);
        let quit_item = MenuItem::new("Quit", true, None);

        let menu = Menu::new();
        menu.append(&toggle_item).context("Failed to add toggle menu item")?;
        menu.append(&status_item).context("Failed to add status menu item")?;
        menu.append(&PredefinedMenuItem::separator())
            .context("Failed to add separator")?;
        menu.append(&interval_menu).context("Failed to add interval submenu")?;
        menu.append(&autostart_item)
            .context("Failed to add auto-start menu item")?;
        menu.append(&PredefinedMenuItem::separator())
            .context("Failed to add separator")?;
        menu.append(&version_item).context("Failed to add version menu item")?;
        menu.append(&quit_item).context("Failed to add quit menu item")?;

        Ok(Self {
            menu,
            toggle_item,
            status_item,
            interval_menu,
            interval_items,
            autostart_item,
            version_item,
            quit_item,
            tray: None,
            shown_running: None,
        })
    }

    /// Create the tray icon itself
    ///
    /// Must run once the event loop is live (macOS requirement).
    pub fn attach(&mut self, view: &TrayView) -> Result<()> {
        let running = view.state.is_running;
        let tray = TrayIconBuilder::new()
            .with_menu(Box::new(self.menu.clone()))
            .with_tooltip(tooltip(view))
            .with_icon(icon::tray_icon(running)?)
            .build()
            .context("Failed to create tray icon")?;
        self.tray = Some(tray);
        self.shown_running = Some(running);
        self.refresh(view);
        Ok(())
    }

    pub fn command_for(&self, id: &MenuId) -> Option<TrayCommand> {
        if id == self.toggle_item.id() {
            return Some(TrayCommand::Toggle);
        }
        if id == self.autostart_item.id() {
            return Some(TrayCommand::ToggleAutoStart);
        }
        if id == self.version_item.id() {
            return Some(TrayCommand::ShowVersion);
        }
        if id == self.quit_item.id() {
            return Some(TrayCommand::Quit);
        }
        self.interval_items
            .iter()
            .find(|(_, item)| id == item.id())
            .map(|(seconds, _)| TrayCommand::SetInterval(*seconds))
    }

    /// Bring labels, check marks, tooltip and icon in line with `view`
    pub fn refresh(&mut self, view: &TrayView) {
        let running = view.state.is_running;
        self.toggle_item.set_text(toggle_label(running));
        self.status_item.set_text(status_line(view));

        self.interval_menu
            .set_text(format!("Interval ({}s)", view.interval_seconds));
        // Check items flip themselves on click; re-sync with the real value
        for (seconds, item) in &self.interval_items {
            item.set_checked(*seconds == view.interval_seconds);
        }

        self.autostart_item.set_enabled(view.auto_start_available);
        self.autostart_item.set_checked(view.auto_start);

        let Some(tray) = self.tray.as_ref() else {
            return;
        };
        if let Err(e) = tray.set_tooltip(Some(tooltip(view))) {
            error!("Failed to update tray tooltip: {}", e);
        }
        if self.shown_running != Some(running) {
            debug!("Tray icon switching to {}", if running { "running" } else { "stopped" });
            match icon::tray_icon(running) {
                Ok(new_icon) => {
                    if let Err(e) = tray.set_icon(Some(new_icon)) {
                        error!("Failed to update tray icon: {}", e);
                    } else {
                        self.shown_running = Some(running);
                    }
                }
                Err(e) => error!("{:#}", e),
            }
        }
    }
}
