// Anti-Screensaver Tray App - system tray mouse mover
// This binary provides the tray icon, its dropdown menu and desktop notifications

use anti_screensaver::config::resolve_interval_override;
use anti_screensaver::constants::UI_REFRESH_INTERVAL_MS;
use anti_screensaver::instance_lock::InstanceLock;
use anti_screensaver::ui::{notifications, TrayCommand, TrayMenu, TrayView};
use anti_screensaver::{build_controller, logging, InstanceError, Notice, Platform, SystemController};
use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tao::event::{Event, StartCause};
use tao::event_loop::{ControlFlow, EventLoopBuilder};
use tray_icon::menu::MenuEvent;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Keep the screen awake by nudging the mouse from the system tray
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Start quietly in the tray, without the startup notification
    #[arg(short, long)]
    minimized: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

enum UserEvent {
    Menu(MenuEvent),
}

fn tray_view(controller: &SystemController) -> TrayView {
    TrayView {
        state: controller.snapshot(),
        interval_seconds: controller.effective_interval(),
        auto_start: controller.auto_start_enabled(),
        auto_start_available: controller.auto_start_available(),
        uptime: controller.session_elapsed(),
        now: Instant::now(),
    }
}

/// Run a menu command; returns true when the app should quit
fn handle_command(controller: &mut SystemController, command: TrayCommand) -> bool {
    let notice = match command {
        TrayCommand::Toggle => controller.toggle(),
        TrayCommand::SetInterval(seconds) => controller.set_interval(seconds),
        TrayCommand::ToggleAutoStart => {
            let enable = !controller.auto_start_enabled();
            controller.set_auto_start(enable)
        }
        TrayCommand::ShowVersion => Notice::info(
            "Anti-Screensaver",
            format!(
                "Anti-Screensaver Mouse Mover\nVersion {}\n\nKeeps the screen awake with imperceptible mouse nudges.",
                VERSION
            ),
        ),
        TrayCommand::Quit => {
            info!("Quit menu item clicked, exiting");
            return true;
        }
    };
    notifications::show(&notice);
    false
}

fn main() -> Result<()> {
    let args = Args::parse();

    logging::init(args.verbose, args.log_file.as_deref())?;

    info!("Starting Anti-Screensaver Tray App v{}", VERSION);

    // Only one instance may drive the cursor. The lock lives until exit.
    let _instance = match InstanceLock::acquire_default() {
        Ok(lock) => lock,
        Err(InstanceError::AlreadyRunning(path)) => {
            error!("Another instance of Anti-Screensaver is already running (lock: {})", path.display());
            notifications::show(&Notice::error(
                "Anti-Screensaver",
                "Anti-Screensaver is already running. Check your system tray.",
            ));
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("Failed to acquire single-instance lock"),
    };

    let platform = Platform::detect();
    let interval_override = resolve_interval_override(None);
    let mut controller =
        build_controller(platform, interval_override).context("Failed to initialize Anti-Screensaver")?;

    controller.reconcile_auto_start();
    let mut pending: Vec<Notice> = controller.restore_last_state().into_iter().collect();
    if !args.minimized {
        pending.push(Notice::info(
            "Anti-Screensaver",
            format!(
                "Running in the system tray ({}, every {}s)",
                if controller.is_running() { "active" } else { "stopped" },
                controller.effective_interval()
            ),
        ));
    }

    // Create event loop for tray app; menu clicks wake it through the proxy
    let event_loop = EventLoopBuilder::<UserEvent>::with_user_event().build();
    let proxy = event_loop.create_proxy();
    MenuEvent::set_event_handler(Some(move |event| {
        let _ = proxy.send_event(UserEvent::Menu(event));
    }));

    let mut tray_menu = TrayMenu::new(VERSION).context("Failed to build tray menu")?;

    info!("Running event loop");

    event_loop.run(move |event, _, control_flow| {
        let mut quit = false;

        match event {
            Event::NewEvents(StartCause::Init) => {
                if let Err(e) = tray_menu.attach(&tray_view(&controller)) {
                    error!("{:#}", e);
                    *control_flow = ControlFlow::ExitWithCode(1);
                    return;
                }
                info!("Tray icon created");
                for notice in pending.drain(..) {
                    notifications::show(&notice);
                }
            }
            Event::UserEvent(UserEvent::Menu(menu_event)) => {
                if let Some(command) = tray_menu.command_for(menu_event.id()) {
                    quit = handle_command(&mut controller, command);
                }
            }
            Event::LoopDestroyed => {
                controller.shutdown();
                return;
            }
            _ => {}
        }

        if quit {
            *control_flow = ControlFlow::Exit;
            return;
        }

        if let Some(notice) = controller.poll() {
            notifications::show(&notice);
        }

        tray_menu.refresh(&tray_view(&controller));

        let refresh_at = Instant::now() + Duration::from_millis(UI_REFRESH_INTERVAL_MS);
        let wake_at = controller
            .next_deadline()
            .map_or(refresh_at, |deadline| deadline.min(refresh_at));
        *control_flow = ControlFlow::WaitUntil(wake_at);
    });
}
