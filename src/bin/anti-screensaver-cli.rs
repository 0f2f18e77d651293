// Anti-Screensaver CLI - headless mouse mover for terminals and SSH-less desktops
// Runs the same engine as the tray app, printing notices instead of notifications

use anti_screensaver::autostart::{self, AutoStart};
use anti_screensaver::config::resolve_interval_override;
use anti_screensaver::instance_lock::InstanceLock;
use anti_screensaver::{build_controller, logging, ConfigStore, InstanceError, Notice, NoticeLevel, Platform};
use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use std::path::PathBuf;
use std::thread;

/// Exit code after the engine stopped itself on repeated failures
const EXIT_AUTO_STOPPED: i32 = 2;

/// Keep the screen awake by nudging the mouse one pixel and back
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Keep the screen awake by nudging the mouse one pixel and back",
    long_about = "Keep the screen awake by nudging the mouse one pixel and back.

Every interval the cursor moves by one pixel diagonally, and by one pixel back
on the next tick, so it never drifts. The OS sees input and does not start the
screensaver or lock the screen.

CONFIGURATION:
  Settings are shared with the tray app and stored as JSON at:
    <config dir>/anti-screensaver/config.json

  Interval precedence: --interval > ANTI_SCREENSAVER_INTERVAL > config file.
  Intervals outside 10-300 seconds are clamped.

EXIT CODES:
  0  Normal exit
  1  Another instance is running, or startup failed
  2  Movement stopped itself after repeated failures"
)]
struct Args {
    /// Seconds between movements for this run (10-300, not saved)
    /// NOTE: Keep range in sync with INTERVAL_* constants
    #[arg(short, long)]
    interval: Option<u64>,

    /// Register to start at login, then exit
    #[arg(long, conflicts_with = "disable_autostart")]
    enable_autostart: bool,

    /// Remove the start-at-login registration, then exit
    #[arg(long)]
    disable_autostart: bool,

    /// Print configuration and registration status, then exit
    #[arg(long)]
    status: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn print_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Info => println!("{}", notice.body),
        NoticeLevel::Warning => eprintln!("WARNING: {}", notice.body),
        NoticeLevel::Error => eprintln!("ERROR: {}: {}", notice.title, notice.body),
    }
}

fn platform_autostart(platform: Platform) -> Result<Box<dyn AutoStart>> {
    let exe = autostart::current_exe().context("Failed to locate executable")?;
    autostart::for_platform(platform, exe).context("Auto-start is not available")
}

/// Register or unregister launch at login and record it in the config
fn run_autostart(platform: Platform, enable: bool) -> Result<()> {
    let autostart = platform_autostart(platform)?;
    if enable {
        autostart.enable().context("Failed to enable auto-start")?;
    } else {
        autostart.disable().context("Failed to disable auto-start")?;
    }

    let mut config = ConfigStore::open_default();
    config.set_auto_start(enable);
    config
        .save()
        .with_context(|| format!("Failed to save {}", config.path().display()))?;

    if enable {
        println!("Auto-start enabled: {}", autostart.location());
    } else {
        println!("Auto-start disabled");
    }
    Ok(())
}

fn run_status(platform: Platform) {
    let config = ConfigStore::open_default();
    println!("Platform:        {}", platform);
    println!("Config file:     {}", config.path().display());
    println!("Interval:        {}s", config.interval());
    println!("Last state:      {}", config.last_state());
    println!("Auto-start:      {}", if config.auto_start() { "on" } else { "off" });

    match platform_autostart(platform) {
        Ok(autostart) => println!(
            "Registration:    {} ({})",
            autostart.location(),
            if autostart.is_enabled() { "present" } else { "absent" }
        ),
        Err(e) => println!("Registration:    unavailable ({:#})", e),
    }

    let instance = match InstanceLock::acquire_default() {
        Ok(_lock) => "not running".to_string(),
        Err(InstanceError::AlreadyRunning(_)) => "running".to_string(),
        Err(e) => format!("unknown ({})", e),
    };
    println!("Instance:        {}", instance);
}

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    logging::init(args.verbose, args.log_file.as_deref())?;

    let platform = Platform::detect();

    // One-shot actions
    if args.status {
        run_status(platform);
        return Ok(());
    }
    if args.enable_autostart || args.disable_autostart {
        return run_autostart(platform, args.enable_autostart);
    }

    info!("Starting Anti-Screensaver CLI on {}", platform);

    let instance = match InstanceLock::acquire_default() {
        Ok(lock) => lock,
        Err(InstanceError::AlreadyRunning(path)) => {
            error!("Another instance of Anti-Screensaver is already running (lock: {})", path.display());
            eprintln!("Anti-Screensaver is already running. Quit the other instance first.");
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("Failed to acquire single-instance lock"),
    };

    let interval_override = resolve_interval_override(args.interval);
    let mut controller =
        build_controller(platform, interval_override).context("Failed to initialize Anti-Screensaver")?;

    let notice = controller.start();
    print_notice(&notice);
    if !controller.is_running() {
        drop(instance);
        std::process::exit(1);
    }
    info!("Anti-Screensaver is running - press Ctrl+C to quit");

    // Sleep until each tick is due; all work happens on this thread
    while let Some(wait) = controller.engine().time_until_next_tick() {
        if !wait.is_zero() {
            thread::sleep(wait);
        }

        if let Some(notice) = controller.poll() {
            print_notice(&notice);
        }
    }

    warn!("Movement engine stopped itself, exiting");
    controller.shutdown();
    drop(instance);
    std::process::exit(EXIT_AUTO_STOPPED);
}
