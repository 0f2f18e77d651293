use anti_screensaver::autostart::{AutoStart, DesktopEntryAutoStart, LaunchAgentAutoStart};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn exe() -> PathBuf {
    PathBuf::from("/opt/anti screensaver/anti-screensaver")
}

#[test]
fn test_desktop_entry_enable_disable() {
    let dir = TempDir::new().unwrap();
    let autostart = DesktopEntryAutoStart::new(dir.path().join("autostart"), exe());

    assert!(!autostart.is_enabled());
    autostart.enable().expect("enable");
    assert!(autostart.is_enabled());

    let entry = fs::read_to_string(autostart.entry_path()).unwrap();
    assert!(entry.starts_with("[Desktop Entry]\n"));
    assert!(entry.contains("Exec=\"/opt/anti screensaver/anti-screensaver\" --minimized\n"));
    assert!(entry.contains("Type=Application\n"));

    autostart.disable().expect("disable");
    assert!(!autostart.is_enabled());
    assert!(!autostart.entry_path().exists());
}

#[test]
fn test_desktop_entry_idempotent() {
    let dir = TempDir::new().unwrap();
    let autostart = DesktopEntryAutoStart::new(dir.path(), exe());

    autostart.enable().expect("enable");
    autostart.enable().expect("enable again");
    assert!(autostart.is_enabled());

    autostart.disable().expect("disable");
    autostart.disable().expect("disable when absent is a no-op");
    assert!(!autostart.is_enabled());
}

#[test]
fn test_launch_agent_enable_disable() {
    let dir = TempDir::new().unwrap();
    let autostart = LaunchAgentAutoStart::new(dir.path().join("LaunchAgents"), exe());

    autostart.enable().expect("enable");
    assert!(autostart.is_enabled());
    assert_eq!(
        autostart.plist_path().file_name().and_then(|n| n.to_str()),
        Some("com.antiscreensaver.mousemover.plist")
    );

    let plist = fs::read_to_string(autostart.plist_path()).unwrap();
    assert!(plist.contains("<string>com.antiscreensaver.mousemover</string>"));
    assert!(plist.contains("<string>/opt/anti screensaver/anti-screensaver</string>"));
    assert!(plist.contains("<string>--minimized</string>"));
    assert!(plist.contains("<key>RunAtLoad</key>\n    <true/>"));

    autostart.disable().expect("disable");
    assert!(!autostart.is_enabled());
    autostart.disable().expect("disable when absent is a no-op");
}

#[test]
fn test_location_names_registration_file() {
    let dir = TempDir::new().unwrap();
    let autostart = DesktopEntryAutoStart::new(dir.path(), exe());
    assert!(autostart.location().ends_with("anti-screensaver.desktop"));
}
