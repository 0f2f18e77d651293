pub mod icon;
pub mod notifications;
pub mod tray;

pub use tray::{TrayCommand, TrayMenu, TrayView};
