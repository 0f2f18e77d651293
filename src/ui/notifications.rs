use crate::constants::{NOTIFICATION_ERROR_TIMEOUT_MS, NOTIFICATION_TIMEOUT_MS};
use crate::controller::{Notice, NoticeLevel};
use log::{debug, warn};
use notify_rust::{Notification, Timeout};

/// How long a notice stays on screen
pub fn timeout_for(level: NoticeLevel) -> u32 {
    match level {
        NoticeLevel::Info => NOTIFICATION_TIMEOUT_MS,
        NoticeLevel::Warning | NoticeLevel::Error => NOTIFICATION_ERROR_TIMEOUT_MS,
    }
}

/// Show a desktop notification for a notice
///
/// Delivery failures are logged and otherwise ignored.
pub fn show(notice: &Notice) {
    debug!("Notification [{:?}] {}: {}", notice.level, notice.title, notice.body);

    let result = Notification::new()
        .appname("Anti-Screensaver")
        .summary(&notice.title)
        .body(&notice.body)
        .timeout(Timeout::Milliseconds(timeout_for(notice.level)))
        .show();

    if let Err(e) = result {
        warn!("Failed to show notification '{}': {}", notice.title, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_stay_longer() {
        assert!(timeout_for(NoticeLevel::Error) > timeout_for(NoticeLevel::Info));
        assert_eq!(timeout_for(NoticeLevel::Warning), NOTIFICATION_ERROR_TIMEOUT_MS);
    }
}
