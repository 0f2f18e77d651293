use crate::constants::ERROR_THRESHOLD;
use crate::mouse::MouseMovement;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Application state shared between the engine and the UI
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Mutex<ApplicationState>>,
}

/// Plain snapshot of the runtime state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationState {
    /// Whether the movement engine is running
    pub is_running: bool,
    /// Successful movements since the session started
    pub movement_count: u64,
    /// Consecutive failed movements (reset on success and on start)
    pub error_count: u32,
    /// When the last successful movement happened
    pub last_movement_timestamp: Option<Instant>,
    /// When the current (or last) session started
    pub start_timestamp: Option<Instant>,
    /// Message of the most recent failed movement
    pub last_error: Option<String>,
    /// Why the engine stopped itself, if it did
    pub stop_reason: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ApplicationState::default())),
        }
    }

    pub fn lock(&self) -> parking_lot::MutexGuard<'_, ApplicationState> {
        self.inner.lock()
    }

    pub fn snapshot(&self) -> ApplicationState {
        self.inner.lock().clone()
    }

    pub fn is_running(&self) -> bool {
        self.inner.lock().is_running
    }

    /// Flip the running flag
    ///
    /// Entering the running state starts a fresh session: counters are zeroed
    /// and the start time is recorded. Leaving it keeps the counters for display.
    pub fn set_running_at(&self, running: bool, now: Instant) {
        let mut state = self.inner.lock();
        if running {
            state.is_running = true;
            state.movement_count = 0;
            state.error_count = 0;
            state.last_error = None;
            state.stop_reason = None;
            state.start_timestamp = Some(now);
            log::debug!("Session started at {:?}", state.start_timestamp);
        } else {
            state.is_running = false;
            log::debug!("Session stopped after {} movements", state.movement_count);
        }
    }

    pub fn set_running(&self, running: bool) {
        self.set_running_at(running, Instant::now());
    }

    pub fn record_success(&self, movement: &MouseMovement) {
        let mut state = self.inner.lock();
        state.movement_count += 1;
        state.last_movement_timestamp = Some(movement.timestamp);
        state.error_count = 0;
    }

    /// Record a failed movement
    ///
    /// Returns true when the consecutive failure count has reached
    /// `ERROR_THRESHOLD` while running, meaning the engine must stop.
    pub fn record_failure(&self, movement: &MouseMovement) -> bool {
        let mut state = self.inner.lock();
        state.error_count += 1;
        state.last_error = Some(
            movement
                .error_message
                .clone()
                .unwrap_or_else(|| "Unknown error".to_string()),
        );
        state.is_running && state.error_count >= ERROR_THRESHOLD
    }

    pub fn set_stop_reason(&self, reason: impl Into<String>) {
        self.inner.lock().stop_reason = Some(reason.into());
    }

    pub fn get_stop_reason(&self) -> Option<String> {
        self.inner.lock().stop_reason.clone()
    }

    pub fn get_movement_count(&self) -> u64 {
        self.inner.lock().movement_count
    }

    pub fn get_error_count(&self) -> u32 {
        self.inner.lock().error_count
    }

    pub fn get_last_error(&self) -> Option<String> {
        self.inner.lock().last_error.clone()
    }

    pub fn get_last_movement_timestamp(&self) -> Option<Instant> {
        self.inner.lock().last_movement_timestamp
    }

    pub fn get_start_timestamp(&self) -> Option<Instant> {
        self.inner.lock().start_timestamp
    }

    /// Time since the running session started (None when stopped)
    pub fn session_elapsed(&self, now: Instant) -> Option<Duration> {
        let state = self.inner.lock();
        if !state.is_running {
            return None;
        }
        state
            .start_timestamp
            .map(|start| now.saturating_duration_since(start))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MouseError;

    fn failed(now: Instant) -> MouseMovement {
        MouseMovement::from_result(1, 1, now, Err(MouseError::Input("blocked".into())))
    }

    #[test]
    fn test_failure_threshold_only_while_running() {
        let state = AppState::new();
        let now = Instant::now();
        for _ in 0..ERROR_THRESHOLD + 1 {
            assert!(
                !state.record_failure(&failed(now)),
                "Threshold must not trigger while stopped"
            );
        }
    }

    #[test]
    fn test_failure_threshold_reached_at_exact_count() {
        let state = AppState::new();
        let now = Instant::now();
        state.set_running_at(true, now);

        for i in 1..ERROR_THRESHOLD {
            assert!(!state.record_failure(&failed(now)), "Failure {} is below threshold", i);
        }
        assert!(state.record_failure(&failed(now)));
        assert_eq!(state.get_error_count(), ERROR_THRESHOLD);
        assert_eq!(
            state.get_last_error().as_deref(),
            Some("mouse input failed: blocked")
        );
    }

    #[test]
    fn test_start_clears_stop_reason() {
        let state = AppState::new();
        state.set_stop_reason("gave up");
        state.set_running(true);
        assert!(state.get_stop_reason().is_none());
        assert!(state.get_last_error().is_none());
    }

    #[test]
    fn test_session_elapsed() {
        let state = AppState::new();
        let start = Instant::now();
        assert!(state.session_elapsed(start).is_none());

        state.set_running_at(true, start);
        let later = start + Duration::from_secs(42);
        assert_eq!(state.session_elapsed(later), Some(Duration::from_secs(42)));

        state.set_running_at(false, later);
        assert!(state.session_elapsed(later).is_none());
    }
}
