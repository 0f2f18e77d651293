//! Movement engine
//!
//! Drives the periodic cursor nudges. The engine is polled by whatever event
//! loop owns it: [`MovementEngine::next_deadline`] says when to wake up and
//! [`MovementEngine::poll`] runs at most one tick. Every tick alternates
//! `(+1,+1)` and `(-1,-1)` so the cursor never drifts, and five consecutive
//! controller failures stop the session.

use crate::app_state::AppState;
use crate::constants::{INTERVAL_MAX_SECONDS, INTERVAL_MIN_SECONDS, NUDGE_PIXELS};
use crate::error::EngineError;
use crate::mouse::{MouseController, MouseMovement};
use crate::scheduler::{Clock, RecurringTimer, SystemClock};
use log::{debug, error, info, warn};
use std::time::{Duration, Instant};

/// What a tick produced, reported to the loop that owns the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The cursor was nudged
    Moved(MouseMovement),
    /// The controller failed; the engine keeps running and retries next tick
    MoveFailed { consecutive: u32, error: String },
    /// The failure threshold was reached and the engine stopped itself
    AutoStopped(EngineError),
}

/// Check an interval against the allowed bounds
pub fn validate_interval(interval_seconds: u64) -> Result<(), EngineError> {
    if (INTERVAL_MIN_SECONDS..=INTERVAL_MAX_SECONDS).contains(&interval_seconds) {
        Ok(())
    } else {
        Err(EngineError::InvalidInterval {
            got: interval_seconds,
            min: INTERVAL_MIN_SECONDS,
            max: INTERVAL_MAX_SECONDS,
        })
    }
}

/// Displacement for the 1-indexed tick of a session
pub fn displacement_for_tick(tick: u64) -> (i32, i32) {
    if tick % 2 == 1 {
        (NUDGE_PIXELS, NUDGE_PIXELS)
    } else {
        (-NUDGE_PIXELS, -NUDGE_PIXELS)
    }
}

pub struct MovementEngine<M: MouseController, C: Clock = SystemClock> {
    controller: M,
    clock: C,
    state: AppState,
    timer: RecurringTimer,
    interval_seconds: u64,
    /// Ticks since the session started (drives the alternation)
    tick_count: u64,
}

impl<M: MouseController> MovementEngine<M, SystemClock> {
    pub fn new(controller: M, state: AppState) -> Self {
        Self::with_clock(controller, state, SystemClock)
    }
}

impl<M: MouseController, C: Clock> MovementEngine<M, C> {
    pub fn with_clock(controller: M, state: AppState, clock: C) -> Self {
        Self {
            controller,
            clock,
            state,
            timer: RecurringTimer::new(),
            interval_seconds: crate::constants::INTERVAL_DEFAULT_SECONDS,
            tick_count: 0,
        }
    }

    /// Start nudging every `interval_seconds`
    ///
    /// Calling start while a session is active changes nothing and reports
    /// `EngineError::AlreadyRunning`.
    pub fn start(&mut self, interval_seconds: u64) -> Result<(), EngineError> {
        if self.is_running() {
            debug!("Start requested while already running");
            return Err(EngineError::AlreadyRunning);
        }
        validate_interval(interval_seconds)?;

        let now = self.clock.now();
        self.interval_seconds = interval_seconds;
        self.tick_count = 0;
        self.timer.start(now, Duration::from_secs(interval_seconds));
        self.state.set_running_at(true, now);

        info!("Movement engine started (every {} seconds)", interval_seconds);
        Ok(())
    }

    /// Stop nudging. Returns false if the engine was already stopped.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            debug!("Stop requested while already stopped");
            return false;
        }

        self.timer.cancel();
        self.state.set_running_at(false, self.clock.now());
        info!(
            "Movement engine stopped after {} movements",
            self.state.get_movement_count()
        );
        true
    }

    /// Change the interval, effective immediately even while running
    ///
    /// The pending tick happens no later than `max(remaining, new interval)`
    /// from now, and every tick after it uses the new spacing.
    pub fn set_interval(&mut self, interval_seconds: u64) -> Result<(), EngineError> {
        validate_interval(interval_seconds)?;

        self.interval_seconds = interval_seconds;
        self.timer.reschedule(self.clock.now(), Duration::from_secs(interval_seconds));

        if self.is_running() {
            info!("Movement interval changed to {} seconds", interval_seconds);
        }
        Ok(())
    }

    /// Run one tick if it is due
    pub fn poll(&mut self) -> Option<EngineEvent> {
        let now = self.clock.now();
        if !self.timer.fire_if_due(now) {
            return None;
        }
        Some(self.tick(now))
    }

    fn tick(&mut self, now: Instant) -> EngineEvent {
        self.tick_count += 1;
        let (delta_x, delta_y) = displacement_for_tick(self.tick_count);

        let result = self.controller.move_relative(delta_x, delta_y);
        let movement = MouseMovement::from_result(delta_x, delta_y, now, result);

        if movement.success {
            self.state.record_success(&movement);
            debug!("Tick {}: moved ({}, {})", self.tick_count, delta_x, delta_y);
            return EngineEvent::Moved(movement);
        }

        let error_message = movement
            .error_message
            .clone()
            .unwrap_or_else(|| "Unknown error".to_string());
        let threshold_reached = self.state.record_failure(&movement);
        let consecutive = self.state.get_error_count();
        warn!(
            "Tick {}: mouse movement failed ({} in a row): {}",
            self.tick_count, consecutive, error_message
        );

        if threshold_reached {
            // Timer and running flag go down together before the event is reported
            self.stop();
            let reason = EngineError::RepeatedFailures {
                failures: consecutive,
                last_error: error_message,
            };
            self.state.set_stop_reason(reason.to_string());
            error!("Movement engine auto-stopped: {}", reason);
            return EngineEvent::AutoStopped(reason);
        }

        EngineEvent::MoveFailed {
            consecutive,
            error: error_message,
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn interval(&self) -> u64 {
        self.interval_seconds
    }

    /// When the owning loop should next call [`poll`](Self::poll)
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    pub fn time_until_next_tick(&self) -> Option<Duration> {
        self.timer.remaining(self.clock.now())
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn controller(&self) -> &M {
        &self.controller
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
