pub mod enigo_controller;

pub use enigo_controller::EnigoMouseController;

use crate::error::MouseError;
use crate::platform::Platform;
use log::{info, warn};
use std::time::Instant;

/// Capability interface over the OS pointer
///
/// Implementations must return quickly; the engine calls them synchronously
/// from the event loop.
pub trait MouseController {
    /// Move the cursor by a relative pixel offset
    fn move_relative(&mut self, delta_x: i32, delta_y: i32) -> Result<(), MouseError>;

    /// Current cursor position in screen coordinates (diagnostics only)
    fn current_position(&self) -> Result<(i32, i32), MouseError>;

    /// Check that the pointer can be queried at all
    fn test_control(&self) -> bool {
        self.current_position().is_ok()
    }
}

impl<M: MouseController + ?Sized> MouseController for Box<M> {
    fn move_relative(&mut self, delta_x: i32, delta_y: i32) -> Result<(), MouseError> {
        (**self).move_relative(delta_x, delta_y)
    }

    fn current_position(&self) -> Result<(i32, i32), MouseError> {
        (**self).current_position()
    }

    fn test_control(&self) -> bool {
        (**self).test_control()
    }
}

/// One displacement attempt, produced per tick and consumed by the state tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MouseMovement {
    pub delta_x: i32,
    pub delta_y: i32,
    pub timestamp: Instant,
    pub success: bool,
    pub error_message: Option<String>,
}

impl MouseMovement {
    pub fn from_result(
        delta_x: i32,
        delta_y: i32,
        timestamp: Instant,
        result: Result<(), MouseError>,
    ) -> Self {
        let error_message = result.err().map(|e| e.to_string());
        Self {
            delta_x,
            delta_y,
            timestamp,
            success: error_message.is_none(),
            error_message,
        }
    }
}

/// Create the mouse controller for the detected platform
pub fn create_controller(platform: Platform) -> Result<Box<dyn MouseController>, MouseError> {
    if platform.is_wayland_only() {
        warn!("Wayland session without X display detected - cursor nudges may be ignored by the compositor");
    }

    match platform {
        Platform::Windows | Platform::MacOs | Platform::Linux => {
            let controller = EnigoMouseController::new()?;
            info!("Mouse controller initialized for {}", platform);
            Ok(Box::new(controller))
        }
        Platform::Other => Err(MouseError::Unavailable(format!(
            "no mouse controller for platform '{}'",
            platform
        ))),
    }
}
