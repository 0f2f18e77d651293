use super::MouseController;
use crate::error::MouseError;
use enigo::{Coordinate, Enigo, Mouse, Settings};
use log::debug;

/// Mouse controller backed by `enigo`
///
/// enigo dispatches to SendInput on Windows, CGEvent on macOS and XTest on
/// Linux, so one type covers every supported platform.
pub struct EnigoMouseController {
    enigo: Enigo,
}

impl EnigoMouseController {
    pub fn new() -> Result<Self, MouseError> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| MouseError::Unavailable(e.to_string()))?;
        Ok(Self { enigo })
    }
}

impl MouseController for EnigoMouseController {
    fn move_relative(&mut self, delta_x: i32, delta_y: i32) -> Result<(), MouseError> {
        self.enigo
            .move_mouse(delta_x, delta_y, Coordinate::Rel)
            .map_err(|e| MouseError::Input(e.to_string()))?;
        debug!("Cursor moved by ({}, {})", delta_x, delta_y);
        Ok(())
    }

    fn current_position(&self) -> Result<(i32, i32), MouseError> {
        self.enigo
            .location()
            .map_err(|e| MouseError::Input(e.to_string()))
    }
}
