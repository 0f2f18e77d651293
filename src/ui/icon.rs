//! Generated tray icons
//!
//! A filled circle with a darker rim: green while running, gray while
//! stopped. Rendered at runtime so no image assets ship with the binary.

use crate::constants::{TRAY_ICON_RUNNING_RGBA, TRAY_ICON_SIZE, TRAY_ICON_STOPPED_RGBA};
use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};

const RIM_WIDTH: f32 = 1.5;
const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

fn darken(color: [u8; 4]) -> Rgba<u8> {
    let scale = |c: u8| (c as f32 * 0.6) as u8;
    Rgba([scale(color[0]), scale(color[1]), scale(color[2]), color[3]])
}

/// Render the status circle into an RGBA image
pub fn render(running: bool, size: u32) -> RgbaImage {
    let fill = if running {
        TRAY_ICON_RUNNING_RGBA
    } else {
        TRAY_ICON_STOPPED_RGBA
    };
    let rim = darken(fill);
    let center = (size as f32 - 1.0) / 2.0;
    let radius = size as f32 / 2.0 - 2.0;

    RgbaImage::from_fn(size, size, |x, y| {
        let dx = x as f32 - center;
        let dy = y as f32 - center;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist <= radius - RIM_WIDTH {
            Rgba(fill)
        } else if dist <= radius {
            rim
        } else {
            TRANSPARENT
        }
    })
}

/// Tray icon for the given running state
pub fn tray_icon(running: bool) -> Result<tray_icon::Icon> {
    let image = render(running, TRAY_ICON_SIZE);
    let (width, height) = image.dimensions();
    tray_icon::Icon::from_rgba(image.into_raw(), width, height)
        .context("Failed to create tray icon image")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_uses_state_color() {
        let mid = TRAY_ICON_SIZE / 2;
        let running = render(true, TRAY_ICON_SIZE);
        let stopped = render(false, TRAY_ICON_SIZE);

        assert_eq!(running.get_pixel(mid, mid).0, TRAY_ICON_RUNNING_RGBA);
        assert_eq!(stopped.get_pixel(mid, mid).0, TRAY_ICON_STOPPED_RGBA);
    }

    #[test]
    fn test_corners_transparent() {
        let image = render(true, TRAY_ICON_SIZE);
        let last = TRAY_ICON_SIZE - 1;
        for (x, y) in [(0, 0), (last, 0), (0, last), (last, last)] {
            assert_eq!(image.get_pixel(x, y).0[3], 0, "corner ({}, {}) should be transparent", x, y);
        }
    }

    #[test]
    fn test_rim_is_darker() {
        let image = render(true, TRAY_ICON_SIZE);
        let mid = TRAY_ICON_SIZE / 2;
        // Leftmost opaque pixel on the middle row belongs to the rim
        let rim = (0..TRAY_ICON_SIZE)
            .map(|x| image.get_pixel(x, mid))
            .find(|p| p.0[3] > 0)
            .map(|p| p.0);
        assert_eq!(rim, Some(darken(TRAY_ICON_RUNNING_RGBA).0));
    }

    #[test]
    fn test_tray_icon_builds() {
        assert!(tray_icon(true).is_ok());
        assert!(tray_icon(false).is_ok());
    }
}
