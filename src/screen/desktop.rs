//! Desktop implementations of the screen capabilities.
//!
//! Capture goes through `xcap` (primary monitor only), pointer input through `enigo`.

use super::error::{ClickerError, ClickerResult};
use super::types::{PointerController, ScreenCapturer};
use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};
use image::RgbaImage;

/// Captures the primary monitor. Monitors are enumerated on every capture so a display
/// change between ticks is picked up.
#[derive(Debug, Default)]
pub struct XcapCapturer;

impl XcapCapturer {
    pub fn new() -> Self {
        Self
    }

    fn primary_monitor() -> ClickerResult<xcap::Monitor> {
        let monitors = xcap::Monitor::all().map_err(|e| ClickerError::CaptureUnavailable {
            reason: format!("failed to enumerate monitors: {e}"),
        })?;

        let mut fallback = None;
        for monitor in monitors {
            if monitor.is_primary().unwrap_or(false) {
                return Ok(monitor);
            }
            if fallback.is_none() {
                fallback = Some(monitor);
            }
        }

        fallback.ok_or_else(|| ClickerError::CaptureUnavailable {
            reason: "no monitors found".to_string(),
        })
    }
}

impl ScreenCapturer for XcapCapturer {
    fn capture(&mut self) -> ClickerResult<RgbaImage> {
        let monitor = Self::primary_monitor()?;
        let image = monitor
            .capture_image()
            .map_err(|e| ClickerError::CaptureUnavailable {
                reason: e.to_string(),
            })?;
        log::debug!("📸 Captured {}x{} screen", image.width(), image.height());
        Ok(image)
    }

    fn describe(&self) -> String {
        Self::primary_monitor()
            .ok()
            .and_then(|m| m.name().ok())
            .unwrap_or_else(|| "primary monitor".to_string())
    }
}

/// Clicks with the primary mouse button through `enigo`.
pub struct EnigoPointer {
    enigo: Enigo,
}

impl EnigoPointer {
    /// Connect to the platform input system. Fails when the process lacks input
    /// permissions (e.g. macOS accessibility).
    pub fn new() -> ClickerResult<Self> {
        let enigo =
            Enigo::new(&Settings::default()).map_err(|e| ClickerError::PointerUnavailable {
                reason: e.to_string(),
            })?;
        Ok(Self { enigo })
    }
}

impl PointerController for EnigoPointer {
    fn click(&mut self, x: u32, y: u32) -> ClickerResult<()> {
        let click_failed = |reason: String| ClickerError::ClickFailed { x, y, reason };

        let screen_x = i32::try_from(x).map_err(|e| click_failed(e.to_string()))?;
        let screen_y = i32::try_from(y).map_err(|e| click_failed(e.to_string()))?;

        self.enigo
            .move_mouse(screen_x, screen_y, Coordinate::Abs)
            .map_err(|e| click_failed(format!("move failed: {e}")))?;
        self.enigo
            .button(Button::Left, Direction::Click)
            .map_err(|e| click_failed(format!("button failed: {e}")))?;

        log::debug!("🖱️ Clicked at ({}, {})", x, y);
        Ok(())
    }
}
