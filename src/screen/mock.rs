// Test doubles for the screen capabilities
use super::error::{ClickerError, ClickerResult};
use super::types::{PointerController, ScreenCapturer};
use image::RgbaImage;
use std::sync::{Arc, Mutex};

/// Returns the same frame on every capture, or a capture error when built with `denied`.
pub struct StaticCapturer {
    frame: Option<RgbaImage>,
    pub captures: usize,
}

impl StaticCapturer {
    pub fn new(frame: RgbaImage) -> Self {
        Self {
            frame: Some(frame),
            captures: 0,
        }
    }

    pub fn denied() -> Self {
        Self {
            frame: None,
            captures: 0,
        }
    }
}

impl ScreenCapturer for StaticCapturer {
    fn capture(&mut self) -> ClickerResult<RgbaImage> {
        self.captures += 1;
        self.frame
            .clone()
            .ok_or_else(|| ClickerError::CaptureUnavailable {
                reason: "screen access denied".to_string(),
            })
    }
}

/// Records every click; clones share the same log so tests can inspect clicks made by a
/// pointer that was moved into a clicker or a worker thread.
#[derive(Clone, Default)]
pub struct RecordingPointer {
    clicks: Arc<Mutex<Vec<(u32, u32)>>>,
    fail: bool,
}

impl RecordingPointer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            clicks: Arc::default(),
            fail: true,
        }
    }

    pub fn clicks(&self) -> Vec<(u32, u32)> {
        self.clicks.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl PointerController for RecordingPointer {
    fn click(&mut self, x: u32, y: u32) -> ClickerResult<()> {
        if self.fail {
            return Err(ClickerError::ClickFailed {
                x,
                y,
                reason: "input injection blocked".to_string(),
            });
        }
        if let Ok(mut clicks) = self.clicks.lock() {
            clicks.push((x, y));
        }
        Ok(())
    }
}
