// Capability traits for screen access and pointer input
use super::error::ClickerResult;
use image::RgbaImage;

/// Produces one full-screen snapshot per call.
pub trait ScreenCapturer {
    /// Capture the current display contents at native resolution.
    fn capture(&mut self) -> ClickerResult<RgbaImage>;

    /// Short label for logs (e.g. monitor name).
    fn describe(&self) -> String {
        "screen".to_string()
    }
}

/// Moves the system pointer and dispatches primary-button clicks.
pub trait PointerController {
    /// Move to `(x, y)` in screen coordinates and click the primary button.
    fn click(&mut self, x: u32, y: u32) -> ClickerResult<()>;
}

impl<T: ScreenCapturer + ?Sized> ScreenCapturer for Box<T> {
    fn capture(&mut self) -> ClickerResult<RgbaImage> {
        (**self).capture()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<T: PointerController + ?Sized> PointerController for Box<T> {
    fn click(&mut self, x: u32, y: u32) -> ClickerResult<()> {
        (**self).click(x, y)
    }
}
