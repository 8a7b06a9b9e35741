// Screen module - capture and pointer capabilities
// The click loop only talks to the two traits in `types`; the desktop implementations
// live in `desktop` and are swapped for recording doubles in tests.

pub mod desktop;
pub mod error;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

// Re-export the main types for easy access
pub use desktop::{EnigoPointer, XcapCapturer};
pub use error::{ClickerError, ClickerResult};
pub use types::{PointerController, ScreenCapturer};
