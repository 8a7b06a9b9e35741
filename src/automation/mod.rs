// Automation module
// The capture-match-click loop, its command/event channels and the background worker
// that hosts it for the GUI.

pub mod channels;
pub mod clicker;
pub mod snapshot;
pub mod types;
pub mod worker;

#[cfg(test)]
mod tests;

// Re-export the main types and functions for easy access
pub use channels::{EventReceiver, EventSender, create_automation_channels};
pub use clicker::{AutoClicker, TickOutcome};
pub use snapshot::SnapshotWriter;
pub use types::{
    AutomationCommand, AutomationEvent, DEFAULT_INTERVAL_SECS, DEFAULT_SNAPSHOT_DIR,
    DEFAULT_THRESHOLD, LoopConfig, LoopState, MAX_INTERVAL_SECS, MIN_INTERVAL_SECS,
};
pub use worker::ClickerWorker;
