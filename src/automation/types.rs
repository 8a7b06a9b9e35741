// Types and enums for the auto clicker loop
use crate::screen::{ClickerError, ClickerResult};
use crate::template_matching::MatchResult;
use std::path::PathBuf;
use std::time::Duration;
use time::OffsetDateTime;

pub const DEFAULT_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_THRESHOLD: f32 = 0.8;
/// Interval bounds offered by the GUI selector
pub const MIN_INTERVAL_SECS: u64 = 1;
pub const MAX_INTERVAL_SECS: u64 = 3600;
pub const DEFAULT_SNAPSHOT_DIR: &str = "results";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoopConfig {
    /// Delay between ticks
    pub interval: Duration,
    /// Minimum correlation score that counts as a match
    pub threshold: f32,
    /// Where annotated match snapshots go; `None` disables them
    pub snapshot_dir: Option<PathBuf>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            threshold: DEFAULT_THRESHOLD,
            snapshot_dir: None,
        }
    }
}

impl LoopConfig {
    pub fn new(interval: Duration, threshold: f32) -> Self {
        Self {
            interval,
            threshold,
            snapshot_dir: None,
        }
    }

    pub fn with_snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = Some(dir.into());
        self
    }

    pub fn validate(&self) -> ClickerResult<()> {
        if self.interval.is_zero() {
            return Err(ClickerError::InvalidConfig {
                reason: "interval must be positive".to_string(),
            });
        }
        if !self.threshold.is_finite() {
            return Err(ClickerError::InvalidConfig {
                reason: format!("threshold must be a finite number, got {}", self.threshold),
            });
        }
        if self.threshold <= 0.0 || self.threshold > 1.0 {
            log::warn!(
                "⚠️ Threshold {:.3} is outside the recommended range (0, 1]",
                self.threshold
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutomationCommand {
    /// End the loop; any sleep in progress is cut short
    Stop,
    /// Skip the rest of the current sleep and tick immediately
    TickNow,
}

#[derive(Debug, Clone)]
pub enum AutomationEvent {
    StateChanged(LoopState),
    Status(String),
    TickCompleted {
        at: OffsetDateTime,
        result: MatchResult,
    },
    MatchFound {
        at: OffsetDateTime,
        location: (u32, u32),
        score: f32,
    },
    SnapshotSaved(PathBuf),
    Error(String),
}

/// Local wall-clock time, UTC when the local offset cannot be determined.
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
