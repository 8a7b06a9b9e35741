use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for auto clicker operations.
pub type ClickerResult<T> = Result<T, ClickerError>;

/// The error type for template loading, screen access and the click loop.
#[derive(Debug, Error)]
pub enum ClickerError {
    #[error("Template image '{path}' does not exist")]
    TemplateNotFound { path: PathBuf },

    #[error("Failed to decode template image '{path}': {reason}")]
    TemplateDecodeError { path: PathBuf, reason: String },

    #[error("Screen capture unavailable: {reason}")]
    CaptureUnavailable { reason: String },

    #[error(
        "Template {template_width}x{template_height} is larger than the capture {capture_width}x{capture_height}"
    )]
    InvalidTemplateSize {
        template_width: u32,
        template_height: u32,
        capture_width: u32,
        capture_height: u32,
    },

    #[error("Pointer control unavailable: {reason}. Grant accessibility/input permissions to this program.")]
    PointerUnavailable { reason: String },

    #[error("Click at ({x}, {y}) failed: {reason}")]
    ClickFailed { x: u32, y: u32, reason: String },

    #[error("Invalid loop configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Failed to write match snapshot {path:?}: {reason}")]
    SnapshotWriteFailed { path: PathBuf, reason: String },

    #[error("Worker thread could not be started: {source}")]
    WorkerSpawnFailed {
        #[from]
        source: std::io::Error,
    },
}

impl ClickerError {
    /// Errors that only spoil the current tick. The loop logs them, treats the tick as a
    /// non-match and carries on with the next one.
    pub fn is_per_tick(&self) -> bool {
        matches!(
            self,
            ClickerError::CaptureUnavailable { .. }
                | ClickerError::InvalidTemplateSize { .. }
                | ClickerError::ClickFailed { .. }
                | ClickerError::SnapshotWriteFailed { .. }
        )
    }
}
