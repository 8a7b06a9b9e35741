//! Annotated match snapshots for debugging

use crate::screen::{ClickerError, ClickerResult};
use crate::template_matching::MatchCandidate;
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::macros::format_description;

const BOX_COLOR: Rgba<u8> = Rgba([0, 255, 0, 255]);

/// Writes a copy of the capture with the matched region boxed
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    dir: PathBuf,
}

impl SnapshotWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save `capture` with a 2px box around the `width x height` region at the candidate.
    /// Returns the written path.
    pub fn save(
        &self,
        capture: &RgbaImage,
        candidate: &MatchCandidate,
        width: u32,
        height: u32,
        at: OffsetDateTime,
    ) -> ClickerResult<PathBuf> {
        let path = self.dir.join(snapshot_file_name(at));
        let write_failed = |reason: String| ClickerError::SnapshotWriteFailed {
            path: path.clone(),
            reason,
        };

        std::fs::create_dir_all(&self.dir).map_err(|e| write_failed(e.to_string()))?;

        let annotated = annotate(capture, candidate, width, height);
        annotated
            .save(&path)
            .map_err(|e| write_failed(e.to_string()))?;

        log::info!("💾 Saved match snapshot: {}", path.display());
        Ok(path)
    }
}

/// `match_<YYYYmmdd>_<HHMMSS>_<millis>.png`
pub fn snapshot_file_name(at: OffsetDateTime) -> String {
    let format =
        format_description!("[year][month][day]_[hour][minute][second]_[subsecond digits:3]");
    let stamp = at
        .format(&format)
        .unwrap_or_else(|_| at.unix_timestamp().to_string());
    format!("match_{stamp}.png")
}

fn annotate(capture: &RgbaImage, candidate: &MatchCandidate, width: u32, height: u32) -> RgbaImage {
    let mut annotated = capture.clone();
    let (x, y) = (candidate.x as i32, candidate.y as i32);
    draw_hollow_rect_mut(&mut annotated, Rect::at(x, y).of_size(width, height), BOX_COLOR);
    if width > 2 && height > 2 {
        draw_hollow_rect_mut(
            &mut annotated,
            Rect::at(x + 1, y + 1).of_size(width - 2, height - 2),
            BOX_COLOR,
        );
    }
    annotated
}
