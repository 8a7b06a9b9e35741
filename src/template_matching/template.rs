//! Template store: loads the reference image once and keeps its grayscale form.

use super::luma::rgba_to_gray;
use crate::screen::{ClickerError, ClickerResult};
use image::GrayImage;
use std::path::{Path, PathBuf};

/// Immutable reference image searched for on screen.
///
/// Besides the grayscale pixels it keeps the integer sums the correlation needs, so a
/// tick never walks the template twice.
#[derive(Debug, Clone)]
pub struct Template {
    path: PathBuf,
    gray: GrayImage,
    pixel_sum: u64,
    /// `n * Σt² - (Σt)²`, exact; zero for a flat template.
    variance_term: u128,
}

impl Template {
    /// Load a template from disk.
    ///
    /// A missing path is always `TemplateNotFound`; anything that exists but does not
    /// decode to a non-empty image is `TemplateDecodeError`.
    pub fn load(path: impl AsRef<Path>) -> ClickerResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ClickerError::TemplateNotFound {
                path: path.to_path_buf(),
            });
        }

        let image = image::open(path).map_err(|e| ClickerError::TemplateDecodeError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let template = Self::from_gray(rgba_to_gray(&image.to_rgba8()), path)?;
        if template.variance_term() == 0 {
            log::warn!(
                "⚠️ Template {} is a single flat color and can never match",
                template.display_name()
            );
        }
        log::debug!(
            "🖼️ Loaded template {} ({}x{})",
            template.display_name(),
            template.width(),
            template.height()
        );
        Ok(template)
    }

    /// Build a template from pixels already in memory.
    pub fn from_gray(gray: GrayImage, path: impl Into<PathBuf>) -> ClickerResult<Self> {
        let path = path.into();
        if gray.width() == 0 || gray.height() == 0 {
            return Err(ClickerError::TemplateDecodeError {
                path,
                reason: format!("image is empty ({}x{})", gray.width(), gray.height()),
            });
        }

        let (sum, sum_sq) = gray.as_raw().iter().fold((0u64, 0u64), |(s, sq), &p| {
            let v = p as u64;
            (s + v, sq + v * v)
        });
        let n = (gray.width() as u128) * (gray.height() as u128);
        let variance_term = n * sum_sq as u128 - (sum as u128) * (sum as u128);

        Ok(Self {
            path,
            gray,
            pixel_sum: sum,
            variance_term,
        })
    }

    pub fn width(&self) -> u32 {
        self.gray.width()
    }

    pub fn height(&self) -> u32 {
        self.gray.height()
    }

    pub fn gray(&self) -> &GrayImage {
        &self.gray
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn pixel_count(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    pub fn pixel_sum(&self) -> u64 {
        self.pixel_sum
    }

    pub fn variance_term(&self) -> u128 {
        self.variance_term
    }

    /// Click point for a match whose top-left corner is at `(x, y)`.
    pub fn click_point(&self, x: u32, y: u32) -> (u32, u32) {
        (x + self.width() / 2, y + self.height() / 2)
    }

    /// File name for display, falls back to the full path.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}
