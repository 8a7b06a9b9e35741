// gui/util.rs
// Utility helpers for GUI

use crate::automation::{MAX_INTERVAL_SECS, MIN_INTERVAL_SECS};
use std::path::Path;

/// File extensions offered by the template picker
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

pub fn base64_encode(data: &[u8]) -> String {
    const CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    let mut result = String::with_capacity(data.len().div_ceil(3) * 4);
    for chunk in data.chunks(3) {
        let b0 = chunk[0] as u32;
        let b1 = chunk.get(1).copied().unwrap_or(0) as u32;
        let b2 = chunk.get(2).copied().unwrap_or(0) as u32;
        let b = (b0 << 16) | (b1 << 8) | b2;
        result.push(CHARS[((b >> 18) & 63) as usize] as char);
        result.push(CHARS[((b >> 12) & 63) as usize] as char);
        result.push(if chunk.len() > 1 {
            CHARS[((b >> 6) & 63) as usize] as char
        } else {
            '='
        });
        result.push(if chunk.len() > 2 {
            CHARS[(b & 63) as usize] as char
        } else {
            '='
        });
    }
    result
}

/// MIME type for an `<img>` data URL, by file extension
pub fn image_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("bmp") => "image/bmp",
        _ => "image/png",
    }
}

pub fn data_url(path: &Path, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", image_mime(path), base64_encode(bytes))
}

/// Parse the interval field, clamped to the selectable range. `None` for non-numbers.
pub fn parse_interval_secs(raw: &str) -> Option<u64> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs.clamp(MIN_INTERVAL_SECS, MAX_INTERVAL_SECS))
}

pub fn parse_threshold(raw: &str) -> Option<f32> {
    raw.trim().parse::<f32>().ok().filter(|t| t.is_finite())
}
