/// Template matching module for finding the reference image in screenshots
///
/// This module provides:
/// - The immutable template store (load once, grayscale precomputed)
/// - One color-to-gray conversion shared by templates and captures
/// - Zero-mean normalized cross-correlation over every placement
/// - Best-placement search with a confidence score
pub mod luma;
pub mod matcher;
pub mod template;
pub mod types;

pub use luma::rgba_to_gray;
pub use matcher::{CorrelationMap, TemplateMatcher, best_in_map};
pub use template::Template;
pub use types::{MatchCandidate, MatchResult};
