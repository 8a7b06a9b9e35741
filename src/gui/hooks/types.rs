use crate::automation::ClickerWorker;
use crate::gui::status::ClickerStatus;
use crate::template_matching::Template;
use dioxus::prelude::Signal;
use std::path::PathBuf;
use std::sync::Arc;

/// Handle to the running worker, `None` once it has fully exited
pub type WorkerSlot = Signal<Option<ClickerWorker>>;

// ============================================================================
// GROUPED SIGNAL STRUCTS
// ============================================================================

/// Selected template and its preview
#[derive(Clone, Copy, PartialEq)]
pub struct TemplateSignals {
    pub path: Signal<Option<PathBuf>>,
    pub template: Signal<Option<Arc<Template>>>,
    pub preview: Signal<Option<String>>, // data URL for <img>
    pub error: Signal<Option<String>>,
}

/// User-editable loop settings, kept as the raw field text
#[derive(Clone, Copy, PartialEq)]
pub struct SettingsSignals {
    pub interval: Signal<String>,
    pub threshold: Signal<String>,
    pub save_matches: Signal<bool>,
}

/// Worker lifecycle and what it reported
#[derive(Clone, Copy, PartialEq)]
pub struct ClickerSignals {
    pub worker: WorkerSlot,
    /// True from start until the worker thread has exited
    pub busy: Signal<bool>,
    pub stopping: Signal<bool>,
    pub status: Signal<ClickerStatus>,
}
