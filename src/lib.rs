pub mod automation;
pub mod gui;
pub mod screen;
pub mod template_matching;

pub use automation::{AutoClicker, ClickerWorker, LoopConfig};
pub use screen::{ClickerError, ClickerResult};
pub use template_matching::{Template, TemplateMatcher};
