pub mod clicker_worker;
pub mod types;

pub use clicker_worker::{load_template, request_check, shutdown_clicker, start_clicker, stop_clicker};
pub use types::*;
