// gui/mod.rs
// GUI module root for screen-auto-clicker

pub mod util;
mod components {
    pub mod controls;
    pub mod header;
    pub mod status_panel;
    pub mod template_panel;
}
pub mod dioxus_app; // main app
mod hooks;
pub mod status;
