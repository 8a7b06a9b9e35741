use crate::automation::{DEFAULT_INTERVAL_SECS, DEFAULT_THRESHOLD};
use crate::gui::components::{
    controls::Controls, header::Header, status_panel::StatusPanel, template_panel::TemplatePanel,
};
use crate::gui::hooks::{ClickerSignals, SettingsSignals, TemplateSignals, shutdown_clicker};
use crate::gui::status::ClickerStatus;
use dioxus::prelude::*;

pub fn run_gui() {
    use dioxus::desktop::{Config, WindowBuilder};
    let enable_borderless = true; // borderless window
    let config = Config::new().with_window(
        WindowBuilder::new()
            .with_title("Screen Auto Clicker")
            .with_decorations(!enable_borderless) // false => no native title/menu
            .with_resizable(true)
            .with_inner_size(dioxus::desktop::LogicalSize::new(900, 640)),
    );
    dioxus::LaunchBuilder::desktop()
        .with_cfg(config)
        .launch(App);
}

#[component]
fn App() -> Element {
    use dioxus::desktop::use_window; // access desktop window for dragging
    let desktop = use_window();

    let template = TemplateSignals {
        path: use_signal(|| None),
        template: use_signal(|| None),
        preview: use_signal(|| None),
        error: use_signal(|| None),
    };
    let settings = SettingsSignals {
        interval: use_signal(|| DEFAULT_INTERVAL_SECS.to_string()),
        threshold: use_signal(|| DEFAULT_THRESHOLD.to_string()),
        save_matches: use_signal(|| false),
    };
    let clicker = ClickerSignals {
        worker: use_signal(|| None),
        busy: use_signal(|| false),
        stopping: use_signal(|| false),
        status: use_signal(ClickerStatus::default),
    };

    rsx! {
        // Main app container: vertical layout, fills viewport
        div { style: "height:97vh; display:flex; flex-direction:column; background:linear-gradient(135deg,#667eea 0%,#764ba2 100%); color:white; border:1px solid rgba(255,255,255,0.25); box-sizing:content-box;",
            div { style: "flex:1; overflow:auto; padding:8px; display:flex; flex-direction:column; gap:10px;",
                Header {
                    version: env!("APP_VERSION_DISPLAY").to_string(),
                    on_drag: move |_| { let _ = desktop.window.drag_window(); },
                    on_close: move |_| {
                        shutdown_clicker(clicker);
                        std::thread::spawn(|| std::process::exit(0));
                    }
                }
                // Left: template + controls, right: status
                div { style: "display:flex; gap:14px; align-items:flex-start;",
                    div { style: "flex:1; min-width:0; display:flex; flex-direction:column; gap:10px;",
                        TemplatePanel { template: template, clicker: clicker }
                        Controls { template: template, settings: settings, clicker: clicker }
                    }
                    div { style: "flex:1; min-width:0;",
                        StatusPanel { clicker: clicker }
                    }
                }
                div { style: "margin-top:4px; text-align:left; font-size:0.7em; opacity:0.75; letter-spacing:0.5px;", "Built with Rust 🦀 and Dioxus ⚛️" }
            }
        }
    }
}
