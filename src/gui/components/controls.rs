// gui/components/controls.rs
use crate::automation::{MAX_INTERVAL_SECS, MIN_INTERVAL_SECS};
use crate::gui::hooks::{
    ClickerSignals, SettingsSignals, TemplateSignals, request_check, start_clicker, stop_clicker,
};
use dioxus::prelude::*;

const BUTTON_BASE: &str = "color:white; padding:12px 20px; border:none; border-radius:10px; font-size:1em; font-weight:bold; min-width:120px;";

fn button_style(enabled: bool, gradient: &str) -> String {
    if enabled {
        format!("background:{gradient}; cursor:pointer; {BUTTON_BASE}")
    } else {
        format!("background:#555; opacity:0.6; cursor:not-allowed; {BUTTON_BASE}")
    }
}

#[derive(Props, PartialEq, Clone)]
pub struct ControlsProps {
    pub template: TemplateSignals,
    pub settings: SettingsSignals,
    pub clicker: ClickerSignals,
}

#[component]
pub fn Controls(props: ControlsProps) -> Element {
    let tpl = props.template;
    let settings = props.settings;
    let clicker = props.clicker;
    let mut interval = settings.interval;
    let mut threshold = settings.threshold;
    let mut save_matches = settings.save_matches;

    let busy = *clicker.busy.read();
    let stopping = *clicker.stopping.read();
    let has_template = tpl.template.read().is_some();
    let can_start = !busy && has_template;
    let can_stop = busy && !stopping;
    let interval_value = interval.read().clone();
    let threshold_value = threshold.read().clone();

    rsx! {
        div { style: "background: rgba(255,255,255,0.1); backdrop-filter: blur(10px); padding: 14px; border-radius: 12px; border: 1px solid rgba(255,255,255,0.2);",
            h2 { style: "margin:0 0 8px 0; color:#87ceeb; font-size:0.95em;", "🎮 Controls" }
            div { style: "display:grid; grid-template-columns:auto 1fr; gap:8px 12px; align-items:center; font-size:0.85em;",
                label { r#for: "interval-input", "⏱️ Interval (s)" }
                input {
                    id: "interval-input",
                    r#type: "number",
                    min: "{MIN_INTERVAL_SECS}",
                    max: "{MAX_INTERVAL_SECS}",
                    step: "1",
                    disabled: busy,
                    value: "{interval_value}",
                    oninput: move |evt| interval.set(evt.value()),
                    style: "width:90px; padding:4px;"
                }
                label { r#for: "threshold-input", "🎯 Threshold" }
                input {
                    id: "threshold-input",
                    r#type: "number",
                    min: "0",
                    max: "1",
                    step: "0.05",
                    disabled: busy,
                    value: "{threshold_value}",
                    oninput: move |evt| threshold.set(evt.value()),
                    style: "width:90px; padding:4px;"
                }
                label { r#for: "save-matches-checkbox", "💾 Save matches" }
                input {
                    id: "save-matches-checkbox",
                    r#type: "checkbox",
                    disabled: busy,
                    checked: *save_matches.read(),
                    onchange: move |evt| save_matches.set(evt.value().parse().unwrap_or(false)),
                    style: "width:18px; height:18px; cursor:pointer;"
                }
            }
            div { style: "display:flex; gap:10px; flex-wrap:wrap; justify-content:center; margin-top:12px;",
                button {
                    style: button_style(can_start, "linear-gradient(45deg,#28a745,#20c997)"),
                    disabled: !can_start,
                    onclick: move |_| start_clicker(tpl, settings, clicker),
                    "▶️ Start"
                }
                button {
                    style: button_style(can_stop, "linear-gradient(45deg,#dc3545,#e74c3c)"),
                    disabled: !can_stop,
                    onclick: move |_| stop_clicker(clicker),
                    if stopping { "⏳ Stopping..." } else { "⏹️ Stop" }
                }
                button {
                    style: button_style(can_stop, "linear-gradient(45deg,#ff6b35,#f7931e)"),
                    disabled: !can_stop,
                    onclick: move |_| request_check(clicker),
                    "🔍 Check Now"
                }
            }
        }
    }
}
