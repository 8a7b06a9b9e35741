// gui/components/status_panel.rs
use crate::automation::LoopState;
use crate::gui::hooks::ClickerSignals;
use dioxus::prelude::*;

#[derive(Props, PartialEq, Clone)]
pub struct StatusPanelProps {
    pub clicker: ClickerSignals,
}

#[component]
pub fn StatusPanel(props: StatusPanelProps) -> Element {
    let status = props.clicker.status.read().clone();
    let stopping = *props.clicker.stopping.read();

    let (badge, badge_style) = match (status.state, stopping) {
        (LoopState::Running, true) => (
            "Stopping",
            "background: #5a4b1f; color: #ffd857; border: 1px solid #ffd857;",
        ),
        (LoopState::Running, false) => (
            "Running",
            "background: #1f5130; color: #48ff9b; border: 1px solid #48ff9b;",
        ),
        (LoopState::Idle, _) => (
            "Idle",
            "background: rgba(0,0,0,0.25); color: #ddd; border: 1px solid rgba(255,255,255,0.3);",
        ),
    };
    let score = status
        .last_score
        .map(|s| format!("{s:.3}"))
        .unwrap_or_else(|| "-".to_string());
    let last_match = status.last_match.clone().unwrap_or_else(|| "-".to_string());

    rsx! {
        div { style: "background: rgba(255,255,255,0.1); backdrop-filter: blur(10px); padding: 14px; border-radius: 12px; border: 1px solid rgba(255,255,255,0.2); display:flex; flex-direction:column; gap:8px;",
            div { style: "display:flex; align-items:center; gap:8px;",
                h2 { style: "margin:0; color:#ffb347; font-size:0.95em;", "📊 Status" }
                span { style: "{badge_style} padding: 3px 10px; border-radius: 16px; font-size: 0.75em; font-weight: 600;", "{badge}" }
            }
            p { style: "margin:0; font-size:0.85em;", "{status.message}" }
            div { style: "display:grid; grid-template-columns:1fr 1fr 1fr; gap:8px; font-size:0.8em;",
                p { style: "margin:0;", strong { "Checks: " } span { style: "color:#ffd700;", "{status.ticks}" } }
                p { style: "margin:0;", strong { "Clicks: " } span { style: "color:#ffd700;", "{status.matches}" } }
                p { style: "margin:0;", strong { "Last score: " } span { style: "color:#ffd700;", "{score}" } }
            }
            p { style: "margin:0; font-size:0.8em;", strong { "Last match: " } "{last_match}" }
            div { style: "max-height:200px; overflow:auto; background:rgba(0,0,0,0.25); border-radius:8px; padding:6px; font-family:monospace; font-size:0.75em;",
                for (i, entry) in status.history.iter().enumerate() {
                    div { key: "{i}", style: if entry.is_error { "color:#ff6262;" } else { "color:#e0e0e0;" }, "{entry.message}" }
                }
            }
        }
    }
}
