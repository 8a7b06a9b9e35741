// gui/components/template_panel.rs
use crate::gui::hooks::{ClickerSignals, TemplateSignals, load_template};
use crate::gui::util::IMAGE_EXTENSIONS;
use dioxus::prelude::*;

#[derive(Props, PartialEq, Clone)]
pub struct TemplatePanelProps {
    pub template: TemplateSignals,
    pub clicker: ClickerSignals,
}

#[component]
pub fn TemplatePanel(props: TemplatePanelProps) -> Element {
    let tpl = props.template;
    let clicker = props.clicker;
    let locked = *clicker.busy.read();

    let path_label = tpl
        .path
        .read()
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "No image selected".to_string());
    let dims = tpl
        .template
        .read()
        .as_ref()
        .map(|t| format!("{} x {} px", t.width(), t.height()));
    let preview = tpl.preview.read().clone();
    let error = tpl.error.read().clone();

    rsx! {
        div { style: "background: rgba(255,255,255,0.1); backdrop-filter: blur(10px); padding: 14px; border-radius: 12px; border: 1px solid rgba(255,255,255,0.2);",
            h2 { style: "margin:0 0 8px 0; color:#90ee90; font-size:0.95em;", "🖼️ Template" }
            div { style: "display:flex; align-items:center; gap:10px;",
                button {
                    style: if locked { "background:#555; color:#bbb; padding:8px 14px; border:none; border-radius:8px; cursor:not-allowed;" } else { "background:linear-gradient(45deg,#17a2b8,#138496); color:white; padding:8px 14px; border:none; border-radius:8px; cursor:pointer; font-weight:bold;" },
                    disabled: locked,
                    onclick: move |_| {
                        let picked = rfd::FileDialog::new()
                            .set_title("Select template image")
                            .add_filter("Images", IMAGE_EXTENSIONS)
                            .pick_file();
                        if let Some(path) = picked {
                            load_template(path, tpl, clicker);
                        }
                    },
                    "📂 Choose Image"
                }
                span { style: "font-size:0.8em; color:#ffd700; word-break:break-all;", "{path_label}" }
            }
            if let Some(dims) = dims {
                p { style: "margin:6px 0 0 0; font-size:0.8em;", strong { "Size: " } "{dims}" }
            }
            if let Some(err) = error {
                p { style: "margin:6px 0 0 0; font-size:0.8em; color:#ff6262;", "❌ {err}" }
            }
            if let Some(src) = preview {
                div { style: "margin-top:10px; text-align:center; background:rgba(0,0,0,0.25); border-radius:8px; padding:8px;",
                    img { src: "{src}", style: "max-width:100%; max-height:220px; image-rendering:pixelated; border:2px solid rgba(255,255,255,0.3);" }
                }
            }
        }
    }
}
