use crate::automation::{
    AutoClicker, ClickerWorker, DEFAULT_SNAPSHOT_DIR, EventReceiver, LoopConfig,
};
use crate::gui::hooks::types::*;
use crate::gui::util::{data_url, parse_interval_secs, parse_threshold};
use crate::screen::{EnigoPointer, XcapCapturer};
use crate::template_matching::Template;
use dioxus::prelude::*;
use rfd::{MessageButtons, MessageDialog, MessageLevel};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Load the picked file as the template and refresh the preview.
/// On failure the previous template is cleared so start stays disabled.
pub fn load_template(path: PathBuf, mut tpl: TemplateSignals, mut clicker: ClickerSignals) {
    match Template::load(&path) {
        Ok(template) => {
            let preview = std::fs::read(&path)
                .map(|bytes| data_url(&path, &bytes))
                .ok();
            clicker.status.with_mut(|s| {
                s.note(
                    format!(
                        "🖼️ Loaded {} ({}x{})",
                        template.display_name(),
                        template.width(),
                        template.height()
                    ),
                    false,
                )
            });
            tpl.template.set(Some(Arc::new(template)));
            tpl.preview.set(preview);
            tpl.error.set(None);
        }
        Err(e) => {
            log::warn!("⚠️ {}", e);
            tpl.template.set(None);
            tpl.preview.set(None);
            tpl.error.set(Some(e.to_string()));
            clicker.status.with_mut(|s| s.note(format!("❌ {e}"), true));
            show_error("Template could not be loaded", &e.to_string());
        }
    }
    tpl.path.set(Some(path));
}

fn build_config(settings: SettingsSignals) -> Result<LoopConfig, String> {
    let interval = parse_interval_secs(&settings.interval.read())
        .ok_or_else(|| format!("Invalid interval: {}", settings.interval.read()))?;
    let threshold = parse_threshold(&settings.threshold.read())
        .ok_or_else(|| format!("Invalid threshold: {}", settings.threshold.read()))?;

    let mut config = LoopConfig::new(Duration::from_secs(interval), threshold);
    if *settings.save_matches.read() {
        config = config.with_snapshot_dir(DEFAULT_SNAPSHOT_DIR);
    }
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// Spawn the worker and start forwarding its events into `clicker.status`.
pub fn start_clicker(tpl: TemplateSignals, settings: SettingsSignals, mut clicker: ClickerSignals) {
    if *clicker.busy.read() {
        return;
    }

    let Some(template) = tpl.template.read().clone() else {
        let reason = missing_template_reason(tpl.error.read().as_deref());
        clicker.status.with_mut(|s| s.note(format!("❌ {reason}"), true));
        show_error("Cannot start", &reason);
        return;
    };

    let config = match build_config(settings) {
        Ok(config) => config,
        Err(e) => {
            clicker.status.with_mut(|s| s.note(format!("❌ {e}"), true));
            show_error("Cannot start", &e);
            return;
        }
    };

    log::info!(
        "🚀 Starting auto clicker: {} every {}s, threshold {:.2}",
        template.display_name(),
        config.interval.as_secs(),
        config.threshold
    );

    let spawned = ClickerWorker::spawn(move || {
        let pointer = EnigoPointer::new()?;
        AutoClicker::new(template, config, XcapCapturer::new(), pointer)
    });

    match spawned {
        Ok((worker, events)) => {
            clicker.status.with_mut(|s| s.begin_run());
            clicker.worker.set(Some(worker));
            clicker.busy.set(true);
            clicker.stopping.set(false);
            spawn(forward_events(events, clicker));
        }
        Err(e) => {
            log::error!("❌ {}", e);
            clicker.status.with_mut(|s| s.note(format!("❌ {e}"), true));
            show_error("Cannot start", &e.to_string());
        }
    }
}

/// Why start was refused when no template is loaded.
fn missing_template_reason(load_error: Option<&str>) -> String {
    match load_error {
        Some(e) => format!("The selected template is not usable: {e}"),
        None => "No template selected. Pick an image first.".to_string(),
    }
}

/// Blocking error dialog; returns once the user dismisses it.
fn show_error(title: &str, message: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title(title)
        .set_description(message)
        .set_buttons(MessageButtons::Ok)
        .show();
}

/// Ask the worker to stop. Controls come back once its event channel closes.
pub fn stop_clicker(mut clicker: ClickerSignals) {
    if let Some(worker) = clicker.worker.read().as_ref() {
        worker.stop();
        clicker.stopping.set(true);
        clicker.status.with_mut(|s| s.note("🛑 Stopping...", false));
    }
}

/// Stop the running worker and wait for its thread before the window goes away.
pub fn shutdown_clicker(mut clicker: ClickerSignals) {
    let worker = clicker.worker.write().take();
    release_worker(worker);
}

fn release_worker(worker: Option<ClickerWorker>) {
    if let Some(worker) = worker {
        log::info!("🛑 Stopping auto clicker before exit");
        worker.stop_and_join();
    }
}

pub fn request_check(clicker: ClickerSignals) {
    if let Some(worker) = clicker.worker.read().as_ref() {
        worker.request_tick();
    }
}

/// Drain worker events until the worker drops its sender, then reap the thread.
async fn forward_events(mut events: EventReceiver, mut clicker: ClickerSignals) {
    while let Some(event) = events.recv().await {
        clicker.status.with_mut(|s| s.apply(event));
    }

    let worker = clicker.worker.write().take();
    if let Some(worker) = worker {
        if let Err(e) = tokio::task::spawn_blocking(move || worker.join()).await {
            log::error!("❌ Failed to join auto clicker worker: {}", e);
        }
    }

    clicker.busy.set(false);
    clicker.stopping.set(false);
    log::info!("✅ Auto clicker worker exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::AutomationEvent;
    use crate::screen::mock::{RecordingPointer, StaticCapturer};
    use image::{GrayImage, Luma, Rgba, RgbaImage};

    #[test]
    fn test_missing_template_reason() {
        assert_eq!(
            missing_template_reason(None),
            "No template selected. Pick an image first."
        );
        assert!(missing_template_reason(Some("Template not found: a.png")).ends_with("a.png"));
    }

    #[test]
    fn test_release_worker_joins_running_worker() {
        let gray = GrayImage::from_fn(8, 8, |x, y| Luma([((x * 31 + y * 17) % 251) as u8]));
        let template = Arc::new(Template::from_gray(gray, "t.png").unwrap());
        let screen = RgbaImage::from_pixel(40, 30, Rgba([9, 9, 9, 255]));
        let config = LoopConfig::new(Duration::from_secs(3600), 0.8);

        let (worker, mut events) = ClickerWorker::spawn(move || {
            AutoClicker::new(template, config, StaticCapturer::new(screen), RecordingPointer::new())
        })
        .unwrap();

        release_worker(Some(worker));

        // Thread is gone, so its sender is closed and the last state is Idle
        let mut last_state = None;
        while let Some(event) = events.blocking_recv() {
            if let AutomationEvent::StateChanged(s) = event {
                last_state = Some(s);
            }
        }
        assert_eq!(last_state, Some(crate::automation::LoopState::Idle));

        release_worker(None);
    }
}
