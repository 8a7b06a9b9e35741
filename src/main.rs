mod args;

use args::{Args, Mode};
use screen_auto_clicker::automation::{AutoClicker, AutomationCommand, LoopConfig, create_automation_channels};
use screen_auto_clicker::gui::dioxus_app::run_gui;
use screen_auto_clicker::screen::{EnigoPointer, XcapCapturer};
use screen_auto_clicker::template_matching::Template;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

fn main() -> ExitCode {
    let args = match Args::parse() {
        Ok(Some(args)) => args,
        Ok(None) => return ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("❌ {}", msg);
            eprintln!("Run with --help for usage.");
            return ExitCode::FAILURE;
        }
    };

    init_logging(args.debug_mode);
    for warning in &args.warnings {
        log::warn!("⚠️ {}", warning);
    }

    match args.mode {
        Mode::Gui => {
            println!("🚀 Launching Screen Auto Clicker GUI...");
            run_gui();
            ExitCode::SUCCESS
        }
        Mode::Run {
            template,
            interval_secs,
        } => run_cli(template, interval_secs, args.threshold, args.snapshot_dir),
    }
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn run_cli(
    template_path: PathBuf,
    interval_secs: u64,
    threshold: f32,
    snapshot_dir: Option<PathBuf>,
) -> ExitCode {
    let template = match Template::load(&template_path) {
        Ok(t) => Arc::new(t),
        Err(e) => {
            log::error!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };

    let pointer = match EnigoPointer::new() {
        Ok(p) => p,
        Err(e) => {
            log::error!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut config = LoopConfig::new(Duration::from_secs(interval_secs), threshold);
    if let Some(dir) = snapshot_dir {
        log::info!("💾 Saving match snapshots to {}", dir.display());
        config = config.with_snapshot_dir(dir);
    }

    log::info!(
        "🖼️ Loaded template {} ({}x{})",
        template.display_name(),
        template.width(),
        template.height()
    );
    log::info!(
        "⏱️ Checking every {} seconds (threshold {:.2}). Press Ctrl+C to stop.",
        interval_secs,
        threshold
    );

    let mut clicker = match AutoClicker::new(template, config, XcapCapturer::new(), pointer) {
        Ok(c) => c,
        Err(e) => {
            log::error!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            log::error!("❌ Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    rt.block_on(async move {
        let (cmd_tx, mut cmd_rx, event_tx, _event_rx) = create_automation_channels();

        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    log::info!("🛑 Interrupt received, stopping...");
                    let _ = cmd_tx.send(AutomationCommand::Stop).await;
                }
                Err(e) => {
                    // Keep the sender alive; a closed channel would end the loop
                    log::warn!("⚠️ Could not listen for Ctrl+C: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        });

        clicker.run(&mut cmd_rx, &event_tx).await;
    });

    println!("👋 Auto clicker stopped. Goodbye!");
    ExitCode::SUCCESS
}
