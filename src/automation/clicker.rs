// Capture-match-click loop
use super::channels::EventSender;
use super::snapshot::SnapshotWriter;
use super::types::{AutomationCommand, AutomationEvent, LoopConfig, LoopState, now};
use crate::screen::{ClickerResult, PointerController, ScreenCapturer};
use crate::template_matching::{MatchResult, Template, TemplateMatcher, rgba_to_gray};
use image::RgbaImage;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::time::sleep;

/// Result of one tick plus the snapshot written for it, if any
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub result: MatchResult,
    pub snapshot: Option<PathBuf>,
}

pub struct AutoClicker<C, P> {
    matcher: TemplateMatcher,
    config: LoopConfig,
    capturer: C,
    pointer: P,
    snapshots: Option<SnapshotWriter>,
    state: LoopState,
}

impl<C: ScreenCapturer, P: PointerController> AutoClicker<C, P> {
    pub fn new(
        template: Arc<Template>,
        config: LoopConfig,
        capturer: C,
        pointer: P,
    ) -> ClickerResult<Self> {
        config.validate()?;
        let snapshots = config.snapshot_dir.clone().map(SnapshotWriter::new);
        Ok(Self {
            matcher: TemplateMatcher::new(template),
            config,
            capturer,
            pointer,
            snapshots,
            state: LoopState::Idle,
        })
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn template(&self) -> &Template {
        self.matcher.template()
    }

    pub fn capturer(&self) -> &C {
        &self.capturer
    }

    pub fn pointer(&self) -> &P {
        &self.pointer
    }

    /// Full-screen color snapshot from the injected capturer.
    pub fn capture(&mut self) -> ClickerResult<RgbaImage> {
        self.capturer.capture()
    }

    /// One capture-match-click attempt.
    pub fn find_and_click(&mut self) -> ClickerResult<MatchResult> {
        self.tick().map(|outcome| outcome.result)
    }

    /// Like `find_and_click`, also reporting the debug snapshot path.
    pub fn tick(&mut self) -> ClickerResult<TickOutcome> {
        let capture = self.capture()?;
        let gray = rgba_to_gray(&capture);
        let candidate = self.matcher.best_match(&gray)?;

        if !candidate.clears(self.config.threshold) {
            log::debug!(
                "👀 Best score {:.3} below threshold {:.3} at ({}, {})",
                candidate.score,
                self.config.threshold,
                candidate.x,
                candidate.y
            );
            return Ok(TickOutcome {
                result: MatchResult::missed(candidate),
                snapshot: None,
            });
        }

        let (click_x, click_y) = self.template().click_point(candidate.x, candidate.y);
        self.pointer.click(click_x, click_y)?;

        let snapshot = self.snapshots.as_ref().and_then(|writer| {
            let tpl = self.matcher.template();
            match writer.save(&capture, &candidate, tpl.width(), tpl.height(), now()) {
                Ok(path) => Some(path),
                Err(e) => {
                    log::warn!("⚠️ {}", e);
                    None
                }
            }
        });

        Ok(TickOutcome {
            result: MatchResult::matched(candidate, (click_x, click_y)),
            snapshot,
        })
    }

    /// Tick every `interval` until a stop request arrives or every command sender is gone.
    ///
    /// Stop requests are checked before each tick and end any sleep in progress.
    pub async fn run(
        &mut self,
        commands: &mut mpsc::Receiver<AutomationCommand>,
        events: &EventSender,
    ) {
        self.change_state(LoopState::Running, events);
        log::info!("📺 Capturing from {}", self.capturer.describe());
        emit(
            events,
            AutomationEvent::Status(format!(
                "Auto clicker started: every {}s, threshold {:.2}",
                self.config.interval.as_secs_f32(),
                self.config.threshold
            )),
        );

        loop {
            if stop_requested(commands) {
                break;
            }

            self.run_tick(events);

            tokio::select! {
                _ = sleep(self.config.interval) => {}
                command = commands.recv() => match command {
                    Some(AutomationCommand::TickNow) => {
                        log::debug!("⏩ Immediate tick requested");
                    }
                    Some(AutomationCommand::Stop) | None => break,
                }
            }
        }

        self.change_state(LoopState::Idle, events);
        emit(events, AutomationEvent::Status("Auto clicker stopped".to_string()));
    }

    fn run_tick(&mut self, events: &EventSender) {
        match self.tick() {
            Ok(outcome) => {
                let at = now();
                let result = outcome.result;
                if let Some((x, y)) = result.location {
                    log::info!("🎯 {}", result.summary());
                    emit(
                        events,
                        AutomationEvent::MatchFound {
                            at,
                            location: (x, y),
                            score: result.candidate.score,
                        },
                    );
                } else {
                    log::info!("👀 {}", result.summary());
                }
                emit(events, AutomationEvent::TickCompleted { at, result });
                if let Some(path) = outcome.snapshot {
                    emit(events, AutomationEvent::SnapshotSaved(path));
                }
            }
            Err(e) => {
                if e.is_per_tick() {
                    log::warn!("⚠️ Tick failed: {}", e);
                } else {
                    log::error!("❌ Tick failed: {}", e);
                }
                emit(events, AutomationEvent::Error(e.to_string()));
            }
        }
    }

    fn change_state(&mut self, new_state: LoopState, events: &EventSender) {
        if self.state != new_state {
            log::debug!("🔁 Auto clicker state: {:?} -> {:?}", self.state, new_state);
            self.state = new_state;
            emit(events, AutomationEvent::StateChanged(new_state));
        }
    }
}

/// Drain queued commands without waiting. A closed channel counts as a stop request.
fn stop_requested(commands: &mut mpsc::Receiver<AutomationCommand>) -> bool {
    loop {
        match commands.try_recv() {
            Ok(AutomationCommand::Stop) => return true,
            Ok(AutomationCommand::TickNow) => continue,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => return true,
        }
    }
}

fn emit(events: &EventSender, event: AutomationEvent) {
    // Nobody listening (e.g. CLI) is fine
    let _ = events.send(event);
}
