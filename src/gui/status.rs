// gui/status.rs
// View model fed by worker events

use crate::automation::{AutomationEvent, LoopState};
use std::collections::VecDeque;
use time::OffsetDateTime;
use time::macros::format_description;

const HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub message: String,
    pub is_error: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClickerStatus {
    pub state: LoopState,
    pub message: String,
    pub ticks: u64,
    pub matches: u64,
    pub last_score: Option<f32>,
    pub last_match: Option<String>,
    /// Newest first
    pub history: VecDeque<HistoryEntry>,
}

impl Default for ClickerStatus {
    fn default() -> Self {
        Self {
            state: LoopState::Idle,
            message: "Select a template image to begin".to_string(),
            ticks: 0,
            matches: 0,
            last_score: None,
            last_match: None,
            history: VecDeque::new(),
        }
    }
}

impl ClickerStatus {
    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Reset counters for a new run
    pub fn begin_run(&mut self) {
        self.ticks = 0;
        self.matches = 0;
        self.last_score = None;
        self.last_match = None;
        self.message = "Starting...".to_string();
    }

    pub fn apply(&mut self, event: AutomationEvent) {
        match event {
            AutomationEvent::StateChanged(state) => self.state = state,
            AutomationEvent::Status(msg) => {
                self.push(format!("ℹ️ {msg}"), false);
                self.message = msg;
            }
            AutomationEvent::TickCompleted { at, result } => {
                self.ticks += 1;
                self.last_score = Some(result.candidate.score);
                if !result.found {
                    self.message = format!(
                        "👀 No match at {} (best {:.3})",
                        clock(at),
                        result.candidate.score
                    );
                }
            }
            AutomationEvent::MatchFound {
                at,
                location: (x, y),
                score,
            } => {
                self.matches += 1;
                let line = format!("🎯 {} clicked ({}, {}) score {:.3}", clock(at), x, y, score);
                self.push(line.clone(), false);
                self.message = line.clone();
                self.last_match = Some(line);
            }
            AutomationEvent::SnapshotSaved(path) => {
                self.push(format!("💾 {}", path.display()), false);
            }
            AutomationEvent::Error(msg) => {
                self.push(format!("❌ {msg}"), true);
                self.message = format!("❌ {msg}");
            }
        }
    }

    /// Record a message that did not come from the worker
    pub fn note(&mut self, message: impl Into<String>, is_error: bool) {
        let message = message.into();
        self.push(message.clone(), is_error);
        self.message = message;
    }

    fn push(&mut self, message: String, is_error: bool) {
        self.history.push_front(HistoryEntry { message, is_error });
        self.history.truncate(HISTORY_LIMIT);
    }
}

fn clock(at: OffsetDateTime) -> String {
    let format = format_description!("[hour]:[minute]:[second]");
    at.format(&format).unwrap_or_default()
}
