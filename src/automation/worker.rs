//! Background worker: runs the click loop on its own thread.
//!
//! The control side only holds a command sender and the join handle; status flows back
//! over the event channel returned by [`ClickerWorker::spawn`].

use super::channels::{EventReceiver, EventSender, create_automation_channels};
use super::clicker::AutoClicker;
use super::types::{AutomationCommand, AutomationEvent, LoopState};
use crate::screen::{ClickerResult, PointerController, ScreenCapturer};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use tokio::sync::mpsc;

pub struct ClickerWorker {
    commands: mpsc::Sender<AutomationCommand>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ClickerWorker {
    /// Start a worker thread. `factory` runs on that thread, so the screen capabilities it
    /// builds never cross threads.
    pub fn spawn<F, C, P>(factory: F) -> ClickerResult<(Self, EventReceiver)>
    where
        F: FnOnce() -> ClickerResult<AutoClicker<C, P>> + Send + 'static,
        C: ScreenCapturer + 'static,
        P: PointerController + 'static,
    {
        let (cmd_tx, cmd_rx, event_tx, event_rx) = create_automation_channels();
        let handle = thread::Builder::new()
            .name("auto-clicker".to_string())
            .spawn(move || worker_main(factory, cmd_rx, event_tx))?;

        Ok((
            Self {
                commands: cmd_tx,
                handle: Some(handle),
            },
            event_rx,
        ))
    }

    /// Ask the loop to stop. Returns immediately; a worker that already exited ignores it.
    pub fn stop(&self) {
        self.send(AutomationCommand::Stop);
    }

    /// Ask the loop to tick now instead of finishing its sleep.
    pub fn request_tick(&self) {
        self.send(AutomationCommand::TickNow);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    /// Block until the worker thread has exited.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("❌ Auto clicker worker thread panicked outside the loop");
            }
        }
    }

    /// Stop request followed by a blocking wait, with no timeout.
    pub fn stop_and_join(self) {
        self.stop();
        self.join();
    }

    fn send(&self, command: AutomationCommand) {
        if let Err(e) = self.commands.try_send(command) {
            log::debug!("Auto clicker command {:?} not delivered: {}", command, e);
        }
    }
}

impl Drop for ClickerWorker {
    fn drop(&mut self) {
        // Dropping the sender alone would also end the loop; be explicit.
        if self.handle.is_some() {
            self.stop();
        }
    }
}

fn worker_main<F, C, P>(
    factory: F,
    mut commands: mpsc::Receiver<AutomationCommand>,
    events: EventSender,
) where
    F: FnOnce() -> ClickerResult<AutoClicker<C, P>>,
    C: ScreenCapturer,
    P: PointerController,
{
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            report_failure(&events, format!("Failed to start worker runtime: {e}"));
            return;
        }
    };

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| match factory() {
        Ok(mut clicker) => runtime.block_on(clicker.run(&mut commands, &events)),
        Err(e) => {
            log::error!("❌ Failed to start auto clicker: {}", e);
            report_failure(&events, e.to_string());
        }
    }));

    if let Err(payload) = outcome {
        let message = panic_message(payload.as_ref());
        log::error!("💥 Auto clicker stopped after unexpected failure: {}", message);
        report_failure(&events, format!("Unexpected failure: {message}"));
    }
}

fn report_failure(events: &EventSender, message: String) {
    let _ = events.send(AutomationEvent::Error(message));
    let _ = events.send(AutomationEvent::StateChanged(LoopState::Idle));
    let _ = events.send(AutomationEvent::Status("Auto clicker stopped".to_string()));
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
