// Communication channels between the click loop and its controller
use super::types::{AutomationCommand, AutomationEvent};
use tokio::sync::mpsc;

/// Loop -> controller. Unbounded so the loop never waits on a slow UI.
pub type EventSender = mpsc::UnboundedSender<AutomationEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<AutomationEvent>;

/// Helper function to create automation channels
pub fn create_automation_channels() -> (
    mpsc::Sender<AutomationCommand>,
    mpsc::Receiver<AutomationCommand>,
    EventSender,
    EventReceiver,
) {
    let (cmd_tx, cmd_rx) = mpsc::channel(32);
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    (cmd_tx, cmd_rx, event_tx, event_rx)
}
