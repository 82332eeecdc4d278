//! Event loop feeding display input and connection traffic into an [`Orchestrator`].

use shared::protocol::UiEvent;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

use crate::Orchestrator;

/// A line of traffic pushed by a live connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionEvent {
    pub server_id: String,
    /// Buffer name under the server the message belongs to.
    pub target: String,
    pub message: String,
    pub timestamp: Option<i64>,
}

impl ConnectionEvent {
    pub fn new(
        server_id: impl Into<String>,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            server_id: server_id.into(),
            target: target.into(),
            message: message.into(),
            timestamp: None,
        }
    }
}

/// Applies events one at a time until the display side hangs up, then hands the orchestrator back.
///
/// Failures are reported to the display and never stop the loop.
pub async fn run(
    mut orchestrator: Orchestrator,
    mut ui_events: UnboundedReceiver<UiEvent>,
    mut connection_events: UnboundedReceiver<ConnectionEvent>,
) -> Orchestrator {
    info!("event loop started");
    loop {
        tokio::select! {
            // Connection traffic first, so echoes of earlier input land before later input.
            biased;
            Some(event) = connection_events.recv() => {
                debug!(server_id = %event.server_id, target = %event.target, "connection event");
                if let Err(err) = orchestrator.deliver(event) {
                    orchestrator.report(&err);
                }
            }
            event = ui_events.recv() => {
                let Some(event) = event else {
                    break;
                };
                if let Err(err) = orchestrator.handle_event(event) {
                    orchestrator.report(&err);
                }
            }
        }
    }
    info!("display channel closed; event loop stopped");
    orchestrator
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
