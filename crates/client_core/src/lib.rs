use anyhow::Result;
use chrono::Utc;
use shared::protocol::DisplayEvent;
use tokio::sync::mpsc;
use tracing::debug;

pub mod buffers;
pub mod commands;
pub mod connections;
pub mod error;
pub mod loopback;
mod orchestrator;
pub mod runtime;

pub use buffers::{BufferRegistry, NewBuffer};
pub use commands::{BuiltinCommands, SlashCommandPredicate};
pub use connections::{ConnectOptions, ConnectionConfig, ConnectionRegistry};
pub use error::{CoreError, CoreResult};
pub use loopback::LoopbackConnector;
pub use orchestrator::Orchestrator;
pub use runtime::ConnectionEvent;

/// One live protocol session to one server.
pub trait Connection: Send {
    fn send(&mut self, target: &str, text: &str) -> Result<()>;
}

/// Builds the connection for a server.
///
/// Called after the server buffer exists, so the connector may write to it while opening.
pub trait Connector: Send + Sync {
    fn open(
        &self,
        orchestrator: &mut Orchestrator,
        server_id: &str,
        config: &ConnectionConfig,
    ) -> Result<Box<dyn Connection>>;
}

pub trait CommandHandler: Send + Sync {
    fn handle(&self, orchestrator: &mut Orchestrator, server_id: &str, raw: &str)
        -> CoreResult<()>;
}

/// Decides whether a line of user input is a command.
pub trait CommandPredicate: Send + Sync {
    fn is_command(&self, raw: &str) -> bool;
}

impl<F> CommandPredicate for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_command(&self, raw: &str) -> bool {
        self(raw)
    }
}

/// Receives buffer lifecycle and message events for rendering.
pub trait DisplaySink: Send + Sync {
    fn emit(&self, event: DisplayEvent);
}

impl DisplaySink for mpsc::UnboundedSender<DisplayEvent> {
    fn emit(&self, event: DisplayEvent) {
        if self.send(event).is_err() {
            debug!("display channel closed; dropping event");
        }
    }
}

pub trait Clock: Send + Sync {
    /// Milliseconds since the unix epoch.
    fn now_ms(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
