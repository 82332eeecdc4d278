//! Test doubles shared by the unit tests of this crate.

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use shared::{
    domain::BufferRef,
    protocol::{DisplayEvent, TimestampedMessage},
};

use crate::{
    connections::ConnectionConfig, BuiltinCommands, Clock, CommandHandler, Connection, Connector,
    CoreResult, DisplaySink, Orchestrator, SlashCommandPredicate,
};

#[derive(Default)]
pub struct RecordingDisplay {
    events: Mutex<Vec<DisplayEvent>>,
}

impl RecordingDisplay {
    pub fn events(&self) -> Vec<DisplayEvent> {
        self.events.lock().expect("display lock").clone()
    }

    pub fn messages(&self) -> Vec<(BufferRef, TimestampedMessage)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                DisplayEvent::MessageReceived { buffer, message } => Some((buffer, message)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().expect("display lock").clear();
    }
}

impl DisplaySink for RecordingDisplay {
    fn emit(&self, event: DisplayEvent) {
        self.events.lock().expect("display lock").push(event);
    }
}

pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentLine {
    pub server_id: String,
    pub target: String,
    pub text: String,
}

/// Connector whose connections record every line they are asked to send.
#[derive(Default)]
pub struct RecordingConnector {
    pub opened: Mutex<Vec<(String, ConnectionConfig)>>,
    pub server_buffer_existed_on_open: Mutex<Vec<bool>>,
    pub sent: Arc<Mutex<Vec<SentLine>>>,
    pub fail_open: bool,
    pub fail_send: bool,
}

impl RecordingConnector {
    pub fn failing_open() -> Self {
        Self {
            fail_open: true,
            ..Self::default()
        }
    }

    pub fn failing_send() -> Self {
        Self {
            fail_send: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<SentLine> {
        self.sent.lock().expect("sent lock").clone()
    }

    pub fn opened_servers(&self) -> Vec<String> {
        self.opened
            .lock()
            .expect("opened lock")
            .iter()
            .map(|(server_id, _)| server_id.clone())
            .collect()
    }
}

impl Connector for RecordingConnector {
    fn open(
        &self,
        orchestrator: &mut Orchestrator,
        server_id: &str,
        config: &ConnectionConfig,
    ) -> Result<Box<dyn Connection>> {
        self.server_buffer_existed_on_open
            .lock()
            .expect("open lock")
            .push(orchestrator.buffer_exists(&BufferRef::server(server_id)));
        if self.fail_open {
            return Err(anyhow!("connection refused"));
        }
        self.opened
            .lock()
            .expect("opened lock")
            .push((server_id.to_string(), config.clone()));
        Ok(Box::new(RecordingConnection {
            server_id: server_id.to_string(),
            sent: Arc::clone(&self.sent),
            fail: self.fail_send,
        }))
    }
}

struct RecordingConnection {
    server_id: String,
    sent: Arc<Mutex<Vec<SentLine>>>,
    fail: bool,
}

impl Connection for RecordingConnection {
    fn send(&mut self, target: &str, text: &str) -> Result<()> {
        if self.fail {
            return Err(anyhow!("socket closed"));
        }
        self.sent.lock().expect("sent lock").push(SentLine {
            server_id: self.server_id.clone(),
            target: target.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }
}

/// Command handler that only records what it was asked to run.
#[derive(Default)]
pub struct RecordingCommands {
    pub calls: Mutex<Vec<(String, String)>>,
}

impl CommandHandler for RecordingCommands {
    fn handle(
        &self,
        _orchestrator: &mut Orchestrator,
        server_id: &str,
        raw: &str,
    ) -> CoreResult<()> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((server_id.to_string(), raw.to_string()));
        Ok(())
    }
}

pub const NOW_MS: i64 = 1_700_000_000_000;

pub struct Harness {
    pub display: Arc<RecordingDisplay>,
    pub connector: Arc<RecordingConnector>,
    pub orchestrator: Orchestrator,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_connector(RecordingConnector::default())
    }

    pub fn with_connector(connector: RecordingConnector) -> Self {
        Self::with_commands(connector, Arc::new(BuiltinCommands::default()))
    }

    pub fn with_commands(connector: RecordingConnector, commands: Arc<dyn CommandHandler>) -> Self {
        let display = Arc::new(RecordingDisplay::default());
        let connector = Arc::new(connector);
        let orchestrator = Orchestrator::new_with_dependencies(
            display.clone(),
            connector.clone(),
            commands,
            Arc::new(SlashCommandPredicate),
            Arc::new(FixedClock(NOW_MS)),
        );
        Self {
            display,
            connector,
            orchestrator,
        }
    }
}
