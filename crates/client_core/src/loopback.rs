//! Stand-in connector that echoes outgoing lines back as incoming traffic.

use anyhow::{anyhow, Result};
use shared::domain::BufferRef;
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    connections::ConnectionConfig, runtime::ConnectionEvent, Connection, Connector, Orchestrator,
};

pub struct LoopbackConnector {
    events: UnboundedSender<ConnectionEvent>,
}

impl LoopbackConnector {
    pub fn new(events: UnboundedSender<ConnectionEvent>) -> Self {
        Self { events }
    }
}

impl Connector for LoopbackConnector {
    fn open(
        &self,
        orchestrator: &mut Orchestrator,
        server_id: &str,
        config: &ConnectionConfig,
    ) -> Result<Box<dyn Connection>> {
        orchestrator.write_to_buffer(
            &BufferRef::server(server_id),
            format!(
                "connected to {server_id} as {} ({}, {})",
                config.nick, config.username, config.realname
            ),
            None,
        )?;
        Ok(Box::new(LoopbackConnection {
            server_id: server_id.to_string(),
            nick: config.nick.clone(),
            events: self.events.clone(),
        }))
    }
}

struct LoopbackConnection {
    server_id: String,
    nick: String,
    events: UnboundedSender<ConnectionEvent>,
}

impl Connection for LoopbackConnection {
    fn send(&mut self, target: &str, text: &str) -> Result<()> {
        self.events
            .send(ConnectionEvent::new(
                self.server_id.as_str(),
                target,
                format!("<{}> {text}", self.nick),
            ))
            .map_err(|_| anyhow!("loopback channel for {} closed", self.server_id))
    }
}

#[cfg(test)]
#[path = "tests/loopback_tests.rs"]
mod tests;
