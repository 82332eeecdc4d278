//! Routes user input to commands or connections and buffer activity to the display.

use std::sync::Arc;

use shared::{
    domain::{normalize_parent, BufferRef, SERVER_BUFFER},
    protocol::{DisplayEvent, TimestampedMessage, UiEvent},
};
use tracing::{debug, info, warn};

use crate::{
    buffers::{BufferRegistry, NewBuffer},
    commands::{BuiltinCommands, SlashCommandPredicate},
    connections::{ConnectOptions, ConnectionRegistry},
    error::{CoreError, CoreResult},
    runtime::ConnectionEvent,
    Clock, CommandHandler, CommandPredicate, Connector, DisplaySink, SystemClock,
};

/// Owns the buffer and connection registries for one session.
pub struct Orchestrator {
    buffers: BufferRegistry,
    connections: ConnectionRegistry,
    display: Arc<dyn DisplaySink>,
    connector: Arc<dyn Connector>,
    commands: Arc<dyn CommandHandler>,
    command_predicate: Arc<dyn CommandPredicate>,
    clock: Arc<dyn Clock>,
}

impl Orchestrator {
    pub fn new(display: Arc<dyn DisplaySink>, connector: Arc<dyn Connector>) -> Self {
        Self::new_with_dependencies(
            display,
            connector,
            Arc::new(BuiltinCommands::default()),
            Arc::new(SlashCommandPredicate),
            Arc::new(SystemClock),
        )
    }

    pub fn new_with_dependencies(
        display: Arc<dyn DisplaySink>,
        connector: Arc<dyn Connector>,
        commands: Arc<dyn CommandHandler>,
        command_predicate: Arc<dyn CommandPredicate>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            buffers: BufferRegistry::new(),
            connections: ConnectionRegistry::new(),
            display,
            connector,
            commands,
            command_predicate,
            clock,
        }
    }

    pub fn buffers(&self) -> &BufferRegistry {
        &self.buffers
    }

    pub fn connections(&self) -> &ConnectionRegistry {
        &self.connections
    }

    pub fn buffer_exists(&self, buffer: &BufferRef) -> bool {
        self.buffers.exists(&buffer.parent, &buffer.name)
    }

    /// Creates the server buffer, then opens and registers the connection.
    ///
    /// An empty `server_id` means the default scope, matching how buffers address it.
    pub fn connect(&mut self, server_id: &str, options: &ConnectOptions) -> CoreResult<()> {
        let server_id = normalize_parent(server_id);
        if self.connections.contains(server_id) {
            return Err(CoreError::AlreadyConnected {
                server_id: server_id.to_string(),
            });
        }
        let config = options.apply_defaults();

        self.create_buffer(
            NewBuffer::new(server_id, SERVER_BUFFER)
                .display_name(SERVER_BUFFER)
                .focus(true),
        );

        let connector = Arc::clone(&self.connector);
        let connection = connector
            .open(self, server_id, &config)
            .map_err(|source| CoreError::Connection {
                server_id: server_id.to_string(),
                source,
            })?;
        info!(server_id, nick = %config.nick, "connection opened");
        self.connections.register(server_id, config, connection)
    }

    /// Routes one line of user input typed into `buffer`.
    pub fn dispatch_input(&mut self, buffer: &BufferRef, raw: &str) -> CoreResult<()> {
        let buffer = buffer.clone().normalized();
        if self.command_predicate.is_command(raw) {
            debug!(parent = %buffer.parent, "dispatching command");
            let commands = Arc::clone(&self.commands);
            return commands.handle(self, &buffer.parent, raw);
        }
        self.send_to(&buffer.parent, &buffer.name, raw)
    }

    /// Sends `text` to `target` through the connection registered for `server_id`.
    pub fn send_to(&mut self, server_id: &str, target: &str, text: &str) -> CoreResult<()> {
        let server_id = normalize_parent(server_id);
        self.connections
            .lookup_mut(server_id)?
            .send(target, text)
            .map_err(|source| CoreError::Connection {
                server_id: server_id.to_string(),
                source,
            })
    }

    /// Returns `false` if the buffer already existed, in which case nothing is emitted.
    pub fn create_buffer(&mut self, buffer: NewBuffer) -> bool {
        let created = buffer.resolve();
        if !self.buffers.create(&created.parent, &created.name) {
            return false;
        }
        debug!(parent = %created.parent, name = %created.name, "buffer created");
        self.display.emit(DisplayEvent::BufferCreated(created));
        true
    }

    pub fn delete_buffer(&mut self, buffer: &BufferRef) -> CoreResult<()> {
        let buffer = buffer.clone().normalized();
        self.buffers.delete(&buffer.parent, &buffer.name)?;
        debug!(parent = %buffer.parent, name = %buffer.name, "buffer deleted");
        self.display.emit(DisplayEvent::BufferDeleted(buffer));
        Ok(())
    }

    /// Delivers `message` to an existing buffer, stamped with `timestamp` or the current time.
    pub fn write_to_buffer(
        &mut self,
        buffer: &BufferRef,
        message: impl Into<String>,
        timestamp: Option<i64>,
    ) -> CoreResult<()> {
        let buffer = buffer.clone().normalized();
        self.buffers.require(&buffer.parent, &buffer.name)?;
        let timestamp = timestamp.unwrap_or_else(|| self.clock.now_ms());
        self.display.emit(DisplayEvent::MessageReceived {
            buffer,
            message: TimestampedMessage {
                timestamp,
                message: message.into(),
            },
        });
        Ok(())
    }

    pub fn handle_event(&mut self, event: UiEvent) -> CoreResult<()> {
        match event {
            UiEvent::SendMessage { buffer, message } => self.dispatch_input(&buffer, &message),
        }
    }

    /// Writes traffic from a live connection, opening the target buffer on first contact.
    pub fn deliver(&mut self, event: ConnectionEvent) -> CoreResult<()> {
        let target = NewBuffer::new(event.server_id, event.target);
        let buffer = target.buffer_ref();
        self.create_buffer(target);
        self.write_to_buffer(&buffer, event.message, event.timestamp)
    }

    /// Shows a failure to the user.
    pub fn report(&self, err: &CoreError) {
        warn!(error = %err, code = ?err.code(), "operation failed");
        self.display.emit(DisplayEvent::Error(err.report()));
    }
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
