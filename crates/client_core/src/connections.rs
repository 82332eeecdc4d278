//! Live connections keyed by server label, together with the configuration they were opened with.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{
    error::{CoreError, CoreResult},
    Connection,
};

pub const DEFAULT_NICK: &str = "Communique";
pub const DEFAULT_USERNAME: &str = "communique";
pub const DEFAULT_REALNAME: &str = "Communique User";

/// Caller-supplied connection options. Missing or empty identity fields fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realname: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ConnectOptions {
    pub fn with_nick(mut self, nick: impl Into<String>) -> Self {
        self.nick = Some(nick.into());
        self
    }

    pub fn apply_defaults(&self) -> ConnectionConfig {
        ConnectionConfig {
            nick: or_default(&self.nick, DEFAULT_NICK),
            username: or_default(&self.username, DEFAULT_USERNAME),
            realname: or_default(&self.realname, DEFAULT_REALNAME),
            extra: self.extra.clone(),
        }
    }
}

fn or_default(value: &Option<String>, default: &str) -> String {
    match value.as_deref() {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => default.to_string(),
    }
}

/// Fully resolved configuration a connection is opened with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub nick: String,
    pub username: String,
    pub realname: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        ConnectOptions::default().apply_defaults()
    }
}

struct ConnectionEntry {
    config: ConnectionConfig,
    connection: Box<dyn Connection>,
}

#[derive(Default)]
pub struct ConnectionRegistry {
    entries: HashMap<String, ConnectionEntry>,
    order: Vec<String>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        server_id: impl Into<String>,
        config: ConnectionConfig,
        connection: Box<dyn Connection>,
    ) -> CoreResult<()> {
        let server_id = server_id.into();
        if self.entries.contains_key(&server_id) {
            return Err(CoreError::AlreadyConnected { server_id });
        }
        self.order.push(server_id.clone());
        self.entries
            .insert(server_id, ConnectionEntry { config, connection });
        Ok(())
    }

    pub fn contains(&self, server_id: &str) -> bool {
        self.entries.contains_key(server_id)
    }

    pub fn lookup(&self, server_id: &str) -> CoreResult<&dyn Connection> {
        self.entry(server_id).map(|entry| entry.connection.as_ref())
    }

    pub fn lookup_mut(&mut self, server_id: &str) -> CoreResult<&mut dyn Connection> {
        match self.entries.get_mut(server_id) {
            Some(entry) => Ok(entry.connection.as_mut()),
            None => Err(unknown(server_id)),
        }
    }

    pub fn config(&self, server_id: &str) -> CoreResult<&ConnectionConfig> {
        self.entry(server_id).map(|entry| &entry.config)
    }

    /// Registered server labels in connection order.
    pub fn servers(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, server_id: &str) -> CoreResult<&ConnectionEntry> {
        self.entries.get(server_id).ok_or_else(|| unknown(server_id))
    }
}

fn unknown(server_id: &str) -> CoreError {
    CoreError::UnknownConnection {
        server_id: server_id.to_string(),
    }
}

#[cfg(test)]
#[path = "tests/connections_tests.rs"]
mod tests;
