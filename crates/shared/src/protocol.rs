use serde::{Deserialize, Serialize};

use crate::{domain::BufferRef, error::ErrorReport};

/// Events sent by the display surface to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum UiEvent {
    #[serde(rename = "message:send")]
    SendMessage { buffer: BufferRef, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferCreated {
    pub parent: String,
    pub name: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    /// Whether the display should focus the buffer once created.
    pub switch: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampedMessage {
    /// Milliseconds since the unix epoch.
    pub timestamp: i64,
    pub message: String,
}

/// Events sent by the orchestrator to the display surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum DisplayEvent {
    #[serde(rename = "buffer:create")]
    BufferCreated(BufferCreated),
    #[serde(rename = "buffer:delete")]
    BufferDeleted(BufferRef),
    #[serde(rename = "message:received")]
    MessageReceived {
        buffer: BufferRef,
        message: TimestampedMessage,
    },
    #[serde(rename = "error")]
    Error(ErrorReport),
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
