use shared::error::{ErrorCode, ErrorReport};
use thiserror::Error;

/// Failures raised by orchestrator operations.
///
/// Every variant is recoverable; callers decide how to surface it.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("parent {parent} does not exist")]
    ParentNotFound { parent: String },
    #[error("buffer {parent}-{name} does not exist")]
    BufferNotFound { parent: String, name: String },
    #[error("no connection registered for {server_id}")]
    UnknownConnection { server_id: String },
    #[error("already connected to {server_id}")]
    AlreadyConnected { server_id: String },
    #[error("connection {server_id} failed: {source}")]
    Connection {
        server_id: String,
        source: anyhow::Error,
    },
    #[error("{0}")]
    Command(String),
}

impl CoreError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::ParentNotFound { .. } | Self::BufferNotFound { .. } => ErrorCode::NotFound,
            Self::UnknownConnection { .. } => ErrorCode::UnknownConnection,
            Self::AlreadyConnected { .. } => ErrorCode::AlreadyConnected,
            Self::Connection { .. } => ErrorCode::Connection,
            Self::Command(_) => ErrorCode::Command,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code() == ErrorCode::NotFound
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport::new(self.code(), self.to_string())
    }
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
