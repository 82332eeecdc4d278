use std::fmt;

use serde::{Deserialize, Serialize};

/// Parent scope used when a buffer is addressed without a parent.
pub const DEFAULT_PARENT: &str = "default";

/// Name of the console buffer created for every connection.
pub const SERVER_BUFFER: &str = "server";

/// Maps an empty parent onto the default scope.
pub fn normalize_parent(parent: &str) -> &str {
    if parent.is_empty() {
        DEFAULT_PARENT
    } else {
        parent
    }
}

/// Identity of a buffer: the parent scope it lives under and its name within that scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BufferRef {
    #[serde(default)]
    pub parent: String,
    pub name: String,
}

impl BufferRef {
    pub fn new(parent: impl Into<String>, name: impl Into<String>) -> Self {
        let parent = parent.into();
        Self {
            parent: normalize_parent(&parent).to_string(),
            name: name.into(),
        }
    }

    pub fn in_default_scope(name: impl Into<String>) -> Self {
        Self::new(DEFAULT_PARENT, name)
    }

    pub fn server(server_id: impl Into<String>) -> Self {
        Self::new(server_id, SERVER_BUFFER)
    }

    /// Same buffer with an empty parent replaced by the default scope.
    pub fn normalized(self) -> Self {
        if self.parent.is_empty() {
            Self {
                parent: DEFAULT_PARENT.to_string(),
                name: self.name,
            }
        } else {
            self
        }
    }
}

impl fmt::Display for BufferRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.parent, self.name)
    }
}
