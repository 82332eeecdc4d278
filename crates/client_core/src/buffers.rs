//! In-memory index of buffers grouped by parent scope.

use std::collections::HashMap;

use shared::{
    domain::{normalize_parent, BufferRef},
    protocol::BufferCreated,
};

use crate::error::{CoreError, CoreResult};

/// Arguments for creating a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBuffer {
    pub parent: String,
    pub name: String,
    pub display_name: Option<String>,
    pub switch: bool,
}

impl NewBuffer {
    pub fn new(parent: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            name: name.into(),
            display_name: None,
            switch: false,
        }
    }

    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn focus(mut self, switch: bool) -> Self {
        self.switch = switch;
        self
    }

    pub fn buffer_ref(&self) -> BufferRef {
        BufferRef::new(self.parent.as_str(), self.name.as_str())
    }

    /// The creation record as the display receives it, with defaults filled in.
    pub fn resolve(&self) -> BufferCreated {
        BufferCreated {
            parent: normalize_parent(&self.parent).to_string(),
            name: self.name.clone(),
            display_name: self
                .display_name
                .clone()
                .filter(|display_name| !display_name.is_empty())
                .unwrap_or_else(|| self.name.clone()),
            switch: self.switch,
        }
    }
}

/// Buffer names per parent, kept in creation order.
///
/// A parent entry exists only while it holds at least one buffer.
#[derive(Debug, Default)]
pub struct BufferRegistry {
    parents: HashMap<String, Vec<String>>,
}

impl BufferRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exists(&self, parent: &str, name: &str) -> bool {
        self.parents
            .get(normalize_parent(parent))
            .is_some_and(|names| names.iter().any(|existing| existing == name))
    }

    /// Appends `name` under `parent`.
    ///
    /// Returns `false` without touching state if it is already there.
    pub fn create(&mut self, parent: &str, name: &str) -> bool {
        let names = self
            .parents
            .entry(normalize_parent(parent).to_string())
            .or_default();
        if names.iter().any(|existing| existing == name) {
            return false;
        }
        names.push(name.to_string());
        true
    }

    pub fn delete(&mut self, parent: &str, name: &str) -> CoreResult<()> {
        let parent = normalize_parent(parent);
        let names = self
            .parents
            .get_mut(parent)
            .ok_or_else(|| CoreError::ParentNotFound {
                parent: parent.to_string(),
            })?;
        let index = names
            .iter()
            .position(|existing| existing == name)
            .ok_or_else(|| CoreError::BufferNotFound {
                parent: parent.to_string(),
                name: name.to_string(),
            })?;

        // `remove` rather than `swap_remove`: the order is the display order.
        names.remove(index);
        if names.is_empty() {
            self.parents.remove(parent);
        }
        Ok(())
    }

    /// Fails with `BufferNotFound` unless the buffer exists.
    pub fn require(&self, parent: &str, name: &str) -> CoreResult<()> {
        if self.exists(parent, name) {
            Ok(())
        } else {
            Err(CoreError::BufferNotFound {
                parent: normalize_parent(parent).to_string(),
                name: name.to_string(),
            })
        }
    }

    /// Buffer names under `parent` in creation order; empty if the parent is unknown.
    pub fn buffers(&self, parent: &str) -> &[String] {
        self.parents
            .get(normalize_parent(parent))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains_parent(&self, parent: &str) -> bool {
        self.parents.contains_key(normalize_parent(parent))
    }

    /// Known parents, sorted.
    pub fn parents(&self) -> Vec<&str> {
        let mut parents: Vec<&str> = self.parents.keys().map(String::as_str).collect();
        parents.sort_unstable();
        parents
    }

    /// Total number of buffers across all parents.
    pub fn len(&self) -> usize {
        self.parents.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/buffers_tests.rs"]
mod tests;
