//! Types shared between the orchestrator core and the display-facing binaries.

pub mod domain;
pub mod error;
pub mod protocol;
