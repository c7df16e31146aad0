//! Transaction watcher event types.

use serde::{Deserialize, Serialize};

/// Event name published when a transaction starts being watched.
pub const PENDING_EVENT: &str = "pending";

/// Event name published when a transaction is confirmed.
pub const COMPLETED_EVENT: &str = "completed";

/// Payload of both watcher events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxEvent {
    /// The transaction the event is about.
    pub hash: String,
    /// Pending transactions right after the change.
    pub pending: Vec<String>,
}
