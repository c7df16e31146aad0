//! Transaction watcher subsystem.
//!
//! # Data Flow
//! ```text
//! TxWatcher::watch(hash)
//!     → pending list + "pending" event
//!     → poll.rs loop (every poll_interval_ms)
//!         → ChainClient::transaction_status (one per pending hash)
//!         → ChainClient::block_number(Latest) (one per landed hash)
//!     → completed list + "completed" event
//!     → loop exits once nothing is pending
//! ```

pub mod poll;
pub mod types;

pub use poll::TxWatcher;
pub use types::{TxEvent, COMPLETED_EVENT, PENDING_EVENT};
