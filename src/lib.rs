//! PXG client SDK.
//!
//! Chain bootstrap, an event emitter, and a transaction watcher that polls
//! pending transactions until they are confirmed.

pub mod blockchain;
pub mod config;
pub mod events;
pub mod observability;
pub mod sdk;
pub mod watcher;

pub use blockchain::{BlockchainClient, BlockchainError, ChainClient};
pub use config::SdkConfig;
pub use events::Emitter;
pub use sdk::PxgSdk;
pub use watcher::{TxEvent, TxWatcher};
