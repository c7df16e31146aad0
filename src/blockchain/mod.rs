//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! BlockchainConfig (RPC URL, failovers, timeout)
//!     → client.rs (RPC connection with timeouts and failover)
//!     → chain.rs (ChainClient seam consumed by the watcher)
//! ```
//!
//! # Constraints
//! - All RPC calls have configurable timeouts
//! - Graceful degradation when blockchain unreachable

pub mod chain;
pub mod client;
pub mod types;

pub use chain::ChainClient;
pub use client::BlockchainClient;
pub use types::{BlockTag, BlockchainConfig, BlockchainError, BlockchainResult, ChainId, TxStatus};
