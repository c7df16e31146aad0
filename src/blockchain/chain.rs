//! The chain-access seam used by the transaction watcher and the SDK.

use alloy::primitives::Address;
use async_trait::async_trait;

use crate::blockchain::types::{BlockTag, BlockchainResult, TxStatus};

/// Read-only chain queries the watcher depends on.
///
/// Implementations must tolerate many concurrent calls; the watcher issues
/// one status lookup per pending transaction and one head lookup per landed
/// transaction in every poll cycle.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Current status of a transaction, `None` if the node does not know it.
    async fn transaction_status(&self, hash: &str) -> BlockchainResult<Option<TxStatus>>;

    /// Height of a named reference point, usually the chain head.
    async fn block_number(&self, tag: BlockTag) -> BlockchainResult<u64>;

    /// Accounts exposed by the connected node or wallet.
    async fn accounts(&self) -> BlockchainResult<Vec<Address>> {
        Ok(Vec::new())
    }
}
