//! Chain-specific types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export BlockchainConfig from config module to avoid duplication
pub use crate::config::schema::BlockchainConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Named reference point on the chain whose height can be queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockTag {
    /// The current chain head.
    #[default]
    Latest,
    /// The block currently being built by the node.
    Pending,
    /// Latest block considered safe from reorgs.
    Safe,
    /// Latest finalized block.
    Finalized,
}

/// Status of a transaction as reported by the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxStatus {
    /// The transaction hash that was queried.
    pub hash: String,
    /// Block of inclusion, `None` while the transaction is still in the mempool.
    pub block_number: Option<u64>,
}

impl TxStatus {
    /// A transaction the node knows about but has not included yet.
    pub fn pending(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            block_number: None,
        }
    }

    /// A transaction included at `block_number`.
    pub fn landed(hash: impl Into<String>, block_number: u64) -> Self {
        Self {
            hash: hash.into(),
            block_number: Some(block_number),
        }
    }

    /// Whether the transaction has been included in a block.
    pub fn is_landed(&self) -> bool {
        self.block_number.is_some()
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Every provider timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The identifier is not a well-formed transaction hash.
    #[error("Invalid transaction hash '{0}'")]
    InvalidHash(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// A required dependency (chain client, account, runtime) is missing.
    #[error("Blockchain not available: {0}")]
    NotAvailable(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_conversion() {
        let chain_id = ChainId::from(1u64);
        assert_eq!(chain_id.0, 1);
        assert_eq!(u64::from(chain_id), 1);
    }

    #[test]
    fn test_tx_status() {
        assert!(!TxStatus::pending("0xabc").is_landed());

        let landed = TxStatus::landed("0xabc", 100);
        assert!(landed.is_landed());
        assert_eq!(landed.block_number, Some(100));
    }

    #[test]
    fn test_block_tag_serde() {
        let tag: BlockTag = serde_json::from_str("\"finalized\"").unwrap();
        assert_eq!(tag, BlockTag::Finalized);
        assert_eq!(BlockTag::default(), BlockTag::Latest);
    }

    #[test]
    fn test_error_display() {
        let err = BlockchainError::InvalidHash("0x12".to_string());
        assert_eq!(err.to_string(), "Invalid transaction hash '0x12'");

        let err = BlockchainError::ChainMismatch {
            expected: 1,
            actual: 5,
        };
        assert!(err.to_string().contains("expected 1, got 5"));

        let err = BlockchainError::Timeout(10);
        assert_eq!(err.to_string(), "RPC timeout after 10 seconds");
    }
}
