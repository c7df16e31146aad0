//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoint
//! - Query chain state (block heights, transactions, accounts)
//! - Handle timeouts and network errors gracefully
//! - Provide health check for blockchain connectivity

use alloy::eips::BlockNumberOrTag;
use alloy::primitives::{Address, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::chain::ChainClient;
use crate::blockchain::types::{
    BlockTag, BlockchainConfig, BlockchainError, BlockchainResult, ChainId, TxStatus,
};
use crate::observability::metrics;

type DynProvider = Arc<dyn Provider + Send + Sync>;

/// Blockchain RPC client wrapper with failover support.
#[derive(Clone)]
pub struct BlockchainClient {
    /// List of providers (primary + failovers).
    providers: Vec<DynProvider>,
    /// Configuration.
    config: BlockchainConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// # Arguments
    /// * `config` - Blockchain configuration
    ///
    /// # Returns
    /// A new client, or an error if the primary RPC URL is malformed.
    /// An unreachable node or a chain ID mismatch is only logged.
    pub async fn new(config: BlockchainConfig) -> BlockchainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push(Arc::new(ProviderBuilder::new().connect_http(primary_url)) as DynProvider);

        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(Arc::new(ProviderBuilder::new().connect_http(url)) as DynProvider);
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        let client = Self {
            providers,
            config: config.clone(),
            timeout_duration,
        };

        match client.verify_chain_id().await {
            Ok(()) => {
                tracing::info!(
                    rpc_url = %config.rpc_url,
                    chain_id = config.chain_id,
                    "Blockchain client initialized"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Blockchain client initialized but chain verification failed"
                );
            }
        }

        Ok(client)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        let mut timeouts = 0;
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_chain_id();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(ChainId(result)),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    timeouts += 1;
                    tracing::warn!(provider_idx = i, "RPC timeout, trying next provider");
                }
            }
        }
        Err(self.exhausted(timeouts, "All RPC providers failed"))
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        let mut timeouts = 0;
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_block_number();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => {
                    timeouts += 1;
                    tracing::warn!(provider_idx = i, "RPC timeout");
                }
            }
        }
        Err(self.exhausted(timeouts, "All providers failed to get block number"))
    }

    /// Get the number of the block a tag currently points at.
    pub async fn get_block_number_at(&self, tag: BlockTag) -> BlockchainResult<u64> {
        if tag == BlockTag::Latest {
            return self.get_block_number().await;
        }

        let mut timeouts = 0;
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_block_by_number(rpc_tag(tag));
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(Some(block))) => return Ok(block.header.number),
                Ok(Ok(None)) => tracing::warn!(provider_idx = i, tag = ?tag, "Block not found"),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => {
                    timeouts += 1;
                    tracing::warn!(provider_idx = i, "RPC timeout");
                }
            }
        }
        Err(self.exhausted(timeouts, &format!("All providers failed to get {:?} block", tag)))
    }

    /// Look up a transaction by hash.
    ///
    /// Returns `Ok(None)` when the node has never seen the hash.
    pub async fn get_transaction_status(&self, hash: &str) -> BlockchainResult<Option<TxStatus>> {
        let tx_hash: TxHash = hash
            .parse()
            .map_err(|_| BlockchainError::InvalidHash(hash.to_string()))?;

        let mut timeouts = 0;
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_transaction_by_hash(tx_hash);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(tx)) => {
                    return Ok(tx.map(|tx| TxStatus {
                        hash: hash.to_string(),
                        block_number: tx.block_number,
                    }))
                }
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => {
                    timeouts += 1;
                    tracing::warn!(provider_idx = i, "RPC timeout");
                }
            }
        }
        Err(self.exhausted(timeouts, "All providers failed to get transaction"))
    }

    /// Get the accounts managed by the node.
    pub async fn get_accounts(&self) -> BlockchainResult<Vec<Address>> {
        let mut timeouts = 0;
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_accounts();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => {
                    timeouts += 1;
                    tracing::warn!(provider_idx = i, "RPC timeout");
                }
            }
        }
        Err(self.exhausted(timeouts, "All providers failed to get accounts"))
    }

    /// Check if the blockchain is reachable and healthy.
    ///
    /// Returns true if we can query the block number.
    pub async fn is_healthy(&self) -> bool {
        let healthy = self.get_block_number().await.is_ok();
        metrics::record_rpc_health(healthy);
        healthy
    }

    /// Get the configuration.
    pub fn config(&self) -> &BlockchainConfig {
        &self.config
    }

    /// Error for a request no provider answered: `Timeout` when every
    /// provider timed out, `Rpc` otherwise.
    fn exhausted(&self, timeouts: usize, message: &str) -> BlockchainError {
        if timeouts == self.providers.len() {
            BlockchainError::Timeout(self.config.rpc_timeout_secs)
        } else {
            BlockchainError::Rpc(message.to_string())
        }
    }
}

fn rpc_tag(tag: BlockTag) -> BlockNumberOrTag {
    match tag {
        BlockTag::Latest => BlockNumberOrTag::Latest,
        BlockTag::Pending => BlockNumberOrTag::Pending,
        BlockTag::Safe => BlockNumberOrTag::Safe,
        BlockTag::Finalized => BlockNumberOrTag::Finalized,
    }
}

#[async_trait]
impl ChainClient for BlockchainClient {
    async fn transaction_status(&self, hash: &str) -> BlockchainResult<Option<TxStatus>> {
        self.get_transaction_status(hash).await
    }

    async fn block_number(&self, tag: BlockTag) -> BlockchainResult<u64> {
        self.get_block_number_at(tag).await
    }

    async fn accounts(&self) -> BlockchainResult<Vec<Address>> {
        self.get_accounts().await
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
