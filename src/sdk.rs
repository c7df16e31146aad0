//! SDK entry point: chain bootstrap, accounts, and transaction watching.

use alloy::primitives::Address;
use std::sync::Arc;

use crate::blockchain::{BlockchainClient, BlockchainError, BlockchainResult, ChainClient};
use crate::config::SdkConfig;
use crate::events::Emitter;
use crate::watcher::TxWatcher;

/// Event name published with the account list after it is (re)loaded.
pub const ACCOUNTS_UPDATED_EVENT: &str = "accountsUpdated";

/// Top-level handle applications hold on to.
///
/// Nothing talks to the chain until [`connect`](PxgSdk::connect) or
/// [`attach`](PxgSdk::attach) succeeds; until then every chain-dependent
/// call fails with [`BlockchainError::NotAvailable`].
pub struct PxgSdk {
    config: SdkConfig,
    client: Option<Arc<dyn ChainClient>>,
    watcher: Option<TxWatcher>,
    accounts: Vec<Address>,
    events: Emitter<Vec<Address>>,
}

impl PxgSdk {
    /// Create an SDK handle with no chain client attached.
    pub fn new(config: SdkConfig) -> Self {
        Self {
            config,
            client: None,
            watcher: None,
            accounts: Vec::new(),
            events: Emitter::new(),
        }
    }

    /// Connect to the configured JSON-RPC endpoint and attach to it.
    pub async fn connect(&mut self) -> BlockchainResult<()> {
        let client = BlockchainClient::new(self.config.blockchain.clone()).await?;
        self.attach(Arc::new(client)).await
    }

    /// Use an already constructed chain client.
    ///
    /// Creates the transaction watcher with the configured policy and loads
    /// the client's accounts, publishing [`ACCOUNTS_UPDATED_EVENT`].
    pub async fn attach(&mut self, client: Arc<dyn ChainClient>) -> BlockchainResult<()> {
        let watcher = TxWatcher::new(client.clone(), self.config.watcher.clone())?;
        let accounts = client.accounts().await?;

        tracing::info!(accounts = accounts.len(), "SDK connected");

        self.client = Some(client);
        self.watcher = Some(watcher);
        self.set_accounts(accounts);
        Ok(())
    }

    /// Reload accounts from the chain client.
    pub async fn refresh_accounts(&mut self) -> BlockchainResult<&[Address]> {
        let accounts = self.client()?.accounts().await?;
        self.set_accounts(accounts);
        Ok(&self.accounts)
    }

    /// Watch a submitted transaction until it is confirmed.
    pub fn watch(&self, hash: impl Into<String>) -> BlockchainResult<()> {
        self.watcher()?.watch(hash);
        Ok(())
    }

    /// The transaction watcher, once a chain client is attached.
    pub fn watcher(&self) -> BlockchainResult<&TxWatcher> {
        self.watcher
            .as_ref()
            .ok_or_else(|| BlockchainError::NotAvailable("chain client not connected".to_string()))
    }

    /// The attached chain client.
    pub fn client(&self) -> BlockchainResult<&Arc<dyn ChainClient>> {
        self.client
            .as_ref()
            .ok_or_else(|| BlockchainError::NotAvailable("chain client not connected".to_string()))
    }

    /// Accounts from the last load, empty before attach.
    pub fn accounts(&self) -> &[Address] {
        &self.accounts
    }

    /// The account used for signing, i.e. the first one reported.
    pub fn primary_account(&self) -> BlockchainResult<Address> {
        self.accounts
            .first()
            .copied()
            .ok_or_else(|| BlockchainError::NotAvailable("no account available".to_string()))
    }

    /// Whether a chain client is attached.
    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Emitter for [`ACCOUNTS_UPDATED_EVENT`].
    pub fn events(&self) -> &Emitter<Vec<Address>> {
        &self.events
    }

    /// Configuration this handle was built with.
    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    fn set_accounts(&mut self, accounts: Vec<Address>) {
        self.accounts = accounts;
        self.events.publish(ACCOUNTS_UPDATED_EVENT, &self.accounts);
    }
}

impl std::fmt::Debug for PxgSdk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PxgSdk")
            .field("enabled", &self.is_enabled())
            .field("accounts", &self.accounts)
            .field("watcher", &self.watcher)
            .finish()
    }
}
