//! Shared utilities for integration tests.
#![allow(dead_code)]

use alloy::primitives::Address;
use async_trait::async_trait;
use pxg_sdk::blockchain::{BlockTag, BlockchainError, BlockchainResult, ChainClient, TxStatus};
use pxg_sdk::watcher::{TxEvent, TxWatcher};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

/// In-memory chain whose answers are set by the test.
///
/// Every hash is reported as known-but-not-landed until `land` is called.
#[derive(Default)]
pub struct ScriptedChain {
    landed: Mutex<HashMap<String, u64>>,
    failing: Mutex<HashSet<String>>,
    head: AtomicU64,
    head_fails: AtomicBool,
    status_latency_ms: AtomicU64,
    status_calls: AtomicUsize,
    head_calls: AtomicUsize,
    accounts: Vec<Address>,
}

impl ScriptedChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accounts(accounts: Vec<Address>) -> Self {
        Self {
            accounts,
            ..Self::default()
        }
    }

    pub fn land(&self, hash: &str, block: u64) {
        self.landed.lock().unwrap().insert(hash.to_string(), block);
    }

    pub fn set_head(&self, block: u64) {
        self.head.store(block, Ordering::SeqCst);
    }

    pub fn fail_status(&self, hash: &str, fail: bool) {
        let mut failing = self.failing.lock().unwrap();
        if fail {
            failing.insert(hash.to_string());
        } else {
            failing.remove(hash);
        }
    }

    pub fn fail_head(&self, fail: bool) {
        self.head_fails.store(fail, Ordering::SeqCst);
    }

    /// Make every status lookup take `latency` before answering.
    pub fn set_status_latency(&self, latency: Duration) {
        self.status_latency_ms.store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn head_calls(&self) -> usize {
        self.head_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainClient for ScriptedChain {
    async fn transaction_status(&self, hash: &str) -> BlockchainResult<Option<TxStatus>> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let latency = self.status_latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        if self.failing.lock().unwrap().contains(hash) {
            return Err(BlockchainError::Rpc("injected status failure".to_string()));
        }
        let block_number = self.landed.lock().unwrap().get(hash).copied();
        Ok(Some(TxStatus {
            hash: hash.to_string(),
            block_number,
        }))
    }

    async fn block_number(&self, _tag: BlockTag) -> BlockchainResult<u64> {
        self.head_calls.fetch_add(1, Ordering::SeqCst);
        if self.head_fails.load(Ordering::SeqCst) {
            return Err(BlockchainError::Rpc("injected head failure".to_string()));
        }
        Ok(self.head.load(Ordering::SeqCst))
    }

    async fn accounts(&self) -> BlockchainResult<Vec<Address>> {
        Ok(self.accounts.clone())
    }
}

/// Forward every `name` event from the watcher into a channel.
pub fn collect(watcher: &TxWatcher, name: &str) -> mpsc::UnboundedReceiver<TxEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    watcher.events().subscribe(name, move |event: &TxEvent| {
        let _ = tx.send(event.clone());
    });
    rx
}

/// Wait for the next event, failing the test after `within`.
pub async fn next_event(rx: &mut mpsc::UnboundedReceiver<TxEvent>, within: Duration) -> TxEvent {
    tokio::time::timeout(within, rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}
