//! Fixed-interval transaction confirmation polling.

use futures_util::future::join_all;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::time::sleep;

use crate::blockchain::chain::ChainClient;
use crate::blockchain::types::{BlockTag, BlockchainError, BlockchainResult, TxStatus};
use crate::config::WatcherConfig;
use crate::events::Emitter;
use crate::observability::metrics;
use crate::watcher::types::{TxEvent, COMPLETED_EVENT, PENDING_EVENT};

#[derive(Debug, Default)]
struct WatchState {
    pending: Vec<String>,
    completed: Vec<String>,
    watching: bool,
}

struct Inner {
    client: Arc<dyn ChainClient>,
    config: WatcherConfig,
    runtime: Handle,
    state: Mutex<WatchState>,
    events: Emitter<TxEvent>,
}

/// Watches submitted transactions until they are confirmed.
///
/// `watch` queues a hash and publishes [`PENDING_EVENT`]. A background task
/// then polls every `poll_interval_ms`; once a transaction has landed and the
/// head is at least `min_confirmations` blocks past it, the hash moves to the
/// completed list and [`COMPLETED_EVENT`] is published. The task exits when
/// nothing is pending and is restarted by the next `watch`.
///
/// Cloning is cheap; clones share the same state.
#[derive(Clone)]
pub struct TxWatcher {
    inner: Arc<Inner>,
}

impl TxWatcher {
    /// Create a watcher that polls through `client`.
    ///
    /// Must be called from within a Tokio runtime; the poll task is spawned
    /// onto that runtime.
    pub fn new(client: Arc<dyn ChainClient>, config: WatcherConfig) -> BlockchainResult<Self> {
        let runtime = Handle::try_current().map_err(|_| {
            BlockchainError::NotAvailable(
                "transaction watcher requires a Tokio runtime".to_string(),
            )
        })?;

        Ok(Self {
            inner: Arc::new(Inner {
                client,
                config,
                runtime,
                state: Mutex::new(WatchState::default()),
                events: Emitter::new(),
            }),
        })
    }

    /// Start watching a transaction.
    ///
    /// The pending event is published before this returns, and before the
    /// poll task is spawned, so a `completed` never precedes its `pending`.
    /// The task is spawned even if a pending handler panics. Watching the
    /// same hash twice keeps two pending entries; both are cleared by a
    /// single completion.
    pub fn watch(&self, hash: impl Into<String>) {
        let hash = hash.into();
        let (pending, start) = {
            let mut state = self.inner.state.lock().expect("watcher state mutex poisoned");
            state.pending.push(hash.clone());
            let start = !state.watching;
            state.watching = true;
            (state.pending.clone(), start)
        };

        metrics::record_tx_watched();
        metrics::record_pending(pending.len());
        tracing::debug!(tx_hash = %hash, pending = pending.len(), "Watching transaction");

        let _starter = start.then(|| PollStarter(Some(self.inner.clone())));
        self.inner.events.publish(PENDING_EVENT, &TxEvent { hash, pending });
    }

    /// Transactions still waiting for confirmation, in watch order.
    pub fn pending(&self) -> Vec<String> {
        self.inner.state.lock().expect("watcher state mutex poisoned").pending.clone()
    }

    /// Confirmed transactions, in completion order.
    pub fn completed(&self) -> Vec<String> {
        self.inner.state.lock().expect("watcher state mutex poisoned").completed.clone()
    }

    /// Whether the poll task is currently scheduled.
    pub fn is_watching(&self) -> bool {
        self.inner.state.lock().expect("watcher state mutex poisoned").watching
    }

    /// Emitter for [`PENDING_EVENT`] and [`COMPLETED_EVENT`].
    pub fn events(&self) -> &Emitter<TxEvent> {
        &self.inner.events
    }

    /// Poll interval and confirmation policy in use.
    pub fn config(&self) -> &WatcherConfig {
        &self.inner.config
    }
}

impl std::fmt::Debug for TxWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock().expect("watcher state mutex poisoned");
        f.debug_struct("TxWatcher")
            .field("pending", &state.pending)
            .field("completed", &state.completed)
            .field("watching", &state.watching)
            .finish()
    }
}

/// Spawns the poll task when dropped, including during unwinding, so the
/// watching flag set by `watch` always has a task behind it.
struct PollStarter(Option<Arc<Inner>>);

impl Drop for PollStarter {
    fn drop(&mut self) {
        if let Some(inner) = self.0.take() {
            let runtime = inner.runtime.clone();
            runtime.spawn(run(inner));
        }
    }
}

async fn run(inner: Arc<Inner>) {
    let interval = Duration::from_millis(inner.config.poll_interval_ms);
    tracing::debug!(interval_ms = inner.config.poll_interval_ms, "Transaction poll loop started");

    loop {
        inner.poll_cycle().await;

        if !inner.keep_watching() {
            break;
        }
        sleep(interval).await;
    }

    tracing::debug!("Transaction poll loop idle");
}

impl Inner {
    /// One pass over the pending set.
    async fn poll_cycle(&self) {
        let hashes = self.distinct_pending();
        if hashes.is_empty() {
            return;
        }

        let statuses =
            join_all(hashes.iter().map(|hash| self.client.transaction_status(hash))).await;

        let mut landed = Vec::new();
        for (hash, status) in hashes.iter().zip(statuses) {
            match status {
                Ok(Some(TxStatus {
                    block_number: Some(block),
                    ..
                })) => landed.push((hash.as_str(), block)),
                Ok(_) => tracing::trace!(tx_hash = %hash, "Transaction not landed yet"),
                Err(e) => {
                    metrics::record_fetch_error("status");
                    tracing::warn!(
                        tx_hash = %hash,
                        error = %e,
                        "Failed to fetch transaction status"
                    );
                }
            }
        }

        if landed.is_empty() {
            return;
        }

        // One head lookup per landed transaction, as each is judged on its own.
        let heads =
            join_all(landed.iter().map(|_| self.client.block_number(BlockTag::Latest))).await;

        for ((hash, block), head) in landed.into_iter().zip(heads) {
            match head {
                Ok(head) if self.is_confirmed(block, head) => self.complete(hash),
                Ok(head) => tracing::debug!(
                    tx_hash = %hash,
                    block,
                    head,
                    required = self.config.min_confirmations,
                    "Waiting for confirmations"
                ),
                Err(e) => {
                    metrics::record_fetch_error("head");
                    tracing::warn!(tx_hash = %hash, error = %e, "Failed to fetch chain head");
                }
            }
        }
    }

    fn is_confirmed(&self, block: u64, head: u64) -> bool {
        head.checked_sub(block)
            .is_some_and(|depth| depth >= self.config.min_confirmations)
    }

    fn complete(&self, hash: &str) {
        let pending = {
            let mut state = self.state.lock().expect("watcher state mutex poisoned");
            if !state.pending.iter().any(|p| p == hash) {
                return;
            }
            state.pending.retain(|p| p != hash);
            state.completed.push(hash.to_string());
            state.pending.clone()
        };

        metrics::record_tx_completed();
        metrics::record_pending(pending.len());
        tracing::info!(tx_hash = %hash, remaining = pending.len(), "Transaction completed");

        self.events.publish(
            COMPLETED_EVENT,
            &TxEvent {
                hash: hash.to_string(),
                pending,
            },
        );
    }

    /// Clears the watching flag when nothing is left. Shares the lock with
    /// `watch`, so a hash queued after this check starts a fresh task.
    fn keep_watching(&self) -> bool {
        let mut state = self.state.lock().expect("watcher state mutex poisoned");
        if state.pending.is_empty() {
            state.watching = false;
            false
        } else {
            true
        }
    }

    fn distinct_pending(&self) -> Vec<String> {
        let state = self.state.lock().expect("watcher state mutex poisoned");
        let mut seen = HashSet::new();
        state
            .pending
            .iter()
            .filter(|hash| seen.insert(hash.as_str()))
            .cloned()
            .collect()
    }
}
