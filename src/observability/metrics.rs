//! Metrics collection.
//!
//! # Responsibilities
//! - Define watcher and RPC metrics
//! - Record through the `metrics` facade; the host application installs
//!   whichever recorder/exporter it wants
//!
//! # Metrics
//! - `pxg_tx_watched_total` (counter): identifiers passed to `watch`
//! - `pxg_tx_completed_total` (counter): identifiers moved to completed
//! - `pxg_tx_fetch_errors_total` (counter): failed lookups by kind
//! - `pxg_tx_pending` (gauge): current pending count
//! - `pxg_rpc_health` (gauge): 1=healthy, 0=unhealthy

use metrics::{counter, gauge};

pub fn record_tx_watched() {
    counter!("pxg_tx_watched_total").increment(1);
}

pub fn record_tx_completed() {
    counter!("pxg_tx_completed_total").increment(1);
}

/// `kind` is `"status"` or `"head"`.
pub fn record_fetch_error(kind: &'static str) {
    counter!("pxg_tx_fetch_errors_total", "kind" => kind).increment(1);
}

pub fn record_pending(count: usize) {
    gauge!("pxg_tx_pending").set(count as f64);
}

pub fn record_rpc_health(healthy: bool) {
    gauge!("pxg_rpc_health").set(if healthy { 1.0 } else { 0.0 });
}
