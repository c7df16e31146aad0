//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! watcher / blockchain client produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges)
//! ```
//!
//! # Design Decisions
//! - Structured logging via `tracing`; the library never forces a subscriber
//! - Metrics go through the `metrics` facade and are no-ops without a recorder

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
