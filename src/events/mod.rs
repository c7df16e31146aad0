//! Event emission shared by the watcher and the SDK facade.

pub mod emitter;

pub use emitter::{Callback, Emitter, SubscriptionId};
