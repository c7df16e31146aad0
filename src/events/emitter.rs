//! Named-event publish/subscribe registry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Handle returned by a registration, usable with [`Emitter::unsubscribe`].
pub type SubscriptionId = u64;

/// A registered event handler.
pub type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// How long a registration stays in the registry.
enum Subscription<T> {
    /// Invoked on every publish until unsubscribed.
    Persistent(Callback<T>),
    /// Removed from the registry by the first publish that reaches it.
    Once(Callback<T>),
}

impl<T> Subscription<T> {
    fn callback(&self) -> &Callback<T> {
        match self {
            Subscription::Persistent(cb) | Subscription::Once(cb) => cb,
        }
    }

    fn is_once(&self) -> bool {
        matches!(self, Subscription::Once(_))
    }
}

struct Entry<T> {
    id: SubscriptionId,
    subscription: Subscription<T>,
}

/// Synchronous event emitter keyed by event name.
///
/// Handlers for a name run in registration order. Publishing to a name with
/// no handlers does nothing. The registry lock is released before handlers
/// run, so a handler may subscribe or publish again; a panicking handler
/// unwinds into the caller of [`publish`](Emitter::publish).
pub struct Emitter<T> {
    registry: Mutex<HashMap<String, Vec<Entry<T>>>>,
    next_id: AtomicU64,
}

impl<T> Emitter<T> {
    pub fn new() -> Self {
        Self {
            registry: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a handler that runs on every publish of `name`.
    pub fn subscribe<F>(&self, name: &str, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.register(name, Subscription::Persistent(Arc::new(callback)))
    }

    /// Register a handler that runs on the next publish of `name` only.
    pub fn subscribe_once<F>(&self, name: &str, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.register(name, Subscription::Once(Arc::new(callback)))
    }

    /// Remove a registration. Returns `false` if it was not found.
    pub fn unsubscribe(&self, name: &str, id: SubscriptionId) -> bool {
        let mut registry = self.registry.lock().expect("emitter registry mutex poisoned");
        let Some(entries) = registry.get_mut(name) else {
            return false;
        };

        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        let removed = entries.len() != before;

        if entries.is_empty() {
            registry.remove(name);
        }
        removed
    }

    /// Invoke every handler currently registered for `name`.
    pub fn publish(&self, name: &str, payload: &T) {
        let callbacks: Vec<Callback<T>> = {
            let mut registry = self.registry.lock().expect("emitter registry mutex poisoned");
            let Some(entries) = registry.get_mut(name) else {
                return;
            };

            let callbacks = entries
                .iter()
                .map(|entry| entry.subscription.callback().clone())
                .collect();

            entries.retain(|entry| !entry.subscription.is_once());
            if entries.is_empty() {
                registry.remove(name);
            }
            callbacks
        };

        for callback in callbacks {
            callback(payload);
        }
    }

    /// Number of handlers registered for `name`.
    pub fn listener_count(&self, name: &str) -> usize {
        self.registry
            .lock()
            .expect("emitter registry mutex poisoned")
            .get(name)
            .map_or(0, Vec::len)
    }

    fn register(&self, name: &str, subscription: Subscription<T>) -> SubscriptionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry
            .lock()
            .expect("emitter registry mutex poisoned")
            .entry(name.to_string())
            .or_default()
            .push(Entry { id, subscription });
        id
    }
}

impl<T> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry.lock().expect("emitter registry mutex poisoned");
        let mut names: Vec<_> = registry.keys().collect();
        names.sort();
        f.debug_struct("Emitter").field("events", &names).finish()
    }
}
