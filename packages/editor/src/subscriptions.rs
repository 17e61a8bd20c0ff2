//! # Subscriptions
//!
//! Every listener, timer and media-query subscription registered for a
//! session is recorded here with its disposer. Teardown runs all of them
//! once, in registration order.

use tracing::debug;

struct Subscription {
    name: &'static str,
    dispose: Box<dyn FnOnce()>,
}

#[derive(Default)]
pub struct Subscriptions {
    entries: Vec<Subscription>,
    closed: bool,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a disposer. After teardown it runs immediately instead.
    pub fn add(&mut self, name: &'static str, dispose: impl FnOnce() + 'static) {
        if self.closed {
            debug!(name, "Subscription added after teardown, disposing");
            dispose();
            return;
        }
        self.entries.push(Subscription {
            name,
            dispose: Box::new(dispose),
        });
    }

    /// Run every disposer; returns how many ran
    pub fn dispose_all(&mut self) -> usize {
        self.closed = true;
        let entries = std::mem::take(&mut self.entries);
        let count = entries.len();
        for entry in entries {
            debug!(name = entry.name, "Disposing subscription");
            (entry.dispose)();
        }
        count
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.name).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl std::fmt::Debug for Subscriptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriptions")
            .field("names", &self.names())
            .field("closed", &self.closed)
            .finish()
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        self.dispose_all();
    }
}
