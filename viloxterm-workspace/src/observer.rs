//! Observer registration and notification.
//!
//! Observers subscribe to post-mutation events. True weak references need a
//! GC'd or `Rc`-counted subject to point at; here the model itself is the
//! subject and callbacks are plain closures, so "not ownership" is modeled
//! instead by a deregistration handle (`ObserverToken`) the caller holds —
//! dropping interest means calling `unregister`, there is no implicit
//! expiry. Notification runs every registered callback synchronously, in
//! registration order, after the triggering mutation's structural edits are
//! already complete (so re-entrant reads during notification see a
//! consistent tree).

use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};

pub type ObserverCallback = Box<dyn Fn(&str, &Value) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverToken(u64);

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<(ObserverToken, ObserverCallback)>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        ObserverRegistry {
            observers: Vec::new(),
        }
    }

    pub fn register(&mut self, callback: ObserverCallback) -> ObserverToken {
        let token = ObserverToken(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed));
        self.observers.push((token, callback));
        token
    }

    pub fn unregister(&mut self, token: ObserverToken) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(t, _)| *t != token);
        self.observers.len() != before
    }

    /// Notify every observer, in registration order. Must only be called
    /// once a mutation's structural edits are complete.
    pub fn notify(&self, event_kind: &str, payload: &Value) {
        for (_, callback) in &self.observers {
            callback(event_kind, payload);
        }
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("count", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering as O};
    use std::sync::Arc;

    #[test]
    fn notifications_run_in_registration_order() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut registry = ObserverRegistry::new();

        let o1 = order.clone();
        registry.register(Box::new(move |_, _| o1.lock().unwrap().push(1)));
        let o2 = order.clone();
        registry.register(Box::new(move |_, _| o2.lock().unwrap().push(2)));

        registry.notify("tab_created", &Value::Null);
        assert_eq!(*order.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn unregister_stops_future_notifications() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut registry = ObserverRegistry::new();
        let c = count.clone();
        let token = registry.register(Box::new(move |_, _| {
            c.fetch_add(1, O::Relaxed);
        }));
        registry.notify("x", &Value::Null);
        assert!(registry.unregister(token));
        registry.notify("x", &Value::Null);
        assert_eq!(count.load(O::Relaxed), 1);
    }
}
