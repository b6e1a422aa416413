use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use parking_lot::Mutex;

/// Callback type for value change notifications.
pub type ChangeHandler<T> = Arc<dyn Fn(Option<&T>) + Send + Sync>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A slot holding either nothing or one value, with synchronous change
/// notification.
///
/// Handlers run on the thread that calls [`Observable::set`], after the new
/// value has been stored, in subscription order.
pub struct Observable<T> {
    value: Mutex<Option<T>>,
    handlers: Mutex<Vec<(SubscriptionId, ChangeHandler<T>)>>,
    next_id: AtomicU64,
}

impl<T> Default for Observable<T> {
    fn default() -> Self {
        Self {
            value: Mutex::new(None),
            handlers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl<T: Clone> Observable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<T> {
        self.value.lock().clone()
    }

    /// Replace the value and notify every subscriber.
    pub fn set(&self, value: Option<T>) {
        *self.value.lock() = value.clone();
        // Snapshot so a handler may subscribe or unsubscribe without deadlocking.
        let handlers: Vec<_> = self
            .handlers
            .lock()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        for handler in handlers {
            handler(value.as_ref());
        }
    }

    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(Option<&T>) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.lock().push((id, Arc::new(handler)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.handlers.lock().retain(|(existing, _)| *existing != id);
    }
}
