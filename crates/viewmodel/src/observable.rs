use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SUBSCRIPTION: AtomicU64 = AtomicU64::new(0);

/// Handle returned by [`Observable::subscribe`], used to unsubscribe.
///
/// Unique across all observables in the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Callback<T> = Box<dyn FnMut(&T)>;

/// A value with per-field change notification.
///
/// Notification is synchronous: subscribers run on the caller's stack, in
/// subscription order, before `set`/`notify` returns. Writing an equal value
/// is not a change and notifies nobody.
pub struct Observable<T> {
    value: T,
    subscribers: Vec<(SubscriptionId, Callback<T>)>,
}

impl<T: PartialEq> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            subscribers: Vec::new(),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Store `value` without notifying. Returns the previous value if it changed.
    ///
    /// Pair with [`Observable::notify`] when work must run between the write
    /// and the notification.
    pub fn replace(&mut self, value: T) -> Option<T> {
        if self.value == value {
            return None;
        }
        Some(std::mem::replace(&mut self.value, value))
    }

    /// Store `value` and notify subscribers if it changed. Returns whether it changed.
    pub fn set(&mut self, value: T) -> bool {
        let changed = self.replace(value).is_some();
        if changed {
            self.notify();
        }
        changed
    }

    /// Run every subscriber with the current value.
    pub fn notify(&mut self) {
        let value = &self.value;
        for (_, callback) in self.subscribers.iter_mut() {
            callback(value);
        }
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(NEXT_SUBSCRIPTION.fetch_add(1, Ordering::Relaxed));
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns true if the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T: PartialEq + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
