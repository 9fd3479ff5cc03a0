//! Observable value cell.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tokio::sync::watch;

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Shared<T> {
    sender: watch::Sender<T>,
    listeners: Mutex<Vec<(u64, Callback<T>)>>,
    next_id: AtomicU64,
}

/// A mutable cell whose writes are observable.
///
/// Cloning a `Ref` yields another handle to the same cell, so a UI layer
/// can hold a clone while the request controller writes through its own.
///
/// Observers come in two flavors:
/// - synchronous callbacks registered with [`on_change`](Self::on_change),
///   invoked on the writer's thread after every [`set`](Self::set);
/// - asynchronous receivers from [`subscribe`](Self::subscribe), backed by
///   a [`tokio::sync::watch`] channel.
///
/// Every write notifies, even when the new value equals the old one.
///
/// # Example
///
/// ```
/// use reactive_http::reactive::Ref;
/// use std::sync::{Arc, Mutex};
///
/// let count = Ref::new(0);
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let sink = Arc::clone(&seen);
/// let _subscription = count.on_change(move |v| sink.lock().unwrap().push(*v));
///
/// count.set(1);
/// count.set(2);
///
/// assert_eq!(count.get(), 2);
/// assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
/// ```
pub struct Ref<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Ref<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Ref").field(&*self.shared.sender.borrow()).finish()
    }
}

impl<T: Default + Send + Sync + 'static> Default for Ref<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Send + Sync + 'static> Ref<T> {
    /// Creates a cell holding `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        let (sender, _) = watch::channel(value);
        Self {
            shared: Arc::new(Shared {
                sender,
                listeners: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Calls `f` with a reference to the current value.
    ///
    /// `f` must not write to this cell.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.shared.sender.borrow())
    }

    /// Registers a callback invoked with the new value after every write.
    ///
    /// The callback stays registered until the returned [`Subscription`]
    /// is dropped or [`Subscription::detach`]ed.
    pub fn on_change(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        self.shared
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(callback)));

        let weak: Weak<Shared<T>> = Arc::downgrade(&self.shared);
        Subscription::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared
                    .listeners
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .retain(|(listener_id, _)| *listener_id != id);
            }
        })
    }

    /// Returns a receiver that is marked changed on every write.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.shared.sender.subscribe()
    }

    /// Returns the number of registered callbacks.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.shared
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<T: Clone + Send + Sync + 'static> Ref<T> {
    /// Returns a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.shared.sender.borrow().clone()
    }

    /// Replaces the value and notifies every observer.
    ///
    /// Callbacks run after the value is stored, without any lock held, so
    /// a callback may read this cell or write other cells.
    pub fn set(&self, value: T) {
        let snapshot = value.clone();
        self.shared.sender.send_replace(value);

        let callbacks: Vec<Callback<T>> = self
            .shared
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in callbacks {
            callback(&snapshot);
        }
    }
}

/// Handle that keeps an [`Ref::on_change`] callback registered.
///
/// Dropping the handle removes the callback.
#[must_use = "dropping a Subscription immediately unregisters its callback"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn new(unsubscribe: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Removes the callback now.
    pub fn unsubscribe(mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }

    /// Keeps the callback registered for the lifetime of the cell.
    pub fn detach(mut self) {
        self.unsubscribe = None;
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}
