//! Safe delivery of background results to caller-owned receivers
//!
//! A caller that wants the outcome of an operation keeps a [`CallbackReceiver`]
//! for as long as it is interested and hands a [`Callback`] to the operation.
//! The callback only holds a weak handle. Dropping the receiver is its
//! destruction notification: the handle is cleared under the same mutex that
//! delivery takes, so a delivery either finishes before teardown proceeds or
//! observes the cleared handle and discards the value.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

type Slot<T> = Box<dyn FnMut(T) + Send>;

struct Target<T> {
    slot: Mutex<Option<Slot<T>>>,
}

impl<T> Target<T> {
    fn lock(&self) -> MutexGuard<'_, Option<Slot<T>>> {
        // A panicking slot poisons the mutex; the handle itself stays consistent.
        self.slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Receiving end owned by the caller
///
/// Dropping it revokes every [`Callback`] created from it. Drop blocks while a
/// delivery to this receiver is running.
pub struct CallbackReceiver<T> {
    target: Arc<Target<T>>,
}

impl<T: Send + 'static> CallbackReceiver<T> {
    /// Creates a receiver that runs `slot` for each delivered value
    pub fn new(slot: impl FnMut(T) + Send + 'static) -> Self {
        Self {
            target: Arc::new(Target {
                slot: Mutex::new(Some(Box::new(slot))),
            }),
        }
    }

    /// Creates a single-shot callback bound to this receiver
    pub fn callback(&self) -> Callback<T> {
        Callback {
            target: Arc::downgrade(&self.target),
        }
    }

    /// Returns true until the receiver is dropped
    pub fn is_connected(&self) -> bool {
        self.target.lock().is_some()
    }
}

impl<T> Drop for CallbackReceiver<T> {
    fn drop(&mut self) {
        let slot = self.target.lock().take();
        // Run the slot's own destructor outside the lock
        drop(slot);
    }
}

/// Weak, revocable handle moved into an async operation
///
/// Consumed by [`Callback::deliver`], so it delivers at most once.
pub struct Callback<T> {
    target: Weak<Target<T>>,
}

impl<T> Callback<T> {
    /// Creates a callback that is not connected to any receiver
    ///
    /// Useful for fire-and-forget calls whose caller does not need the result.
    pub fn detached() -> Self {
        Self { target: Weak::new() }
    }

    /// Delivers `value` if the receiver is still alive
    ///
    /// Returns whether the slot ran. A receiver that has gone away is not an
    /// error: the value is discarded.
    pub fn deliver(self, value: T) -> bool {
        let Some(target) = self.target.upgrade() else {
            tracing::debug!("Callback receiver dropped, discarding result");
            return false;
        };

        let mut guard = target.lock();
        match guard.as_mut() {
            Some(slot) => {
                slot(value);
                true
            }
            None => {
                tracing::debug!("Callback receiver dropped, discarding result");
                false
            }
        }
    }

    /// Returns true if a delivery would currently reach a receiver
    pub fn is_connected(&self) -> bool {
        self.target
            .upgrade()
            .is_some_and(|target| target.lock().is_some())
    }
}

impl<T> std::fmt::Debug for Callback<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callback")
            .field("connected", &self.is_connected())
            .finish()
    }
}
