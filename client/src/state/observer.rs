//! Single-threaded observer list that replays its last value.
//!
//! DESIGN
//! ======
//! New subscribers immediately receive the most recent value, then every later
//! emission in registration order. Delivery is synchronous. The observer list
//! is snapshotted before each delivery so observers may subscribe, unsubscribe,
//! or read the owning store from inside a callback without a re-borrow panic.

#[cfg(test)]
#[path = "observer_test.rs"]
mod observer_test;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Observer<T> = Rc<dyn Fn(&T)>;

struct Inner<T> {
    last: T,
    next_id: u64,
    observers: Vec<(u64, Observer<T>)>,
}

impl<T> Inner<T> {
    fn contains(&self, id: u64) -> bool {
        self.observers.iter().any(|(existing, _)| *existing == id)
    }
}

/// Hot observable with replay-of-last-value semantics.
pub struct ReplayObservers<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for ReplayObservers<T> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<T: Clone + 'static> ReplayObservers<T> {
    /// Create an observer list whose replay value starts at `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner { last: initial, next_id: 0, observers: Vec::new() })),
        }
    }

    /// The value that would be replayed to a new subscriber.
    pub fn last(&self) -> T {
        self.inner.borrow().last.clone()
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.inner.borrow().observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record `value` as the latest and deliver it to every live observer.
    pub fn emit(&self, value: T) {
        let snapshot: Vec<(u64, Observer<T>)> = {
            let mut inner = self.inner.borrow_mut();
            inner.last = value.clone();
            inner.observers.clone()
        };
        for (id, observer) in snapshot {
            // Skip observers dropped by an earlier callback in this pass.
            if self.inner.borrow().contains(id) {
                observer(&value);
            }
        }
    }

    /// Register `observer`, replaying the last emitted value to it first.
    pub fn subscribe(&self, observer: impl Fn(&T) + 'static) -> Subscription {
        let replay = self.last();
        self.subscribe_with(&replay, observer)
    }

    /// Register `observer`, replaying `replay` instead of the stored value.
    ///
    /// Owners use this when the value a late subscriber should see depends on
    /// read-time state, such as a session that has gone stale since the last
    /// emission.
    pub fn subscribe_with(&self, replay: &T, observer: impl Fn(&T) + 'static) -> Subscription {
        let observer: Observer<T> = Rc::new(observer);
        observer(replay);

        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.observers.push((id, observer));
            id
        };

        let weak: Weak<RefCell<Inner<T>>> = Rc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.borrow_mut().observers.retain(|(existing, _)| *existing != id);
                }
            })),
        }
    }
}

/// Handle that keeps an observer registered. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately; call `detach` to keep it"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Remove the observer now.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Keep the observer registered for the lifetime of the observable.
    pub fn detach(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("active", &self.cancel.is_some()).finish()
    }
}
