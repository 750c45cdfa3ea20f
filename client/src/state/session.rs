//! Client-side pseudo-session holding the current Telegram identity.
//!
//! SYSTEM CONTEXT
//! ==============
//! The widget bridge writes identity records here; the header, login button,
//! and home page read them through subscriptions. Nothing in this module talks
//! to a server or checks signatures.
//!
//! SESSION LIFETIME
//! ================
//! Freshness is judged on every read against the injected clock. A record
//! older than [`identity::SESSION_TTL_SECS`] is reported as absent but stays in
//! storage until `clear` or the next `set` overwrites it.
//!
//! ERROR HANDLING
//! ==============
//! Storage and parse failures are logged and treated as "no record". The
//! in-memory current value is updated even when persisting fails.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::RefCell;
use std::rc::Rc;

use identity::IdentityRecord;

use super::observer::{ReplayObservers, Subscription};
use super::storage::KeyValueStorage;
use crate::util::clock::Clock;

/// Storage key holding the JSON-encoded identity record.
pub const STORAGE_KEY: &str = "telegram_user";

/// Error returned by [`SessionStore::accept`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The record was already outside the session window when it arrived.
    #[error("identity record is too old ({age_secs}s since auth)")]
    Expired { age_secs: i64 },
}

struct SessionInner {
    storage: Box<dyn KeyValueStorage>,
    clock: Box<dyn Clock>,
    current: RefCell<Option<IdentityRecord>>,
    observers: ReplayObservers<Option<IdentityRecord>>,
}

/// Shared handle to the single current identity record.
///
/// Clones refer to the same session.
#[derive(Clone)]
pub struct SessionStore {
    inner: Rc<SessionInner>,
}

impl SessionStore {
    /// Build a store over `storage`, restoring any record already persisted.
    pub fn load(storage: Box<dyn KeyValueStorage>, clock: Box<dyn Clock>) -> Self {
        let restored = read_record(storage.as_ref());
        Self {
            inner: Rc::new(SessionInner {
                storage,
                clock,
                current: RefCell::new(restored.clone()),
                observers: ReplayObservers::new(restored),
            }),
        }
    }

    /// Current Unix time according to the store's clock.
    pub fn now_secs(&self) -> i64 {
        self.inner.clock.now_secs()
    }

    /// The current record, or `None` when absent or stale.
    pub fn get(&self) -> Option<IdentityRecord> {
        let now = self.now_secs();
        self.inner
            .current
            .borrow()
            .as_ref()
            .filter(|record| record.is_fresh(now))
            .cloned()
    }

    /// Whether a fresh record is present.
    pub fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }

    /// Persist `record`, make it current, and notify subscribers.
    pub fn set(&self, record: IdentityRecord) {
        match record.to_json() {
            Ok(raw) => {
                if let Err(e) = self.inner.storage.set_item(STORAGE_KEY, &raw) {
                    leptos::logging::error!("failed to persist session: {e}");
                }
            }
            Err(e) => leptos::logging::error!("failed to encode session: {e}"),
        }
        *self.inner.current.borrow_mut() = Some(record.clone());
        self.inner.observers.emit(Some(record));
    }

    /// Accept a freshly received record, refusing one that is already stale.
    ///
    /// The record is stored exactly as received. No signature check is
    /// performed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Expired`] if the record is outside the session
    /// window; nothing is stored in that case.
    pub fn accept(&self, record: IdentityRecord) -> Result<IdentityRecord, SessionError> {
        let now = self.now_secs();
        if !record.is_fresh(now) {
            return Err(SessionError::Expired { age_secs: record.age_secs(now) });
        }
        self.set(record.clone());
        Ok(record)
    }

    /// Remove the persisted record and notify subscribers with `None`.
    pub fn clear(&self) {
        if let Err(e) = self.inner.storage.remove_item(STORAGE_KEY) {
            leptos::logging::error!("failed to remove session: {e}");
        }
        *self.inner.current.borrow_mut() = None;
        self.inner.observers.emit(None);
    }

    /// Re-read the persisted record, notifying subscribers if it changed.
    ///
    /// Used when another tab may have written the shared storage key. A stale
    /// record is delivered as `None`, the same as [`SessionStore::get`].
    pub fn reload(&self) {
        let restored = read_record(self.inner.storage.as_ref());
        let changed = *self.inner.current.borrow() != restored;
        if changed {
            *self.inner.current.borrow_mut() = restored;
            self.inner.observers.emit(self.get());
        }
    }

    /// Observe session changes.
    ///
    /// `observer` is called immediately with the current freshness-checked
    /// value, then synchronously on every `set` and `clear`.
    pub fn subscribe(&self, observer: impl Fn(&Option<IdentityRecord>) + 'static) -> Subscription {
        self.inner.observers.subscribe_with(&self.get(), observer)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("current", &self.inner.current.borrow())
            .field("subscribers", &self.inner.observers.len())
            .finish_non_exhaustive()
    }
}

fn read_record(storage: &dyn KeyValueStorage) -> Option<IdentityRecord> {
    let raw = match storage.get_item(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            leptos::logging::warn!("failed to read session: {e}");
            return None;
        }
    };
    match IdentityRecord::from_json(&raw) {
        Ok(record) => Some(record),
        Err(e) => {
            leptos::logging::warn!("ignoring malformed session data: {e}");
            None
        }
    }
}
