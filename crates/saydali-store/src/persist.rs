//! # Persisted Store
//!
//! Shared plumbing behind [`CartStore`](crate::CartStore) and
//! [`HistoryStore`](crate::HistoryStore): owns a state value, a list of
//! observers, and a storage record that mirrors the state.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  open(storage, key)                                                     │
//! │     │                                                                   │
//! │     ├── record missing ─────────────────────► start empty              │
//! │     ├── unparseable / wrong version /                                  │
//! │     │   invariant broken ──── warn! ────────► start empty              │
//! │     └── valid ──────────────────────────────► rehydrated state         │
//! │                                                                         │
//! │  mutate(f)                                                              │
//! │     1. f(&mut state)                                                    │
//! │     2. unchanged? stop here                                             │
//! │     3. notify observers (registration order)                           │
//! │     4. persist (failure → warn! + last_persist_error, never raised)    │
//! │                                                                         │
//! │  mutate_durable(f)                                                      │
//! │     same, but always writes and returns the write failure              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Record Format
//! ```json
//! { "version": 1, "state": { "items": [ ... ] } }
//! ```

use std::rc::Rc;

use saydali_core::{BrowsingHistory, Cart, CoreResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::storage::Storage;

// =============================================================================
// Persistable
// =============================================================================

/// A state value that can be mirrored to a storage record.
pub trait Persistable: Serialize + DeserializeOwned + Default + Clone + PartialEq {
    /// Bumped whenever the persisted shape changes incompatibly.
    const SCHEMA_VERSION: u32 = 1;

    /// Checks a deserialized value before it replaces the empty state.
    fn check_invariants(&self) -> CoreResult<()>;
}

impl Persistable for Cart {
    fn check_invariants(&self) -> CoreResult<()> {
        Cart::check_invariants(self)
    }
}

impl Persistable for BrowsingHistory {
    fn check_invariants(&self) -> CoreResult<()> {
        BrowsingHistory::check_invariants(self)
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    state: &'a T,
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    state: serde_json::Value,
}

/// Encodes a state into its versioned record.
pub fn encode<T: Persistable>(state: &T) -> StoreResult<String> {
    Ok(serde_json::to_string(&EnvelopeRef {
        version: T::SCHEMA_VERSION,
        state,
    })?)
}

/// Decodes and checks a versioned record. All-or-nothing.
pub fn decode<T: Persistable>(record: &str) -> StoreResult<T> {
    let envelope: Envelope = serde_json::from_str(record)?;
    if envelope.version != T::SCHEMA_VERSION {
        return Err(StoreError::SchemaVersion {
            found: envelope.version,
            expected: T::SCHEMA_VERSION,
        });
    }
    let state: T = serde_json::from_value(envelope.state)?;
    state.check_invariants()?;
    Ok(state)
}

// =============================================================================
// Subscriptions
// =============================================================================

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer<T> = Box<dyn FnMut(&T)>;

// =============================================================================
// Persisted Store
// =============================================================================

/// A state value mirrored to one storage record, with observers.
pub struct PersistedStore<T: Persistable> {
    state: T,
    key: String,
    storage: Rc<dyn Storage>,
    observers: Vec<(SubscriptionId, Observer<T>)>,
    next_subscription: u64,
    rehydrated: bool,
    last_persist_error: Option<StoreError>,
}

impl<T: Persistable> PersistedStore<T> {
    /// Opens the store, rehydrating from `key` if a valid record exists.
    pub fn open(storage: Rc<dyn Storage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let (state, rehydrated) = match Self::load(storage.as_ref(), &key) {
            Ok(Some(state)) => {
                info!(key = %key, "Rehydrated state from storage");
                (state, true)
            }
            Ok(None) => {
                debug!(key = %key, "No stored record, starting empty");
                (T::default(), false)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding stored record, starting empty");
                (T::default(), false)
            }
        };

        PersistedStore {
            state,
            key,
            storage,
            observers: Vec::new(),
            next_subscription: 0,
            rehydrated,
            last_persist_error: None,
        }
    }

    fn load(storage: &dyn Storage, key: &str) -> StoreResult<Option<T>> {
        match storage.read(key)? {
            Some(record) => decode(&record).map(Some),
            None => Ok(None),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> &T {
        &self.state
    }

    /// Storage record name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// True if the state came from storage rather than starting empty.
    pub fn was_rehydrated(&self) -> bool {
        self.rehydrated
    }

    /// The most recent write failure, cleared by the next successful write.
    pub fn last_persist_error(&self) -> Option<&StoreError> {
        self.last_persist_error.as_ref()
    }

    /// Applies a mutation, then notifies and persists if the state changed.
    pub fn mutate<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        let before = self.state.clone();
        let result = f(&mut self.state);
        if self.state != before {
            self.notify();
            self.persist();
        }
        result
    }

    /// Like [`mutate`](Self::mutate), but always writes and returns the
    /// write failure instead of recording it.
    ///
    /// Used where the caller must know the record really changed, such as
    /// emptying the cart after checkout.
    pub fn mutate_durable<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> StoreResult<R> {
        let before = self.state.clone();
        let result = f(&mut self.state);
        if self.state != before {
            self.notify();
        }
        if let Err(e) = self.flush() {
            warn!(key = %self.key, error = %e, "Durable write failed");
            return Err(e);
        }
        Ok(result)
    }

    /// Registers an observer called with every new state.
    pub fn subscribe(&mut self, observer: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    /// Writes the current state now, returning any storage error.
    pub fn flush(&mut self) -> StoreResult<()> {
        let result = encode(&self.state).and_then(|record| self.storage.write(&self.key, &record));
        match result {
            Ok(()) => {
                self.last_persist_error = None;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn notify(&mut self) {
        for (_, observer) in self.observers.iter_mut() {
            observer(&self.state);
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.flush() {
            warn!(key = %self.key, error = %e, "Persist failed, keeping in-memory state");
            self.last_persist_error = Some(e);
        }
    }
}

impl<T: Persistable + std::fmt::Debug> std::fmt::Debug for PersistedStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedStore")
            .field("key", &self.key)
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .field("rehydrated", &self.rehydrated)
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use saydali_core::HistoryEntryInput;
    use std::cell::RefCell;

    fn entry(id: &str) -> HistoryEntryInput {
        HistoryEntryInput {
            id: id.to_string(),
            category: "c".to_string(),
            name: id.to_string(),
            image: String::new(),
            slug: id.to_string(),
        }
    }

    #[test]
    fn test_encode_envelope() {
        let record = encode(&BrowsingHistory::new()).unwrap();
        assert_eq!(record, r#"{"version":1,"state":{"products":[]}}"#);
    }

    #[test]
    fn test_decode_rejects_other_version() {
        let err = decode::<BrowsingHistory>(r#"{"version":2,"state":{"products":[]}}"#).unwrap_err();
        assert!(matches!(err, StoreError::SchemaVersion { found: 2, expected: 1 }));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode::<Cart>("{not json"),
            Err(StoreError::Serialization(_))
        ));
        assert!(matches!(
            decode::<Cart>(r#"{"version":1,"state":{"items":"nope"}}"#),
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn test_noop_mutation_does_not_notify_or_write() {
        let storage = Rc::new(MemoryStorage::new());
        let mut store: PersistedStore<BrowsingHistory> = PersistedStore::open(storage.clone(), "h");
        let calls = Rc::new(RefCell::new(0));
        let seen = calls.clone();
        store.subscribe(move |_| *seen.borrow_mut() += 1);

        let removed = store.mutate(|h| h.remove_item("missing"));

        assert!(!removed);
        assert_eq!(*calls.borrow(), 0);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_mutation_notifies_then_persists() {
        let storage = Rc::new(MemoryStorage::new());
        let mut store: PersistedStore<BrowsingHistory> = PersistedStore::open(storage.clone(), "h");

        let probe = storage.clone();
        let stored_at_notify = Rc::new(RefCell::new(None));
        let slot = stored_at_notify.clone();
        store.subscribe(move |h: &BrowsingHistory| {
            *slot.borrow_mut() = Some((h.len(), probe.read("h").unwrap()));
        });

        store.mutate(|h| h.add_item_at(entry("A"), 1)).unwrap();

        // Observer saw the new state before anything was written.
        assert_eq!(*stored_at_notify.borrow(), Some((1, None)));
        assert!(storage.read("h").unwrap().is_some());
    }

    #[test]
    fn test_durable_mutation_writes_even_when_unchanged() {
        let storage = Rc::new(MemoryStorage::new());
        let mut store: PersistedStore<BrowsingHistory> = PersistedStore::open(storage.clone(), "h");
        let calls = Rc::new(RefCell::new(0));
        let seen = calls.clone();
        store.subscribe(move |_| *seen.borrow_mut() += 1);

        store.mutate_durable(BrowsingHistory::clear).unwrap();

        assert_eq!(*calls.borrow(), 0);
        assert_eq!(
            storage.read("h").unwrap().as_deref(),
            Some(r#"{"version":1,"state":{"products":[]}}"#)
        );
    }

    #[test]
    fn test_unsubscribe() {
        let storage = Rc::new(MemoryStorage::new());
        let mut store: PersistedStore<BrowsingHistory> = PersistedStore::open(storage, "h");
        let calls = Rc::new(RefCell::new(Vec::new()));

        let a = calls.clone();
        let first = store.subscribe(move |_| a.borrow_mut().push("first"));
        let b = calls.clone();
        store.subscribe(move |_| b.borrow_mut().push("second"));

        store.mutate(|h| h.add_item_at(entry("A"), 1)).unwrap();
        assert!(store.unsubscribe(first));
        assert!(!store.unsubscribe(first));
        store.mutate(|h| h.add_item_at(entry("B"), 2)).unwrap();

        assert_eq!(*calls.borrow(), ["first", "second", "second"]);
    }
}
