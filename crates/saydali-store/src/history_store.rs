//! # History Store
//!
//! Persisted, observable "recently viewed" list. Every product page view
//! calls [`HistoryStore::record_view`]; the list keeps the newest 20.

use std::rc::Rc;

use saydali_core::{
    BrowsingHistory, BrowsingHistoryItem, CatalogProduct, CoreResult, HistoryEntryInput,
    ViewOutcome,
};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::persist::{PersistedStore, SubscriptionId};
use crate::storage::Storage;

/// Default storage record for the browsing history.
pub const DEFAULT_HISTORY_KEY: &str = "saydali-history";

#[derive(Debug)]
pub struct HistoryStore {
    inner: PersistedStore<BrowsingHistory>,
}

impl HistoryStore {
    pub fn open(storage: Rc<dyn Storage>, key: &str) -> Self {
        HistoryStore {
            inner: PersistedStore::open(storage, key),
        }
    }

    /// Moves (or inserts) a product to the front with a fresh timestamp.
    pub fn add_item(&mut self, input: HistoryEntryInput) -> CoreResult<ViewOutcome> {
        let id = input.id.clone();
        let outcome = self.inner.mutate(|history| history.add_item(input))?;
        debug!(
            product_id = %id,
            refreshed = outcome.refreshed,
            evicted = ?outcome.evicted,
            "Product view recorded"
        );
        Ok(outcome)
    }

    /// Records a view of a catalog product.
    pub fn record_view(&mut self, product: &CatalogProduct) -> CoreResult<ViewOutcome> {
        self.add_item(HistoryEntryInput::from(product))
    }

    pub fn remove_item(&mut self, id: &str) -> bool {
        let removed = self.inner.mutate(|history| history.remove_item(id));
        debug!(product_id = %id, removed, "History entry remove");
        removed
    }

    /// Empties the list, reporting a failed write.
    pub fn clear(&mut self) -> StoreResult<()> {
        self.inner.mutate_durable(BrowsingHistory::clear)?;
        debug!("History cleared");
        Ok(())
    }

    /// Current history snapshot.
    pub fn history(&self) -> &BrowsingHistory {
        self.inner.state()
    }

    pub fn items(&self) -> &[BrowsingHistoryItem] {
        self.inner.state().items()
    }

    pub fn recent_excluding(&self, id: &str, limit: usize) -> Vec<&BrowsingHistoryItem> {
        self.inner.state().recent_excluding(id, limit)
    }

    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&BrowsingHistory) + 'static,
    ) -> SubscriptionId {
        self.inner.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.inner.unsubscribe(id)
    }

    pub fn was_rehydrated(&self) -> bool {
        self.inner.was_rehydrated()
    }

    pub fn last_persist_error(&self) -> Option<&StoreError> {
        self.inner.last_persist_error()
    }

    pub fn flush(&mut self) -> StoreResult<()> {
        self.inner.flush()
    }
}
