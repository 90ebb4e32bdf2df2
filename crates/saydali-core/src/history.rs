//! # Browsing History
//!
//! Most-recently-used list of viewed products, capped at
//! [`MAX_HISTORY_ITEMS`](crate::MAX_HISTORY_ITEMS).
//!
//! ## MRU Eviction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_item(A) on [C, B, A]                                               │
//! │                                                                         │
//! │  1. drop existing A       [C, B]                                        │
//! │  2. push A to the front   [A, C, B]   (fresh timestamp)                 │
//! │  3. truncate tail to 20   [A, C, B]                                     │
//! │                                                                         │
//! │  Position lookup is O(n), n ≤ 20.                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{now_millis, BrowsingHistoryItem, HistoryEntryInput};
use crate::validation::validate_required;
use crate::MAX_HISTORY_ITEMS;

/// What `add_item` did to the list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewOutcome {
    /// The product was already in the list and moved to the front.
    pub refreshed: bool,
    /// Id of the entry pushed off the tail, if any.
    pub evicted: Option<String>,
}

/// Recently viewed products, newest first.
///
/// Persisted as `{"products": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BrowsingHistory {
    products: Vec<BrowsingHistoryItem>,
}

impl BrowsingHistory {
    pub fn new() -> Self {
        BrowsingHistory {
            products: Vec::new(),
        }
    }

    /// Records a product view, stamped with the current time.
    pub fn add_item(&mut self, input: HistoryEntryInput) -> CoreResult<ViewOutcome> {
        self.add_item_at(input, now_millis())
    }

    /// `add_item` with an explicit timestamp.
    pub fn add_item_at(&mut self, input: HistoryEntryInput, timestamp: i64) -> CoreResult<ViewOutcome> {
        input.validate()?;

        let before = self.products.len();
        self.products.retain(|p| p.id != input.id);
        let refreshed = self.products.len() != before;

        self.products
            .insert(0, BrowsingHistoryItem::from_input(input, timestamp));

        let evicted = if self.products.len() > MAX_HISTORY_ITEMS {
            self.products.truncate(MAX_HISTORY_ITEMS + 1);
            self.products.pop().map(|p| p.id)
        } else {
            None
        };

        Ok(ViewOutcome { refreshed, evicted })
    }

    /// Drops a product from the list. Returns false if it was absent.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.products.len();
        self.products.retain(|p| p.id != id);
        self.products.len() != before
    }

    pub fn clear(&mut self) {
        self.products.clear();
    }

    /// Entries, newest first.
    pub fn items(&self) -> &[BrowsingHistoryItem] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.products.iter().any(|p| p.id == id)
    }

    /// The "recently viewed" strip on a product page: newest first, without
    /// the product currently shown, at most `limit` entries.
    pub fn recent_excluding(&self, id: &str, limit: usize) -> Vec<&BrowsingHistoryItem> {
        self.products
            .iter()
            .filter(|p| p.id != id)
            .take(limit)
            .collect()
    }

    /// Verifies a history read back from storage before it is trusted.
    pub fn check_invariants(&self) -> CoreResult<()> {
        if self.products.len() > MAX_HISTORY_ITEMS {
            return Err(CoreError::InvariantViolated {
                reason: format!(
                    "{} history entries, limit is {}",
                    self.products.len(),
                    MAX_HISTORY_ITEMS
                ),
            });
        }

        let mut seen = HashSet::new();
        for product in &self.products {
            if product.id.trim().is_empty() {
                return Err(CoreError::InvariantViolated {
                    reason: "history entry without id".to_string(),
                });
            }
            validate_required("name", &product.name)?;
            if !seen.insert(product.id.as_str()) {
                return Err(CoreError::InvariantViolated {
                    reason: format!("duplicate history entry {}", product.id),
                });
            }
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
