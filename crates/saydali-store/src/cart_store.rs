//! # Cart Store
//!
//! The session's single source of truth for the shopping cart.
//!
//! ## Who Calls What
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Product page ──── add_product() / add_item() ──┐                       │
//! │  Cart page ─────── update_quantity() ───────────┤                       │
//! │  Cart drawer ───── remove_item() ───────────────┼──► CartStore          │
//! │  Checkout ──────── totals(), then clear() ──────┘      │                │
//! │                                                        │ notify         │
//! │  Header badge ◄──── subscribe(|cart| ...) ◄────────────┘                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! UI code never holds its own copy of the cart: it reads through
//! [`CartStore::cart`] and mutates through the operations below.

use std::rc::Rc;

use saydali_core::{
    AddOutcome, Cart, CartItemInput, CartLineItem, CartTotals, CatalogProduct, ClientId,
    CoreResult, PricingPolicy, QuantityChange,
};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::persist::{PersistedStore, SubscriptionId};
use crate::storage::Storage;

/// Default storage record for the cart.
pub const DEFAULT_CART_KEY: &str = "saydali-cart";

/// Persisted, observable cart.
#[derive(Debug)]
pub struct CartStore {
    inner: PersistedStore<Cart>,
    pricing: PricingPolicy,
}

impl CartStore {
    /// Opens the cart, rehydrating from `key` if a valid record exists.
    pub fn open(storage: Rc<dyn Storage>, key: &str, pricing: PricingPolicy) -> Self {
        CartStore {
            inner: PersistedStore::open(storage, key),
            pricing,
        }
    }

    /// Adds a snapshot, merging with an existing line for the same variant.
    ///
    /// ## Errors
    /// Only for a malformed snapshot; quantities are clamped, not rejected.
    pub fn add_item(&mut self, input: CartItemInput, quantity: i64) -> CoreResult<AddOutcome> {
        let product_id = input.product_id.clone();
        let outcome = self.inner.mutate(|cart| cart.add_item(input, quantity))?;
        debug!(
            product_id = %product_id,
            client_id = %outcome.client_id,
            requested = quantity,
            quantity = outcome.quantity,
            merged = outcome.merged,
            clamped = outcome.clamped,
            "Cart item added"
        );
        Ok(outcome)
    }

    /// Snapshots a catalog product with the chosen variant and adds it.
    pub fn add_product(
        &mut self,
        product: &CatalogProduct,
        color: &str,
        size: &str,
        quantity: i64,
    ) -> CoreResult<AddOutcome> {
        let input = CartItemInput::from_catalog(product, color, size)?;
        self.add_item(input, quantity)
    }

    /// Sets a line quantity, clamped to `1..=count_in_stock`.
    ///
    /// `None` when the id is unknown; nothing is notified or written then.
    pub fn update_quantity(&mut self, client_id: &ClientId, quantity: i64) -> Option<QuantityChange> {
        let change = self.inner.mutate(|cart| cart.update_quantity(client_id, quantity));
        match &change {
            Some(c) => debug!(
                client_id = %client_id,
                requested = quantity,
                quantity = c.quantity,
                clamped = c.clamped,
                "Cart quantity updated"
            ),
            None => debug!(client_id = %client_id, "Quantity update for unknown item ignored"),
        }
        change
    }

    /// Removes a line item. Removing an absent id is a no-op.
    pub fn remove_item(&mut self, client_id: &ClientId) -> bool {
        let removed = self.inner.mutate(|cart| cart.remove_item(client_id));
        debug!(client_id = %client_id, removed, "Cart item remove");
        removed
    }

    /// Empties the cart (explicit clear or checkout success).
    ///
    /// Unlike the other operations this reports a failed write: a cart
    /// that checkout believes is empty must not come back on next launch.
    /// The in-memory cart is empty either way.
    pub fn clear(&mut self) -> StoreResult<()> {
        self.inner.mutate_durable(Cart::clear)?;
        debug!("Cart cleared");
        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Current cart snapshot.
    pub fn cart(&self) -> &Cart {
        self.inner.state()
    }

    pub fn items(&self) -> &[CartLineItem] {
        self.inner.state().items()
    }

    /// Totals under this session's pricing policy.
    pub fn totals(&self) -> CartTotals {
        self.pricing.totals(self.inner.state())
    }

    pub fn pricing(&self) -> &PricingPolicy {
        &self.pricing
    }

    // =========================================================================
    // Subscriptions & Persistence
    // =========================================================================

    pub fn subscribe(&mut self, observer: impl FnMut(&Cart) + 'static) -> SubscriptionId {
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
