//! # Cart State
//!
//! The authoritative, deduplicated list of cart line items.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  UI Action                Operation               State Change          │
//! │  ─────────                ─────────               ────────────          │
//! │                                                                         │
//! │  "Add to cart" ─────────► add_item() ───────────► merge or push        │
//! │                                                   (clamped to stock)    │
//! │                                                                         │
//! │  Quantity select ───────► update_quantity() ────► items[i].qty = n     │
//! │                                                   (clamped 1..=stock)   │
//! │                                                                         │
//! │  Trash icon ────────────► remove_item() ────────► items.retain(..)     │
//! │                                                                         │
//! │  Checkout success ──────► clear() ──────────────► items.clear()        │
//! │                                                                         │
//! │  NOTE: nothing here fails on bad quantities or unknown ids.            │
//! │        Only a malformed snapshot is rejected.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one item per `(product_id, color, size)`
//! - Every quantity is within `1..=count_in_stock`
//! - Insertion order is display order

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::{CartTotals, PricingPolicy};
use crate::types::{now_millis, CartItemInput, CartLineItem, ClientId};
use crate::validation::clamp_quantity;

// =============================================================================
// Operation Outcomes
// =============================================================================

/// What `add_item` did, for the caller's toast and cart-page anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AddOutcome {
    /// Id of the new or merged-into line item.
    pub client_id: ClientId,
    /// Resulting quantity of that line item.
    pub quantity: i64,
    /// True when an existing line item absorbed the request.
    pub merged: bool,
    /// True when the request was cut down to fit stock (or raised to 1).
    pub clamped: bool,
}

/// What `update_quantity` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct QuantityChange {
    pub previous: i64,
    pub quantity: i64,
    pub clamped: bool,
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// Persisted as `{"items": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Adds a snapshot to the cart, merging with an existing variant.
    ///
    /// ## Behavior
    /// - Same `(product_id, color, size)` already present: quantity grows by
    ///   `quantity`, capped at that item's stock ceiling
    /// - Otherwise: appended with quantity clamped to `1..=count_in_stock`
    ///
    /// ## Errors
    /// Only `CoreError::Validation` for a malformed snapshot.
    pub fn add_item(&mut self, input: CartItemInput, quantity: i64) -> CoreResult<AddOutcome> {
        self.add_item_at(input, quantity, now_millis())
    }

    /// `add_item` with an explicit creation instant for the client id.
    pub fn add_item_at(
        &mut self,
        input: CartItemInput,
        quantity: i64,
        now_ms: i64,
    ) -> CoreResult<AddOutcome> {
        input.validate()?;

        if let Some(item) = self
            .items
            .iter_mut()
            .find(|i| i.is_variant(&input.product_id, &input.color, &input.size))
        {
            // Adding never shrinks a line, so a non-positive request counts as 1.
            let increment = quantity.max(1);
            let result = clamp_quantity(item.quantity.saturating_add(increment), item.count_in_stock);
            item.quantity = result.value;
            return Ok(AddOutcome {
                client_id: item.client_id.clone(),
                quantity: item.quantity,
                merged: true,
                clamped: result.clamped || increment != quantity,
            });
        }

        let result = clamp_quantity(quantity, input.count_in_stock);
        let client_id = self.unused_client_id(&input, now_ms);
        self.items
            .push(CartLineItem::from_input(input, client_id.clone(), result.value));

        Ok(AddOutcome {
            client_id,
            quantity: result.value,
            merged: false,
            clamped: result.clamped,
        })
    }

    /// Id for a new line, bumping the instant until no existing line has it.
    ///
    /// Fields may contain `:`, so two distinct variants added in the same
    /// millisecond can render to the same text.
    fn unused_client_id(&self, input: &CartItemInput, now_ms: i64) -> ClientId {
        let mut created_at = now_ms;
        loop {
            let id = ClientId::generate(&input.product_id, &input.color, &input.size, created_at);
            if self.get(&id).is_none() {
                return id;
            }
            created_at = created_at.saturating_add(1);
        }
    }

    /// Sets the quantity of a line item, clamped to `1..=count_in_stock`.
    ///
    /// Zero does not remove: removal goes through `remove_item`.
    ///
    /// ## Returns
    /// `None` if the id is not in the cart (no-op).
    pub fn update_quantity(&mut self, client_id: &ClientId, quantity: i64) -> Option<QuantityChange> {
        let item = self.items.iter_mut().find(|i| &i.client_id == client_id)?;
        let previous = item.quantity;
        let result = clamp_quantity(quantity, item.count_in_stock);
        item.quantity = result.value;
        Some(QuantityChange {
            previous,
            quantity: result.value,
            clamped: result.clamped,
        })
    }

    /// Removes a line item. Returns false if the id was absent.
    pub fn remove_item(&mut self, client_id: &ClientId) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| &i.client_id != client_id);
        self.items.len() != initial_len
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Items in display order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn get(&self, client_id: &ClientId) -> Option<&CartLineItem> {
        self.items.iter().find(|i| &i.client_id == client_id)
    }

    /// Finds the line item for a product variant, if it is in the cart.
    pub fn find_variant(&self, product_id: &str, color: &str, size: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|i| i.is_variant(product_id, color, size))
    }

    /// True if any variant of the product is in the cart.
    pub fn contains_product(&self, product_id: &str) -> bool {
        self.items.iter().any(|i| i.product_id == product_id)
    }

    /// Number of line items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of all line quantities (the badge on the cart icon).
    pub fn total_quantity(&self) -> i64 {
        self.items
            .iter()
            .fold(0_i64, |acc, i| acc.saturating_add(i.quantity))
    }

    /// Sum of all line totals, before tax and shipping.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Derived totals under `policy`.
    pub fn totals(&self, policy: &PricingPolicy) -> CartTotals {
        policy.totals(self)
    }

    /// Verifies a cart read back from storage before it is trusted.
    pub fn check_invariants(&self) -> CoreResult<()> {
        let mut variants = HashSet::new();
        let mut ids = HashSet::new();

        for item in &self.items {
            CartItemInput {
                product_id: item.product_id.clone(),
                name: item.name.clone(),
                slug: item.slug.clone(),
                category: item.category.clone(),
                image: item.image.clone(),
                price: item.price,
                color: item.color.clone(),
                size: item.size.clone(),
                count_in_stock: item.count_in_stock,
            }
            .validate()?;

            if item.quantity < 1 || item.quantity > item.count_in_stock {
                return Err(CoreError::InvariantViolated {
                    reason: format!(
                        "quantity {} of {} outside 1..={}",
                        item.quantity, item.client_id, item.count_in_stock
                    ),
                });
            }
            if !variants.insert((&item.product_id, &item.color, &item.size)) {
                return Err(CoreError::InvariantViolated {
                    reason: format!("duplicate line for product {}", item.product_id),
                });
            }
            if !ids.insert(&item.client_id) {
                return Err(CoreError::InvariantViolated {
                    reason: format!("duplicate client id {}", item.client_id),
                });
            }
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
