//! # Pricing
//!
//! Derives cart totals on read. Nothing here is stored in the cart.
//!
//! ## Totals Pipeline
//! ```text
//! Cart.items ──► subtotal ──┬──► tax (VAT on subtotal)
//!                           │
//!                           └──► shipping (0 if empty or ≥ threshold)
//!
//! total = subtotal + tax + shipping
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::money::Money;
use crate::types::TaxRate;

/// Store-wide pricing rules applied at checkout and on the cart page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    pub tax_rate: TaxRate,
    /// Flat fee charged below the free-shipping threshold.
    pub shipping_fee: Money,
    /// Subtotal from which shipping is free.
    pub free_shipping_threshold: Money,
}

impl Default for PricingPolicy {
    /// 15% VAT, 25.00 shipping, free from 200.00.
    fn default() -> Self {
        PricingPolicy {
            tax_rate: TaxRate::from_bps(1500),
            shipping_fee: Money::from_major(25),
            free_shipping_threshold: Money::from_major(200),
        }
    }
}

impl PricingPolicy {
    pub fn shipping_for(&self, subtotal: Money, is_empty: bool) -> Money {
        if is_empty || subtotal >= self.free_shipping_threshold {
            Money::zero()
        } else {
            self.shipping_fee
        }
    }

    /// Computes the totals the checkout collaborator reads.
    pub fn totals(&self, cart: &Cart) -> CartTotals {
        let subtotal = cart.subtotal();
        let tax = subtotal.calculate_tax(self.tax_rate);
        let shipping = self.shipping_for(subtotal, cart.is_empty());

        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            subtotal,
            tax,
            shipping,
            total: subtotal + tax + shipping,
        }
    }
}

/// Cart totals summary for the cart page and checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub tax: Money,
    pub shipping: Money,
    pub total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        PricingPolicy::default().totals(cart)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
