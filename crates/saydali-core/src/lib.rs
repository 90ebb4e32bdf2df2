//! # saydali-core: Pure Storefront State Logic
//!
//! The cart and browsing-history state machines behind the Saydali pharmacy
//! storefront, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Saydali Storefront (client)                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    UI components                                │   │
//! │  │   Product page ──► Cart drawer ──► Cart page ──► Checkout       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ store operations / subscriptions       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               saydali-store (persisted stores)                  │   │
//! │  │        CartStore, HistoryStore, Storage backends, config        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ saydali-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────────┐   │   │
//! │  │   │  types   │  │   cart   │  │ history  │  │   pricing    │   │   │
//! │  │   │ snapshots│  │  merge,  │  │ MRU, 20  │  │ tax, shipping│   │   │
//! │  │   │  Money   │  │  clamp   │  │  cap     │  │   totals     │   │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO LOGGING SETUP • PURE TRANSITIONS    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog, line-item and history snapshots
//! - [`money`] - Integer money (minor units)
//! - [`cart`] - Deduplicating, stock-clamped cart
//! - [`history`] - Capped most-recently-used product list
//! - [`pricing`] - Derived totals (tax, shipping)
//! - [`validation`] - Boundary checks and quantity clamping
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use saydali_core::{Cart, CartItemInput, Money};
//!
//! let mut cart = Cart::new();
//! let input = CartItemInput {
//!     product_id: "p1".into(),
//!     name: "Vitamin C 1000".into(),
//!     slug: "vitamin-c-1000".into(),
//!     category: "vitamins".into(),
//!     image: "/img/vc.jpg".into(),
//!     price: Money::from_major(10),
//!     color: String::new(),
//!     size: String::new(),
//!     count_in_stock: 3,
//! };
//!
//! cart.add_item(input.clone(), 2).unwrap();
//! let outcome = cart.add_item(input, 5).unwrap();
//!
//! // Merged into one line, clamped to stock.
//! assert_eq!(cart.item_count(), 1);
//! assert_eq!(outcome.quantity, 3);
//! assert!(outcome.clamped);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod history;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{AddOutcome, Cart, QuantityChange};
pub use error::{CoreError, CoreResult, ValidationError};
pub use history::{BrowsingHistory, ViewOutcome};
pub use money::Money;
pub use pricing::{CartTotals, PricingPolicy};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum entries kept in the browsing history.
pub const MAX_HISTORY_ITEMS: usize = 20;
