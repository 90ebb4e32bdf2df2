//! # saydali-store: Persisted Storefront State
//!
//! Wraps the pure `saydali-core` cart and history with local persistence,
//! subscriber notification, configuration and logging setup.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Saydali State Flow                               │
//! │                                                                         │
//! │  UI action (add to cart, view product)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  saydali-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  CartStore    │    │ PersistedStore│    │   Storage    │  │   │
//! │  │   │  HistoryStore │───►│ notify, then  │───►│ FileStorage  │  │   │
//! │  │   │               │    │ persist       │    │ MemoryStorage│  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   <data_dir>/saydali-cart.json, <data_dir>/saydali-history.json │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`storage`] - Storage trait and backends
//! - [`persist`] - Versioned records, rehydration, observers
//! - [`cart_store`] - Persisted cart
//! - [`history_store`] - Persisted browsing history
//! - [`session`] - Both stores over one backend
//! - [`config`] - TOML + environment configuration
//! - [`telemetry`] - Tracing subscriber setup
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust
//! use saydali_store::Session;
//! use saydali_core::{CatalogProduct, Money, PricingPolicy};
//!
//! let mut session = Session::in_memory(PricingPolicy::default());
//! let badge = std::rc::Rc::new(std::cell::Cell::new(0));
//! let seen = badge.clone();
//! session.cart.subscribe(move |cart| seen.set(cart.total_quantity()));
//!
//! let product = CatalogProduct {
//!     id: "p1".into(),
//!     name: "Panadol Extra".into(),
//!     slug: "panadol-extra".into(),
//!     category: "pain-relief".into(),
//!     images: vec!["/img/panadol.jpg".into()],
//!     colors: vec![],
//!     sizes: vec![],
//!     price: Money::from_major_minor(12, 50),
//!     count_in_stock: 10,
//! };
//!
//! session.history.record_view(&product).unwrap();
//! session.cart.add_product(&product, "", "", 2).unwrap();
//! assert_eq!(badge.get(), 2);
//! ```

pub mod cart_store;
pub mod config;
pub mod error;
pub mod history_store;
pub mod persist;
pub mod session;
pub mod storage;
pub mod telemetry;

pub use cart_store::{CartStore, DEFAULT_CART_KEY};
pub use config::{PricingSettings, StorageSettings, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use history_store::{HistoryStore, DEFAULT_HISTORY_KEY};
pub use persist::{Persistable, PersistedStore, SubscriptionId};
pub use session::Session;
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use telemetry::init_tracing;
