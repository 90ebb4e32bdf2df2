//! # Session
//!
//! Both stores of one storefront session, sharing a single storage backend.
//!
//! ```text
//! StoreConfig ──► data_dir ──► FileStorage ─┬─► CartStore    (cart_key)
//!             └─► pricing ──────────────────┤
//!                                           └─► HistoryStore (history_key)
//! ```

use std::rc::Rc;

use saydali_core::PricingPolicy;
use tracing::info;

use crate::cart_store::{CartStore, DEFAULT_CART_KEY};
use crate::config::StoreConfig;
use crate::error::StoreResult;
use crate::history_store::{HistoryStore, DEFAULT_HISTORY_KEY};
use crate::storage::{FileStorage, MemoryStorage, Storage};

#[derive(Debug)]
pub struct Session {
    pub cart: CartStore,
    pub history: HistoryStore,
}

impl Session {
    /// Opens file-backed stores as described by `config`.
    pub fn open(config: &StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        let dir = config.data_dir()?;
        info!(data_dir = ?dir, "Opening storefront session");

        let storage: Rc<dyn Storage> = Rc::new(FileStorage::new(dir));
        Ok(Self::with_storage(
            storage,
            &config.storage.cart_key,
            &config.storage.history_key,
            config.pricing_policy(),
        ))
    }

    /// Opens both stores over an existing backend.
    pub fn with_storage(
        storage: Rc<dyn Storage>,
        cart_key: &str,
        history_key: &str,
        pricing: PricingPolicy,
    ) -> Self {
        Session {
            cart: CartStore::open(storage.clone(), cart_key, pricing),
            history: HistoryStore::open(storage, history_key),
        }
    }

    /// Ephemeral session; nothing outlives the value.
    pub fn in_memory(pricing: PricingPolicy) -> Self {
        Self::with_storage(
            Rc::new(MemoryStorage::new()),
            DEFAULT_CART_KEY,
            DEFAULT_HISTORY_KEY,
            pricing,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    #[test]
    fn test_open_rejects_invalid_config() {
        let mut config = StoreConfig::default();
        config.storage.history_key = config.storage.cart_key.clone();
        assert!(matches!(
            Session::open(&config),
            Err(StoreError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_open_uses_configured_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = StoreConfig::default();
        config.storage.data_dir = Some(dir.path().to_path_buf());

        let mut session = Session::open(&config).unwrap();
        assert!(!session.cart.was_rehydrated());
        session.cart.clear().unwrap();
        session.history.clear().unwrap();

        assert!(dir.path().join("saydali-cart.json").exists());
        assert!(dir.path().join("saydali-history.json").exists());
    }
}
