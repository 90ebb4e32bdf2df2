//! # Store Configuration
//!
//! Where the stores keep their records and which pricing rules apply.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SAYDALI_DATA_DIR=/var/lib/saydali                                  │
//! │     SAYDALI_TAX_RATE=15                                                │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/saydali/config.toml (Linux)                              │
//! │     ~/Library/Application Support/com.saydali.storefront/config.toml   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     platform data dir, 15% VAT, SAR                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [storage]
//! data_dir = "/var/lib/saydali"
//! cart_key = "saydali-cart"
//! history_key = "saydali-history"
//!
//! [pricing]
//! tax_rate_bps = 1500
//! shipping_fee = 2500             # minor units
//! free_shipping_threshold = 20000 # minor units
//! currency = "SAR"
//! ```

use std::path::PathBuf;

use saydali_core::{Money, PricingPolicy, TaxRate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cart_store::DEFAULT_CART_KEY;
use crate::error::{StoreError, StoreResult};
use crate::history_store::DEFAULT_HISTORY_KEY;

// =============================================================================
// Storage Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory for record files. `None` uses the platform data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    #[serde(default = "default_cart_key")]
    pub cart_key: String,

    #[serde(default = "default_history_key")]
    pub history_key: String,
}

fn default_cart_key() -> String {
    DEFAULT_CART_KEY.to_string()
}

fn default_history_key() -> String {
    DEFAULT_HISTORY_KEY.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            data_dir: None,
            cart_key: default_cart_key(),
            history_key: default_history_key(),
        }
    }
}

// =============================================================================
// Pricing Settings
// =============================================================================

/// Pricing rules in config-file form (plain integers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingSettings {
    #[serde(default = "default_tax_rate_bps")]
    pub tax_rate_bps: u32,

    /// Flat shipping fee, minor units.
    #[serde(default = "default_shipping_fee")]
    pub shipping_fee: i64,

    /// Free shipping from this subtotal, minor units.
    #[serde(default = "default_free_shipping_threshold")]
    pub free_shipping_threshold: i64,

    /// ISO 4217 code used when formatting amounts.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_tax_rate_bps() -> u32 {
    1500
}

fn default_shipping_fee() -> i64 {
    2500
}

fn default_free_shipping_threshold() -> i64 {
    20000
}

fn default_currency() -> String {
    "SAR".to_string()
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            tax_rate_bps: default_tax_rate_bps(),
            shipping_fee: default_shipping_fee(),
            free_shipping_threshold: default_free_shipping_threshold(),
            currency: default_currency(),
        }
    }
}

impl PricingSettings {
    pub fn policy(&self) -> PricingPolicy {
        PricingPolicy {
            tax_rate: TaxRate::from_bps(self.tax_rate_bps),
            shipping_fee: Money::from_minor(self.shipping_fee),
            free_shipping_threshold: Money::from_minor(self.free_shipping_threshold),
        }
    }
}

// =============================================================================
// Store Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub pricing: PricingSettings,
}

impl StoreConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading store config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load store config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> StoreResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StoreError::InvalidConfig("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Store config saved");
        Ok(())
    }

    pub fn validate(&self) -> StoreResult<()> {
        let storage = &self.storage;
        if storage.cart_key.trim().is_empty() || storage.history_key.trim().is_empty() {
            return Err(StoreError::InvalidConfig(
                "cart_key and history_key must not be empty".into(),
            ));
        }
        if storage.cart_key == storage.history_key {
            return Err(StoreError::InvalidConfig(format!(
                "cart_key and history_key must differ, both are '{}'",
                storage.cart_key
            )));
        }

        let pricing = &self.pricing;
        if pricing.tax_rate_bps > 10000 {
            return Err(StoreError::InvalidConfig(format!(
                "tax_rate_bps must be at most 10000, got {}",
                pricing.tax_rate_bps
            )));
        }
        if pricing.shipping_fee < 0 || pricing.free_shipping_threshold < 0 {
            return Err(StoreError::InvalidConfig(
                "shipping_fee and free_shipping_threshold must not be negative".into(),
            ));
        }

        Ok(())
    }

    /// Applies `SAYDALI_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("SAYDALI_DATA_DIR") {
            debug!(data_dir = %dir, "Overriding data dir from environment");
            self.storage.data_dir = Some(PathBuf::from(dir));
        }

        if let Some(key) = lookup("SAYDALI_CART_KEY") {
            self.storage.cart_key = key;
        }

        if let Some(key) = lookup("SAYDALI_HISTORY_KEY") {
            self.storage.history_key = key;
        }

        if let Some(rate) = lookup("SAYDALI_TAX_RATE") {
            match rate.parse::<f64>() {
                Ok(pct) => self.pricing.tax_rate_bps = TaxRate::from_percentage(pct).bps(),
                Err(_) => warn!(rate = %rate, "Ignoring unparseable SAYDALI_TAX_RATE"),
            }
        }

        if let Some(currency) = lookup("SAYDALI_CURRENCY") {
            self.pricing.currency = currency;
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "saydali", "storefront")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Resolved record directory.
    pub fn data_dir(&self) -> StoreResult<PathBuf> {
        if let Some(dir) = &self.storage.data_dir {
            return Ok(dir.clone());
        }
        directories::ProjectDirs::from("com", "saydali", "storefront")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| StoreError::InvalidConfig("Could not determine data directory".into()))
    }

    pub fn pricing_policy(&self) -> PricingPolicy {
        self.pricing.policy()
    }

    /// Formats an amount with the configured currency code, e.g. `SAR 12.50`.
    pub fn format_money(&self, amount: Money) -> String {
        format!("{} {}", self.pricing.currency, amount)
    }
}
