//! # Domain Types
//!
//! Snapshot types handed between the catalog, the stores and the UI.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Catalog collaborator          Cart store            History store      │
//! │  ┌─────────────────┐   ┌───────────────────┐   ┌────────────────────┐  │
//! │  │ CatalogProduct  │──►│  CartItemInput    │   │ HistoryEntryInput  │  │
//! │  │  images[]       │   │  (no client id)   │   │  (no timestamp)    │  │
//! │  │  colors[]       │   └─────────┬─────────┘   └─────────┬──────────┘  │
//! │  │  sizes[]        │             ▼                       ▼             │
//! │  │  price          │   ┌───────────────────┐   ┌────────────────────┐  │
//! │  │  countInStock   │   │  CartLineItem     │   │ BrowsingHistoryItem│  │
//! │  └─────────────────┘   │  clientId         │   │  timestamp (ms)    │  │
//! │                        │  quantity         │   └────────────────────┘  │
//! │                        └───────────────────┘                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Everything the cart shows (name, image, price, stock ceiling) is copied at
//! add-time. Later catalog edits do not reach items already in a cart.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::{validate_price, validate_required, validate_stock};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate in basis points (1500 = 15%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (`15.0` → 1500 bps).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Client Id
// =============================================================================

/// Opaque line-item identifier assigned by the cart at insertion time.
///
/// Built from product id, variant and creation instant, e.g.
/// `p1:red::1718000000000`. Callers must treat it as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct ClientId(String);

impl ClientId {
    /// Builds the id for a new line item.
    pub fn generate(product_id: &str, color: &str, size: &str, created_at_ms: i64) -> Self {
        ClientId(format!("{product_id}:{color}:{size}:{created_at_ms}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ClientId {
    fn from(value: String) -> Self {
        ClientId(value)
    }
}

impl From<&str> for ClientId {
    fn from(value: &str) -> Self {
        ClientId(value.to_string())
    }
}

// =============================================================================
// Catalog Product
// =============================================================================

/// A product as the catalog collaborator hands it over on the product page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CatalogProduct {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub images: Vec<String>,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub price: Money,
    pub count_in_stock: i64,
}

impl CatalogProduct {
    /// Checks whether a variant attribute value is offered.
    ///
    /// An empty choice means "no variant" and is always accepted.
    fn offers(options: &[String], choice: &str) -> bool {
        choice.is_empty() || options.iter().any(|o| o == choice)
    }
}

// =============================================================================
// Cart Item Input
// =============================================================================

/// A fully-populated line-item snapshot, minus the client id the cart assigns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItemInput {
    pub product_id: String,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub image: String,
    pub price: Money,
    /// Chosen color, empty when the product has no color variant.
    pub color: String,
    /// Chosen size, empty when the product has no size variant.
    pub size: String,
    pub count_in_stock: i64,
}

impl CartItemInput {
    /// Snapshots a catalog product with the shopper's variant choice.
    ///
    /// ## Errors
    /// - `CoreError::UnknownVariant` if `color`/`size` is not offered
    /// - `CoreError::Validation` if the product itself is malformed
    pub fn from_catalog(product: &CatalogProduct, color: &str, size: &str) -> CoreResult<Self> {
        for (attribute, options, choice) in [
            ("color", &product.colors, color),
            ("size", &product.sizes, size),
        ] {
            if !CatalogProduct::offers(options, choice) {
                return Err(CoreError::UnknownVariant {
                    product_id: product.id.clone(),
                    attribute: attribute.to_string(),
                    value: choice.to_string(),
                });
            }
        }

        let input = CartItemInput {
            product_id: product.id.clone(),
            name: product.name.clone(),
            slug: product.slug.clone(),
            category: product.category.clone(),
            image: product.images.first().cloned().unwrap_or_default(),
            price: product.price,
            color: color.to_string(),
            size: size.to_string(),
            count_in_stock: product.count_in_stock,
        };
        input.validate()?;
        Ok(input)
    }

    /// Rejects snapshots the cart cannot hold.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_required("productId", &self.product_id)?;
        validate_required("name", &self.name)?;
        validate_price(self.price)?;
        validate_stock(self.count_in_stock)?;
        Ok(())
    }
}

// =============================================================================
// Cart Line Item
// =============================================================================

/// One cart entry: a unique product + variant combination and its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLineItem {
    pub client_id: ClientId,
    pub product_id: String,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub image: String,
    /// Unit price frozen at add-time.
    pub price: Money,
    pub color: String,
    pub size: String,
    /// Always within `1..=count_in_stock`.
    pub quantity: i64,
    /// Stock ceiling frozen at add-time.
    pub count_in_stock: i64,
}

impl CartLineItem {
    pub(crate) fn from_input(input: CartItemInput, client_id: ClientId, quantity: i64) -> Self {
        CartLineItem {
            client_id,
            product_id: input.product_id,
            name: input.name,
            slug: input.slug,
            category: input.category,
            image: input.image,
            price: input.price,
            color: input.color,
            size: input.size,
            quantity,
            count_in_stock: input.count_in_stock,
        }
    }

    /// True when this item is the `(product, color, size)` combination.
    pub fn is_variant(&self, product_id: &str, color: &str, size: &str) -> bool {
        self.product_id == product_id && self.color == color && self.size == size
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Browsing History
// =============================================================================

/// A viewed-product snapshot, minus the timestamp the history assigns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct HistoryEntryInput {
    pub id: String,
    pub category: String,
    pub name: String,
    pub image: String,
    pub slug: String,
}

impl HistoryEntryInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_required("id", &self.id)?;
        validate_required("name", &self.name)?;
        Ok(())
    }
}

impl From<&CatalogProduct> for HistoryEntryInput {
    fn from(product: &CatalogProduct) -> Self {
        HistoryEntryInput {
            id: product.id.clone(),
            category: product.category.clone(),
            name: product.name.clone(),
            image: product.images.first().cloned().unwrap_or_default(),
            slug: product.slug.clone(),
        }
    }
}

/// One entry of the recently-viewed list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BrowsingHistoryItem {
    pub id: String,
    pub category: String,
    pub name: String,
    pub image: String,
    pub slug: String,
    /// Insertion/refresh time, epoch milliseconds.
    pub timestamp: i64,
}

impl BrowsingHistoryItem {
    pub(crate) fn from_input(input: HistoryEntryInput, timestamp: i64) -> Self {
        BrowsingHistoryItem {
            id: input.id,
            category: input.category,
            name: input.name,
            image: input.image,
            slug: input.slug,
            timestamp,
        }
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn panadol() -> CatalogProduct {
        CatalogProduct {
            id: "p-panadol".to_string(),
            name: "بانادول اكسترا".to_string(),
            slug: "panadol-extra".to_string(),
            category: "مسكنات".to_string(),
            images: vec!["/img/panadol-1.jpg".to_string(), "/img/panadol-2.jpg".to_string()],
            colors: vec![],
            sizes: vec!["24".to_string(), "48".to_string()],
            price: Money::from_major_minor(18, 50),
            count_in_stock: 12,
        }
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        let rate = TaxRate::from_percentage(15.0);
        assert_eq!(rate.bps(), 1500);
        assert!((rate.percentage() - 15.0).abs() < 0.001);
    }

    #[test]
    fn test_client_id_shape() {
        let id = ClientId::generate("p1", "red", "", 1_718_000_000_000);
        assert_eq!(id.as_str(), "p1:red::1718000000000");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"p1:red::1718000000000\"");
    }

    #[test]
    fn test_from_catalog_takes_first_image() {
        let input = CartItemInput::from_catalog(&panadol(), "", "48").unwrap();
        assert_eq!(input.image, "/img/panadol-1.jpg");
        assert_eq!(input.size, "48");
        assert_eq!(input.color, "");
        assert_eq!(input.count_in_stock, 12);
    }

    #[test]
    fn test_from_catalog_rejects_unknown_variant() {
        let err = CartItemInput::from_catalog(&panadol(), "blue", "").unwrap_err();
        assert!(matches!(err, CoreError::UnknownVariant { ref attribute, .. } if attribute == "color"));

        let err = CartItemInput::from_catalog(&panadol(), "", "96").unwrap_err();
        assert!(matches!(err, CoreError::UnknownVariant { ref attribute, .. } if attribute == "size"));
    }

    #[test]
    fn test_from_catalog_rejects_out_of_stock() {
        let mut product = panadol();
        product.count_in_stock = 0;
        let err = CartItemInput::from_catalog(&product, "", "").unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::MustBePositive { .. })));
    }

    #[test]
    fn test_line_item_wire_shape_is_camel_case() {
        let input = CartItemInput::from_catalog(&panadol(), "", "24").unwrap();
        let item = CartLineItem::from_input(input, ClientId::from("x"), 2);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["clientId"], "x");
        assert_eq!(json["productId"], "p-panadol");
        assert_eq!(json["countInStock"], 12);
        assert_eq!(json["price"], 1850);
        assert_eq!(item.line_total().minor(), 3700);
    }

    #[test]
    fn test_history_entry_from_catalog() {
        let entry = HistoryEntryInput::from(&panadol());
        assert_eq!(entry.id, "p-panadol");
        assert_eq!(entry.image, "/img/panadol-1.jpg");
        assert!(entry.validate().is_ok());
    }
}
