//! # Validation Module
//!
//! Boundary checks for incoming snapshots and the quantity clamping rule.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Two Kinds of Bad Input                             │
//! │                                                                         │
//! │  Malformed snapshot (missing id/name, no stock)                        │
//! │  └── REJECTED with ValidationError: the caller has a bug               │
//! │                                                                         │
//! │  Out-of-range quantity (0, -3, 500 with stock 12)                      │
//! │  └── CLAMPED into 1..=stock: shoppers mistype, the cart never breaks   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Requires a non-blank string field.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a unit price snapshot. Zero is allowed (free samples).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Validates the stock ceiling. A product with no stock cannot be added.
pub fn validate_stock(count_in_stock: i64) -> ValidationResult<()> {
    if count_in_stock < 1 {
        return Err(ValidationError::MustBePositive {
            field: "countInStock".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Clamping
// =============================================================================

/// A quantity after clamping, and whether clamping changed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clamped {
    pub value: i64,
    pub clamped: bool,
}

/// Clamps a requested quantity into `1..=count_in_stock`.
///
/// `count_in_stock` below 1 is treated as 1 so the result is always a
/// valid quantity.
///
/// ## Example
/// ```rust
/// use saydali_core::validation::clamp_quantity;
///
/// assert_eq!(clamp_quantity(7, 3).value, 3);
/// assert_eq!(clamp_quantity(0, 3).value, 1);
/// assert!(!clamp_quantity(2, 3).clamped);
/// ```
pub fn clamp_quantity(requested: i64, count_in_stock: i64) -> Clamped {
    let value = requested.clamp(1, count_in_stock.max(1));
    Clamped {
        value,
        clamped: value != requested,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required() {
        assert!(validate_required("name", "كريم مرطب").is_ok());
        assert!(validate_required("name", "").is_err());
        assert!(validate_required("name", "   ").is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(Money::from_minor(1099)).is_ok());
        assert!(validate_price(Money::from_minor(-1)).is_err());
    }

    #[test]
    fn test_validate_stock() {
        assert!(validate_stock(1).is_ok());
        assert!(validate_stock(0).is_err());
        assert!(validate_stock(-4).is_err());
    }

    #[test]
    fn test_clamp_quantity() {
        assert_eq!(clamp_quantity(2, 3), Clamped { value: 2, clamped: false });
        assert_eq!(clamp_quantity(3, 3), Clamped { value: 3, clamped: false });
        assert_eq!(clamp_quantity(7, 3), Clamped { value: 3, clamped: true });
        assert_eq!(clamp_quantity(0, 3), Clamped { value: 1, clamped: true });
        assert_eq!(clamp_quantity(-5, 3), Clamped { value: 1, clamped: true });
        assert_eq!(clamp_quantity(i64::MAX, 10), Clamped { value: 10, clamped: true });
    }

    #[test]
    fn test_clamp_with_degenerate_stock() {
        assert_eq!(clamp_quantity(5, 0).value, 1);
    }
}
