//! # Error Types
//!
//! Domain-specific error types for saydali-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  saydali-core errors (this file)                                       │
//! │  ├── CoreError        - Boundary failures, broken rehydrated state     │
//! │  └── ValidationError  - Individual field checks                        │
//! │                                                                         │
//! │  saydali-store errors (separate crate)                                 │
//! │  └── StoreError       - Storage / config failures (logged, not raised) │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → caller (programmer error)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What is NOT an error here
//! Out-of-range quantities are clamped and unknown ids are no-ops. Only a
//! snapshot that is missing required data is rejected, because it means the
//! catalog collaborator handed over something the cart cannot display.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core state errors.
///
/// Raised where a collaborator hands data to a store, or where a persisted
/// snapshot is checked before it replaces the empty state.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The chosen variant is not one the product offers.
    ///
    /// ## When This Occurs
    /// - Product page posts a color that was removed from the catalog
    /// - A size is sent for a product that has no sizes
    #[error("Product {product_id} does not offer {attribute} '{value}'")]
    UnknownVariant {
        product_id: String,
        attribute: String,
        value: String,
    },

    /// A rehydrated state breaks one of its own invariants.
    ///
    /// ## When This Occurs
    /// - A persisted cart holds two items for the same variant
    /// - A persisted history holds more than 20 entries
    /// - Someone hand-edited the storage record
    #[error("State invariant violated: {reason}")]
    InvariantViolated { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field validation errors for incoming snapshots.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::UnknownVariant {
            product_id: "p1".to_string(),
            attribute: "color".to_string(),
            value: "purple".to_string(),
        };
        assert_eq!(err.to_string(), "Product p1 does not offer color 'purple'");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "productId".to_string(),
        };
        assert_eq!(err.to_string(), "productId is required");

        let err = ValidationError::MustBePositive {
            field: "countInStock".to_string(),
        };
        assert_eq!(err.to_string(), "countInStock must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
