//! # Store Error Types
//!
//! Error types for storage, snapshot and configuration operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  io::Error / serde_json::Error / toml errors                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds context and categorization            │
//! │       │                                                                 │
//! │       ├── during a mutation → warn! + last_persist_error()             │
//! │       │                       (never returned to the UI)               │
//! │       │                                                                 │
//! │       ├── during rehydration → warn! + start empty                     │
//! │       │                                                                 │
//! │       └── config / flush / operator tool → returned as Err             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use saydali_core::CoreError;
use thiserror::Error;

/// Storage, snapshot and configuration errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Storage medium could not be read or written.
    ///
    /// ## When This Occurs
    /// - Data directory is read-only or the disk is full
    /// - File permissions changed under a running session
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Storage backend refused the write for its own reasons.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Record key is not usable as a storage name.
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    /// Snapshot could not be encoded or decoded.
    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot was written by a different schema version.
    #[error("Snapshot schema version {found} is not supported (expected {expected})")]
    SchemaVersion { found: u32, expected: u32 },

    /// Snapshot parsed but breaks a state invariant.
    #[error("Snapshot rejected: {0}")]
    Corrupt(#[from] CoreError),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to parse the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(#[from] toml::de::Error),

    /// Failed to render the config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(#[from] toml::ser::Error),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StoreError::SchemaVersion {
            found: 3,
            expected: 1,
        };
        assert_eq!(
            err.to_string(),
            "Snapshot schema version 3 is not supported (expected 1)"
        );

        let err = StoreError::InvalidKey("../etc".to_string());
        assert_eq!(err.to_string(), "Invalid storage key '../etc'");
    }

    #[test]
    fn test_core_error_converts() {
        let core = CoreError::InvariantViolated {
            reason: "duplicate".to_string(),
        };
        let err: StoreError = core.into();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }
}
