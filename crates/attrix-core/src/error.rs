//! Error types for the Attrix tracking subsystem.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire tracking subsystem.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait. Errors never cross the
/// tracker's public boundary — they are caught there, logged, and the
/// caller receives a degraded-but-usable result instead.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum AttrixError {
    /// Persistent storage (identity file, event cache, metrics) is
    /// unavailable or failed. Callers degrade to in-memory tracking.
    #[error("Storage unavailable: {message}")]
    StorageUnavailable { message: String },

    /// The collector rejected a delivery or was unreachable. The event
    /// stays queued for a later sync pass.
    #[error("Network failure: {message}")]
    Network {
        message: String,
        /// HTTP status, when the collector answered at all.
        status: Option<u16>,
    },

    /// Persisted data failed to parse or migrate. The affected aggregate
    /// is reset to its default state.
    #[error("Malformed stored data ({scope}): {message}")]
    MalformedData { scope: String, message: String },

    /// Segmentation was skipped because too few distinct metrics are
    /// available. A silent no-op, not a failure.
    #[error("Insufficient data: {available} of {needed} metric kinds available")]
    InsufficientData { needed: usize, available: usize },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AttrixError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a StorageUnavailable error
    pub fn storage_unavailable(message: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            message: message.into(),
        }
    }

    /// Creates a Network error without a status code
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            status: None,
        }
    }

    /// Creates a Network error carrying the collector's HTTP status
    pub fn network_status(message: impl Into<String>, status: u16) -> Self {
        Self::Network {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Creates a MalformedData error
    pub fn malformed(scope: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedData {
            scope: scope.into(),
            message: message.into(),
        }
    }

    /// Creates an InsufficientData error
    pub fn insufficient_data(needed: usize, available: usize) -> Self {
        Self::InsufficientData { needed, available }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a StorageUnavailable error
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. })
    }

    /// Check if this is a Network error
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Check if this is a MalformedData error
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedData { .. })
    }

    /// Check if this is an InsufficientData no-op rather than a real failure
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for AttrixError {
    fn from(err: std::io::Error) -> Self {
        Self::StorageUnavailable {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for AttrixError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedData {
            scope: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for AttrixError {
    fn from(err: toml::de::Error) -> Self {
        Self::MalformedData {
            scope: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for AttrixError {
    fn from(err: toml::ser::Error) -> Self {
        Self::MalformedData {
            scope: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (infrastructure layers report through this)
impl From<anyhow::Error> for AttrixError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, AttrixError>`.
pub type Result<T> = std::result::Result<T, AttrixError>;
