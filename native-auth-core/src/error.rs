//! Error types for native auth.
//!
//! Messages never carry private key material or full cache keys; callers
//! pass redacted identifiers only.

use thiserror::Error;

/// Result type alias using `NativeAuthError`.
pub type Result<T> = std::result::Result<T, NativeAuthError>;

/// Main error type for all native auth operations.
#[derive(Debug, Error)]
pub enum NativeAuthError {
    // ═══════════════════════════════════════════════════════════════════════════
    // PARAMETER ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// A request parameter is missing or malformed.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Name of the offending parameter
        name: &'static str,
        /// What is wrong with it
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // SIGNING ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The latest block could not be fetched from the network API.
    #[error("Block metadata fetch from '{api_url}' failed: {reason}")]
    BlockFetchFailed {
        /// Endpoint that was queried
        api_url: String,
        /// Underlying failure
        reason: String,
    },

    /// The token could not be signed.
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // STORE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Reading from the token store failed.
    #[error("Store read failed: {0}")]
    StoreRead(String),

    /// Writing to the token store failed.
    #[error("Store write failed: {0}")]
    StoreWrite(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // INTERNAL ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Internal invariant violation (should never happen).
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl NativeAuthError {
    /// Shorthand for a missing required parameter.
    pub fn missing(name: &'static str) -> Self {
        NativeAuthError::InvalidParameter {
            name,
            reason: "required".into(),
        }
    }

    /// Shorthand for a malformed parameter.
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        NativeAuthError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Returns true if retrying the whole issuance may succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            NativeAuthError::BlockFetchFailed { .. }
                | NativeAuthError::StoreRead(_)
                | NativeAuthError::StoreWrite(_)
                | NativeAuthError::IoError(_)
        )
    }

    /// Returns true if this error came from the signer.
    pub fn is_signing_error(&self) -> bool {
        matches!(
            self,
            NativeAuthError::BlockFetchFailed { .. } | NativeAuthError::SigningFailed(_)
        )
    }

    /// Returns true if this is a validation error.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, NativeAuthError::InvalidParameter { .. })
    }
}
