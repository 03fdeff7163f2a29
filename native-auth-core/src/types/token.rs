//! Signed tokens and their cached form.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A signed native auth token and the moment it stops being accepted.
///
/// Serialized as `{"token": "...", "expiryDate": "<RFC 3339>"}`, the same
/// shape the signer hands back, so it is stored verbatim.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeAuthToken {
    /// Encoded token presented to the server
    pub token: String,
    /// Instant after which the token is rejected
    pub expiry_date: DateTime<Utc>,
}

/// A token as persisted in a store.
pub type CachedTokenRecord = NativeAuthToken;

impl NativeAuthToken {
    /// Creates a token record.
    pub fn new(token: impl Into<String>, expiry_date: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expiry_date,
        }
    }

    /// Returns true if the token stays valid for at least `margin` after `now`.
    ///
    /// The boundary is inclusive: exactly `margin` remaining counts as fresh.
    /// If `now + margin` falls outside the representable range the token is
    /// not fresh.
    pub fn is_fresh(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        now.checked_add_signed(margin)
            .is_some_and(|deadline| deadline <= self.expiry_date)
    }

    /// Time left until expiry (negative once expired).
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        self.expiry_date - now
    }

    /// Serializes the record for storage.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a stored record.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

impl fmt::Debug for NativeAuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Tokens are bearer credentials: show size only
        f.debug_struct("NativeAuthToken")
            .field("token", &format_args!("[{} bytes]", self.token.len()))
            .field("expiry_date", &self.expiry_date)
            .finish()
    }
}
