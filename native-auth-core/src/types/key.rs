//! Cache key derivation.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::types::RequestParameters;

/// Number of leading key characters shown in logs and `Debug` output.
const VISIBLE_PREFIX_LEN: usize = 12;

/// Store key for a set of request parameters.
///
/// Base64 of `host:apiUrl:expirySeconds:privateKey:shard`, where an
/// unspecified shard renders as the empty string. The same parameters always
/// give the same key, and changing any single field changes the key.
///
/// The private key is recoverable from the key, so only a short prefix is
/// ever displayed.
#[derive(Clone, PartialEq, Eq, Hash, Zeroize, ZeroizeOnDrop)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives the key for the given parameters.
    pub fn derive(params: &RequestParameters) -> Self {
        let shard = params
            .shard()
            .id()
            .map(|id| id.to_string())
            .unwrap_or_default();

        let joined = Zeroizing::new(format!(
            "{}:{}:{}:{}:{}",
            params.host(),
            params.network().api_url(),
            params.expiry_seconds(),
            params.private_key().expose_secret(),
            shard,
        ));

        Self(STANDARD.encode(joined.as_bytes()))
    }

    /// Wraps a key read back from a store.
    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the full key for store access.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a short, non-sensitive prefix for logs.
    pub fn redacted(&self) -> String {
        let prefix: String = self.0.chars().take(VISIBLE_PREFIX_LEN).collect();
        format!("{}…", prefix)
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CacheKey({})", self.redacted())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}
