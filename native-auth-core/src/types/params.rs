//! Signing parameters.
//!
//! [`RawParameters`] mirrors what the host form delivers (plain strings and
//! numbers). Converting it into [`RequestParameters`] is the single place where
//! validation happens, so an issuer never sees an invalid request.

use std::fmt;

use serde::Deserialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{
    API_URL_MAINNET, ENV_API_URL, ENV_EXPIRY_SECONDS, ENV_HOST, ENV_PRIVATE_KEY, ENV_SHARD,
    EXPIRY_SECONDS_DEFAULT, SHARD_UNSPECIFIED,
};
use crate::error::{NativeAuthError, Result};
use crate::types::{Network, Shard};

// ═══════════════════════════════════════════════════════════════════════════════
// PRIVATE KEY
// ═══════════════════════════════════════════════════════════════════════════════

/// PEM-encoded private key.
///
/// Zeroized on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(String);

impl PrivateKey {
    /// Wraps PEM content.
    pub fn new(pem: impl Into<String>) -> Self {
        Self(pem.into())
    }

    /// Returns the PEM content.
    ///
    /// # Security
    /// Only hand this to the signer; do not log or persist it.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Returns true if the key holds no non-whitespace content.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey([REDACTED])")
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REQUEST PARAMETERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Validated parameters for one token issuance.
///
/// Immutable once constructed: host and private key are non-blank and the
/// expiry is positive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestParameters {
    host: String,
    network: Network,
    shard: Shard,
    expiry_seconds: u64,
    private_key: PrivateKey,
}

impl RequestParameters {
    /// Creates validated request parameters.
    ///
    /// # Errors
    /// Returns `InvalidParameter` if the host or private key is blank, or the
    /// expiry is zero.
    pub fn new(
        host: impl Into<String>,
        network: Network,
        shard: Shard,
        expiry_seconds: u64,
        private_key: PrivateKey,
    ) -> Result<Self> {
        let host = host.into();
        if host.trim().is_empty() {
            return Err(NativeAuthError::missing("host"));
        }
        if private_key.is_blank() {
            return Err(NativeAuthError::missing("privateKey"));
        }
        if expiry_seconds == 0 {
            return Err(NativeAuthError::invalid("expirySeconds", "must be positive"));
        }

        Ok(Self {
            host,
            network,
            shard,
            expiry_seconds,
            private_key,
        })
    }

    /// Origin the token is issued for.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Network the token is anchored to.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Shard constraint for the anchoring block.
    pub fn shard(&self) -> Shard {
        self.shard
    }

    /// Requested token lifetime in seconds.
    pub fn expiry_seconds(&self) -> u64 {
        self.expiry_seconds
    }

    /// Signing key.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }
}

impl TryFrom<RawParameters> for RequestParameters {
    type Error = NativeAuthError;

    fn try_from(mut raw: RawParameters) -> Result<Self> {
        // Required fields are checked before anything is parsed so a blank form
        // reports the missing field rather than a downstream parse error.
        if raw.host.trim().is_empty() {
            return Err(NativeAuthError::missing("host"));
        }
        if raw.private_key.trim().is_empty() {
            return Err(NativeAuthError::missing("privateKey"));
        }

        let network: Network = raw.api_url.parse()?;
        let shard: Shard = raw.shard.parse()?;

        RequestParameters::new(
            std::mem::take(&mut raw.host),
            network,
            shard,
            raw.expiry_seconds,
            PrivateKey::new(std::mem::take(&mut raw.private_key)),
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RAW PARAMETERS
// ═══════════════════════════════════════════════════════════════════════════════

fn default_api_url() -> String {
    API_URL_MAINNET.to_string()
}

fn default_shard() -> String {
    SHARD_UNSPECIFIED.to_string()
}

fn default_expiry_seconds() -> u64 {
    EXPIRY_SECONDS_DEFAULT
}

/// Unvalidated parameters in the shape the host form delivers them.
///
/// Field names follow the host's camelCase JSON. Missing optional fields take
/// their defaults: mainnet, no shard, 24 hour lifetime.
#[derive(Clone, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct RawParameters {
    /// Requesting origin
    #[serde(default)]
    pub host: String,
    /// Network endpoint URL or short name
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Shard id, or `-` for unspecified
    #[serde(default = "default_shard")]
    pub shard: String,
    /// Token lifetime in seconds
    #[serde(default = "default_expiry_seconds")]
    pub expiry_seconds: u64,
    /// PEM private key
    #[serde(default)]
    pub private_key: String,
}

impl Default for RawParameters {
    fn default() -> Self {
        Self {
            host: String::new(),
            api_url: default_api_url(),
            shard: default_shard(),
            expiry_seconds: default_expiry_seconds(),
            private_key: String::new(),
        }
    }
}

impl RawParameters {
    /// Creates raw parameters with defaults for everything but host and key.
    pub fn new(host: impl Into<String>, private_key: impl Into<String>) -> Self {
        // Drop impl from ZeroizeOnDrop rules out struct update syntax.
        let mut raw = Self::default();
        raw.host = host.into();
        raw.private_key = private_key.into();
        raw
    }

    /// Reads parameters from `NATIVE_AUTH_*` environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    /// Returns `InvalidParameter` if the expiry variable is not an integer.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut raw = Self::default();
        if let Ok(host) = std::env::var(ENV_HOST) {
            raw.host = host;
        }
        if let Ok(api_url) = std::env::var(ENV_API_URL) {
            raw.api_url = api_url;
        }
        if let Ok(shard) = std::env::var(ENV_SHARD) {
            raw.shard = shard;
        }
        if let Ok(expiry) = std::env::var(ENV_EXPIRY_SECONDS) {
            raw.expiry_seconds = expiry.trim().parse().map_err(|_| {
                NativeAuthError::invalid("expirySeconds", format!("expected an integer, got '{}'", expiry))
            })?;
        }
        if let Ok(private_key) = std::env::var(ENV_PRIVATE_KEY) {
            raw.private_key = private_key;
        }

        Ok(raw)
    }
}

impl fmt::Debug for RawParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawParameters")
            .field("host", &self.host)
            .field("api_url", &self.api_url)
            .field("shard", &self.shard)
            .field("expiry_seconds", &self.expiry_seconds)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}
