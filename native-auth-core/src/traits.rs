//! Common traits for native auth.
//!
//! The issuer is written against these seams so the host's store, the
//! signing capability and the wall clock can each be swapped out, most
//! importantly for in-memory fakes in tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::types::{NativeAuthToken, RequestParameters};

// ═══════════════════════════════════════════════════════════════════════════════
// STORE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Asynchronous key-value persistence for serialized token records.
///
/// Implementations might use:
/// - In-memory storage (for testing/development)
/// - A JSON file (single-user tools)
/// - The host application's own plugin store
///
/// Only single-operation atomicity is assumed.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: String) -> Result<()>;
}

#[async_trait]
impl<T: TokenStore + ?Sized> TokenStore for Arc<T> {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key).await
    }

    async fn set_item(&self, key: &str, value: String) -> Result<()> {
        (**self).set_item(key, value).await
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SIGNER TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Produces signed native auth tokens.
///
/// # Contract
/// The returned token's validity window is `expiry_seconds` from the moment
/// of signing, anchored to the latest block fetched from the parameters'
/// network (restricted to the shard when one is given). Any fetch failure is
/// reported as `BlockFetchFailed`, any signing failure as `SigningFailed`.
#[async_trait]
pub trait TokenSigner: Send + Sync {
    /// Signs a fresh token for the given parameters.
    async fn sign(&self, params: &RequestParameters) -> Result<NativeAuthToken>;
}

#[async_trait]
impl<T: TokenSigner + ?Sized> TokenSigner for Arc<T> {
    async fn sign(&self, params: &RequestParameters) -> Result<NativeAuthToken> {
        (**self).sign(params).await
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLOCK TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Source of the current time for freshness checks.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
