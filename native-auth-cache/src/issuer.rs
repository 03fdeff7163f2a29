//! Cache-backed token issuer.

use chrono::{DateTime, Utc};
use tracing::{debug, instrument, warn};

use native_auth_core::error::Result;
use native_auth_core::traits::{Clock, SystemClock, TokenSigner, TokenStore};
use native_auth_core::types::{CacheKey, CachedTokenRecord, RawParameters, RequestParameters};

use crate::config::IssuerConfig;

/// State of the cached token for one cache key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheStatus {
    /// Nothing stored (or the store could not be read)
    Missing,
    /// Something stored that is not a token record
    Corrupt,
    /// A token that expires within the freshness margin
    Stale {
        /// When the cached token expires
        expiry_date: DateTime<Utc>,
    },
    /// A token that can be reused
    Fresh {
        /// When the cached token expires
        expiry_date: DateTime<Utc>,
    },
}

impl CacheStatus {
    /// Classifies a raw stored value.
    pub fn classify(raw: Option<&str>, now: DateTime<Utc>, config: &IssuerConfig) -> Self {
        match raw.map(CachedTokenRecord::from_json) {
            None => CacheStatus::Missing,
            Some(Err(_)) => CacheStatus::Corrupt,
            Some(Ok(record)) => Self::of_record(&record, now, config),
        }
    }

    /// Classifies a parsed record as fresh or stale.
    pub fn of_record(record: &CachedTokenRecord, now: DateTime<Utc>, config: &IssuerConfig) -> Self {
        let expiry_date = record.expiry_date;
        if config.accepts(record, now) {
            CacheStatus::Fresh { expiry_date }
        } else {
            CacheStatus::Stale { expiry_date }
        }
    }

    /// Returns true if the cached token would be reused.
    pub fn is_fresh(&self) -> bool {
        matches!(self, CacheStatus::Fresh { .. })
    }
}

/// Result of reading one key from the store.
enum Cached {
    Missing,
    Corrupt,
    Record(CachedTokenRecord),
}

/// Issues native auth tokens, reusing stored ones while they stay fresh.
///
/// # Flow
/// 1. Derive the cache key from the request parameters
/// 2. Read the stored record for that key
/// 3. Return its token if it is valid for at least the freshness margin
/// 4. Otherwise sign a new token, store it under the same key, return it
///
/// Store failures never fail an issuance: a failed or corrupt read counts as
/// a miss, and a failed write still returns the freshly signed token. Signer
/// failures propagate unchanged.
///
/// Concurrent calls for the same key are not deduplicated; both may sign and
/// the last write wins.
pub struct TokenIssuer<S, G, C = SystemClock> {
    store: S,
    signer: G,
    clock: C,
    config: IssuerConfig,
}

impl<S, G> TokenIssuer<S, G, SystemClock> {
    /// Creates an issuer using the wall clock and default configuration.
    pub fn new(store: S, signer: G) -> Self {
        Self::with_clock(store, signer, SystemClock)
    }
}

impl<S, G, C> TokenIssuer<S, G, C> {
    /// Creates an issuer with a custom time source.
    pub fn with_clock(store: S, signer: G, clock: C) -> Self {
        Self {
            store,
            signer,
            clock,
            config: IssuerConfig::default(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: IssuerConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &IssuerConfig {
        &self.config
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S, G, C> TokenIssuer<S, G, C>
where
    S: TokenStore,
    C: Clock,
{
    /// Reports the cached state for the given parameters without signing or writing.
    ///
    /// Needs no signer, so a read-only issuer can be built with `()` in its place.
    #[instrument(skip_all, fields(host = %params.host()))]
    pub async fn lookup(&self, params: &RequestParameters) -> CacheStatus {
        let key = CacheKey::derive(params);
        let now = self.clock.now();

        match self.read(&key).await {
            Cached::Missing => CacheStatus::Missing,
            Cached::Corrupt => CacheStatus::Corrupt,
            Cached::Record(record) => CacheStatus::of_record(&record, now, &self.config),
        }
    }

    async fn read(&self, key: &CacheKey) -> Cached {
        let raw = match self.store.get_item(key.as_str()).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Cached::Missing,
            Err(e) => {
                warn!(key = %key, error = %e, "Token store read failed, treating as miss");
                return Cached::Missing;
            }
        };

        match CachedTokenRecord::from_json(&raw) {
            Ok(record) => Cached::Record(record),
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding corrupt cached token record");
                Cached::Corrupt
            }
        }
    }
}

impl<S, G, C> TokenIssuer<S, G, C>
where
    S: TokenStore,
    G: TokenSigner,
    C: Clock,
{
    /// Returns a token for the given parameters.
    ///
    /// # Errors
    /// Returns the signer's error (`BlockFetchFailed` or `SigningFailed`)
    /// when a new token is needed and signing fails. Nothing is written then.
    #[instrument(
        skip_all,
        fields(
            host = %params.host(),
            network = params.network().name(),
            shard = %params.shard(),
            expiry_seconds = params.expiry_seconds(),
        )
    )]
    pub async fn issue_token(&self, params: &RequestParameters) -> Result<String> {
        let key = CacheKey::derive(params);
        let now = self.clock.now();

        match self.read(&key).await {
            Cached::Record(record) if self.config.accepts(&record, now) => {
                debug!(key = %key, expiry_date = %record.expiry_date, "Cache hit");
                return Ok(record.token);
            }
            Cached::Record(record) => {
                debug!(
                    key = %key,
                    remaining_seconds = record.remaining(now).num_seconds(),
                    "Cached token stale"
                );
            }
            Cached::Corrupt => debug!(key = %key, "Cached record unreadable, reissuing"),
            Cached::Missing => debug!(key = %key, "Cache miss"),
        }

        let fresh = self.signer.sign(params).await?;
        debug!(key = %key, expiry_date = %fresh.expiry_date, "Signed new token");

        self.persist(&key, &fresh).await;

        Ok(fresh.token)
    }

    /// Validates host-form parameters and issues a token for them.
    ///
    /// # Errors
    /// Returns `InvalidParameter` before touching the store or signer if the
    /// parameters are invalid; otherwise as [`issue_token`](Self::issue_token).
    pub async fn issue_from_raw(&self, raw: RawParameters) -> Result<String> {
        let params = RequestParameters::try_from(raw)?;
        self.issue_token(&params).await
    }

    async fn persist(&self, key: &CacheKey, record: &CachedTokenRecord) {
        let serialized = match record.to_json() {
            Ok(serialized) => serialized,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to serialize token record");
                return;
            }
        };

        if let Err(e) = self.store.set_item(key.as_str(), serialized).await {
            warn!(key = %key, error = %e, "Failed to persist token, returning it uncached");
        }
    }
}
