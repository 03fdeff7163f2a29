//! Issuer configuration.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use native_auth_core::constants::FRESHNESS_MARGIN_SECONDS;
use native_auth_core::types::CachedTokenRecord;

/// Issuer configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssuerConfig {
    /// Minimum remaining validity, in seconds, for a cached token to be reused
    pub freshness_margin_seconds: i64,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            freshness_margin_seconds: FRESHNESS_MARGIN_SECONDS,
        }
    }
}

impl IssuerConfig {
    /// Sets the freshness margin.
    pub fn with_freshness_margin(mut self, seconds: i64) -> Self {
        self.freshness_margin_seconds = seconds;
        self
    }

    /// Freshness margin as a duration, or `None` if it does not fit one.
    pub fn freshness_margin(&self) -> Option<Duration> {
        Duration::try_seconds(self.freshness_margin_seconds)
    }

    /// Returns true if `record` may be reused at `now`.
    ///
    /// A margin too large to represent never accepts a record.
    pub fn accepts(&self, record: &CachedTokenRecord, now: DateTime<Utc>) -> bool {
        self.freshness_margin()
            .is_some_and(|margin| record.is_fresh(now, margin))
    }
}
