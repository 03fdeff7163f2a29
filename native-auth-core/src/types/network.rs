//! Networks and shards the signer can anchor a token to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    API_URL_DEVNET, API_URL_MAINNET, API_URL_TESTNET, SHARD_METACHAIN, SHARD_UNSPECIFIED,
};
use crate::error::{NativeAuthError, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// NETWORK
// ═══════════════════════════════════════════════════════════════════════════════

/// Blockchain network whose API the signer fetches the latest block from.
///
/// Serialized as its API endpoint URL.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Network {
    /// Development network
    Devnet,
    /// Public test network
    Testnet,
    /// Production network
    #[default]
    Mainnet,
}

impl Network {
    /// All known networks.
    pub const ALL: [Network; 3] = [Network::Devnet, Network::Testnet, Network::Mainnet];

    /// Returns the API endpoint URL.
    pub fn api_url(&self) -> &'static str {
        match self {
            Network::Devnet => API_URL_DEVNET,
            Network::Testnet => API_URL_TESTNET,
            Network::Mainnet => API_URL_MAINNET,
        }
    }

    /// Returns the short lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Network::Devnet => "devnet",
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_url())
    }
}

impl FromStr for Network {
    type Err = NativeAuthError;

    /// Accepts either the endpoint URL (trailing slash tolerated) or the short name.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().trim_end_matches('/').to_lowercase();
        if normalized.is_empty() {
            return Err(NativeAuthError::missing("apiUrl"));
        }

        Network::ALL
            .into_iter()
            .find(|n| n.api_url() == normalized || n.name() == normalized)
            .ok_or_else(|| {
                NativeAuthError::invalid("apiUrl", format!("unknown network endpoint '{}'", s.trim()))
            })
    }
}

impl TryFrom<String> for Network {
    type Error = NativeAuthError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Network> for String {
    fn from(network: Network) -> Self {
        network.api_url().to_string()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SHARD
// ═══════════════════════════════════════════════════════════════════════════════

/// Shard the latest block is fetched from.
///
/// `Unspecified` leaves the choice to the network API and is never equal to
/// any explicit shard, including shard 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Shard {
    /// No shard constraint
    #[default]
    Unspecified,
    /// Explicit shard identifier
    Id(u32),
}

impl Shard {
    /// The metachain.
    pub const METACHAIN: Shard = Shard::Id(SHARD_METACHAIN);

    /// Returns the shard identifier, or `None` when unspecified.
    pub fn id(&self) -> Option<u32> {
        match self {
            Shard::Unspecified => None,
            Shard::Id(id) => Some(*id),
        }
    }

    /// Returns true if this is the metachain.
    pub fn is_metachain(&self) -> bool {
        *self == Shard::METACHAIN
    }
}

impl From<Option<u32>> for Shard {
    fn from(id: Option<u32>) -> Self {
        id.map_or(Shard::Unspecified, Shard::Id)
    }
}

impl fmt::Display for Shard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shard::Unspecified => f.write_str(SHARD_UNSPECIFIED),
            Shard::Id(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for Shard {
    type Err = NativeAuthError;

    /// Parses `-` (or an empty value) as unspecified, anything else as a shard id.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed == SHARD_UNSPECIFIED {
            return Ok(Shard::Unspecified);
        }

        trimmed.parse::<u32>().map(Shard::Id).map_err(|_| {
            NativeAuthError::invalid("shard", format!("expected an integer or '-', got '{}'", trimmed))
        })
    }
}
