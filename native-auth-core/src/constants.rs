//! Protocol constants for native auth.
//!
//! Network endpoints and shard identifiers are signing-network concerns: the
//! signer anchors every token to the latest block fetched from one of these
//! endpoints. The issuer only passes them through.

// ═══════════════════════════════════════════════════════════════════════════════
// NETWORK ENDPOINTS
// ═══════════════════════════════════════════════════════════════════════════════

/// API endpoint of the devnet network.
pub const API_URL_DEVNET: &str = "https://devnet-api.elrond.com";

/// API endpoint of the testnet network.
pub const API_URL_TESTNET: &str = "https://testnet-api.elrond.com";

/// API endpoint of the mainnet network.
pub const API_URL_MAINNET: &str = "https://api.elrond.com";

// ═══════════════════════════════════════════════════════════════════════════════
// SHARD IDENTIFIERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Sentinel meaning "no shard constraint".
pub const SHARD_UNSPECIFIED: &str = "-";

/// Shard 0.
pub const SHARD_0: u32 = 0;

/// Shard 1.
pub const SHARD_1: u32 = 1;

/// Shard 2.
pub const SHARD_2: u32 = 2;

/// Identifier of the metachain, the coordinating chain.
pub const SHARD_METACHAIN: u32 = u32::MAX;

// ═══════════════════════════════════════════════════════════════════════════════
// TOKEN LIFETIME
// ═══════════════════════════════════════════════════════════════════════════════

/// Default requested token lifetime (24 hours).
pub const EXPIRY_SECONDS_DEFAULT: u64 = 60 * 60 * 24;

/// A cached token must stay valid at least this long to be reused.
///
/// Guards against handing out a token that expires while the request using
/// it is still in flight.
pub const FRESHNESS_MARGIN_SECONDS: i64 = 60;

// ═══════════════════════════════════════════════════════════════════════════════
// ENVIRONMENT
// ═══════════════════════════════════════════════════════════════════════════════

/// Environment variable holding the requesting host.
pub const ENV_HOST: &str = "NATIVE_AUTH_HOST";

/// Environment variable holding the network API URL (or network name).
pub const ENV_API_URL: &str = "NATIVE_AUTH_API_URL";

/// Environment variable holding the shard (`-` for unspecified).
pub const ENV_SHARD: &str = "NATIVE_AUTH_SHARD";

/// Environment variable holding the token lifetime in seconds.
pub const ENV_EXPIRY_SECONDS: &str = "NATIVE_AUTH_EXPIRY_SECONDS";

/// Environment variable holding the PEM private key.
pub const ENV_PRIVATE_KEY: &str = "NATIVE_AUTH_PRIVATE_KEY";
