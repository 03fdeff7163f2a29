//! Domain types for native auth.
//!
//! - [`Network`] and [`Shard`]: where the signer anchors a token
//! - [`RequestParameters`]: validated signing parameters
//! - [`RawParameters`]: parameters as delivered by the host form
//! - [`CacheKey`]: deterministic store key derived from parameters
//! - [`NativeAuthToken`]: a signed token and its expiry

mod key;
mod network;
mod params;
mod token;

pub use key::*;
pub use network::*;
pub use params::*;
pub use token::*;
