//! Cache-backed issuer for native auth tokens.
//!
//! Reuses a stored token while it stays valid for at least the freshness
//! margin, and otherwise signs a new one and stores it under the parameters'
//! cache key.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod config;
mod issuer;

pub use config::IssuerConfig;
pub use issuer::{CacheStatus, TokenIssuer};
