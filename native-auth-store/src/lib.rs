//! # Native Auth Store
//!
//! Token store backends for native auth.
//!
//! This crate provides two implementations of [`TokenStore`]:
//!
//! - **Memory**: Fast in-memory storage for development and testing
//! - **File**: A JSON file persisted atomically, for single-user tools
//!
//! ## Example
//!
//! ```rust,ignore
//! use native_auth_store::{MemoryStore, TokenStore};
//!
//! let store = MemoryStore::new();
//! store.set_item("key", "{\"token\":\"t\",\"expiryDate\":\"2030-01-01T00:00:00Z\"}".into()).await?;
//! assert!(store.get_item("key").await?.is_some());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// Re-export the trait from core
pub use native_auth_core::traits::TokenStore;
