//! In-memory token store.
//!
//! Fast, thread-safe storage suitable for development, testing,
//! and single-process hosts.

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, instrument};

use native_auth_core::error::Result;
use native_auth_core::traits::TokenStore;

/// In-memory token store.
///
/// Keys and values are opaque strings. Keys embed private key material, so
/// nothing here logs them.
///
/// # Thread Safety
///
/// All operations are thread-safe and can be called concurrently.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: DashMap<String, String>,
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
        }
    }

    /// Creates a store with preallocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: DashMap::with_capacity(capacity),
        }
    }

    /// Removes all items.
    pub fn clear(&self) {
        self.items.clear();
    }

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns a snapshot of all items (for persistence or inspection).
    pub fn entries(&self) -> Vec<(String, String)> {
        self.items
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Imports items, replacing any existing values under the same keys.
    ///
    /// Returns the number of items imported.
    pub fn import(&self, items: impl IntoIterator<Item = (String, String)>) -> usize {
        let mut imported = 0;
        for (key, value) in items {
            self.items.insert(key, value);
            imported += 1;
        }
        imported
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    #[instrument(skip_all)]
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let value = self.items.get(key).map(|entry| entry.value().clone());
        debug!(found = value.is_some(), "Memory store read");
        Ok(value)
    }

    #[instrument(skip_all)]
    async fn set_item(&self, key: &str, value: String) -> Result<()> {
        self.items.insert(key.to_string(), value);
        debug!(len = self.items.len(), "Memory store write");
        Ok(())
    }
}
