//! File-based token store with persistence.
//!
//! Keeps items in memory and writes them to a JSON file. Suitable for
//! single-user tools where tokens should survive restarts.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use native_auth_core::error::{NativeAuthError, Result};
use native_auth_core::traits::TokenStore;

use crate::MemoryStore;

/// Current file format version.
const VERSION: u64 = 1;

/// File-based token store.
///
/// Uses a memory store internally and persists it to disk after every
/// `auto_save_threshold` writes (every write by default).
///
/// # File Format
///
/// ```text
/// {
///   "version": 1,
///   "items": { "<cache key>": "<serialized token record>", ... }
/// }
/// ```
///
/// The file holds private key material inside its keys; keep it out of
/// shared locations.
pub struct FileStore {
    /// Path to the storage file
    path: PathBuf,
    /// In-memory storage
    memory: MemoryStore,
    /// Whether there are unsaved changes
    dirty: AtomicBool,
    /// Save after this many writes
    auto_save_threshold: u64,
    /// Writes since last save
    writes_since_save: AtomicU64,
    /// Serializes saves so temp files never interleave
    save_lock: Mutex<()>,
}

impl FileStore {
    /// Opens a file store at the given path, saving on every write.
    ///
    /// If the file exists it is loaded. Otherwise the store starts empty and
    /// the file is created on first save.
    ///
    /// # Errors
    /// Returns `StoreRead` if the file exists but is not a valid store file.
    pub async fn new(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_auto_save(path, 1).await
    }

    /// Opens a file store that saves after every `threshold` writes.
    ///
    /// A threshold of zero is treated as one.
    pub async fn with_auto_save(path: impl AsRef<Path>, threshold: u64) -> Result<Self> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
            memory: MemoryStore::new(),
            dirty: AtomicBool::new(false),
            auto_save_threshold: threshold.max(1),
            writes_since_save: AtomicU64::new(0),
            save_lock: Mutex::new(()),
        };

        if fs::try_exists(&store.path).await? {
            store.load().await?;
        }

        Ok(store)
    }

    /// Loads items from the file.
    #[instrument(skip(self))]
    async fn load(&self) -> Result<()> {
        let contents = fs::read(&self.path).await.map_err(|e| {
            NativeAuthError::StoreRead(format!("failed to open {}: {}", self.path.display(), e))
        })?;

        let document: Value = serde_json::from_slice(&contents).map_err(|e| {
            NativeAuthError::StoreRead(format!("{} is not valid JSON: {}", self.path.display(), e))
        })?;

        let version = document.get("version").and_then(Value::as_u64);
        if version != Some(VERSION) {
            return Err(NativeAuthError::StoreRead(format!(
                "unsupported store file version {:?}, expected {}",
                version, VERSION
            )));
        }

        let items: BTreeMap<String, String> = document
            .get("items")
            .cloned()
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| NativeAuthError::StoreRead(format!("malformed items: {}", e)))?
            .unwrap_or_default();

        let count = self.memory.import(items);
        info!(count, "Loaded token store from file");

        self.dirty.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// Saves all items to the file.
    ///
    /// Writes to a temporary file first and renames it over the target.
    #[instrument(skip(self))]
    pub async fn save(&self) -> Result<()> {
        let _guard = self.save_lock.lock().await;

        // Cleared before the snapshot so a concurrent write re-marks it
        self.dirty.store(false, Ordering::SeqCst);
        self.writes_since_save.store(0, Ordering::SeqCst);

        let items: BTreeMap<String, String> = self.memory.entries().into_iter().collect();
        let count = items.len();
        let document = json!({ "version": VERSION, "items": items });

        debug!(count, path = ?self.path, "Saving token store to file");

        let written = match serde_json::to_vec_pretty(&document) {
            Ok(serialized) => self
                .write_atomically(&serialized)
                .await
                .map_err(|e| NativeAuthError::StoreWrite(format!("{}: {}", self.path.display(), e))),
            Err(e) => Err(e.into()),
        };

        if written.is_err() {
            self.dirty.store(true, Ordering::SeqCst);
        }
        written
    }

    async fn write_atomically(&self, contents: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(contents).await?;
        file.sync_all().await?;

        fs::rename(&temp_path, &self.path).await
    }

    /// Checks if there are unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Forces a save if dirty.
    pub async fn flush(&self) -> Result<()> {
        if self.is_dirty() {
            self.save().await?;
        }
        Ok(())
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a snapshot of all items.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.memory.entries()
    }

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    /// Returns true if empty.
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    async fn maybe_auto_save(&self) -> Result<()> {
        let writes = self.writes_since_save.fetch_add(1, Ordering::SeqCst) + 1;
        if writes >= self.auto_save_threshold {
            self.save().await?;
        }
        Ok(())
    }
}

impl Drop for FileStore {
    fn drop(&mut self) {
        if self.is_dirty() {
            warn!(path = ?self.path, "FileStore dropped with unsaved changes");
        }
    }
}

#[async_trait]
impl TokenStore for FileStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.memory.get_item(key).await
    }

    async fn set_item(&self, key: &str, value: String) -> Result<()> {
        self.memory.set_item(key, value).await?;
        self.dirty.store(true, Ordering::SeqCst);
        self.maybe_auto_save().await
    }
}
