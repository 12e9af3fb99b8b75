//! Token persistence
//!
//! Tokens are cached under a storage key derived from the login and the
//! requested scope, so a read-only token is never handed out where a
//! read-write one was asked for. Two backends share one trait: an in-memory
//! map and a directory holding one file per key.

pub mod file;
pub mod key;
pub mod memory;

use std::path::PathBuf;
use std::sync::Arc;

use crate::client::Token;
use crate::error::StoreError;

pub use file::FileTokenStore;
pub use key::storage_key;
pub use memory::MemoryTokenStore;

type Result<T> = std::result::Result<T, StoreError>;

/// Key/value persistence for bearer tokens.
///
/// `get` on a missing key returns `Ok(None)`, never an error.
pub trait TokenStore: Send + Sync {
    fn set(&self, key: &str, token: &Token) -> Result<()>;

    fn get(&self, key: &str) -> Result<Option<Token>>;
}

/// Where tokens are kept, as parsed from the `token_storage` setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    Directory(PathBuf),
}

impl StoreLocation {
    /// `"memory"` selects the memory store, an empty string the default
    /// directory under the system temp dir, anything else a directory path.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "memory" => StoreLocation::Memory,
            "" => StoreLocation::Directory(Self::default_dir()),
            path => StoreLocation::Directory(PathBuf::from(path)),
        }
    }

    /// `<tmp>/transip`
    pub fn default_dir() -> PathBuf {
        std::env::temp_dir().join("transip")
    }
}

/// Open the store for a location.
///
/// A directory that cannot be created degrades to the memory store rather
/// than failing; the caller still gets a working, if short-lived, cache.
pub fn open_store(location: &StoreLocation) -> Arc<dyn TokenStore> {
    match location {
        StoreLocation::Memory => Arc::new(MemoryTokenStore::new()),
        StoreLocation::Directory(dir) => match FileTokenStore::open(dir) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                log::warn!("Falling back to in-memory token storage: {e}");
                Arc::new(MemoryTokenStore::new())
            }
        },
    }
}
