//! On-disk token store
//!
//! One file per storage key inside a private directory. The files hold the
//! raw compact token and nothing else, so they stay readable by other
//! processes sharing the directory. An in-memory map in front of the files
//! gives read-after-write visibility inside the process.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::{Result, TokenStore};
use crate::client::Token;
use crate::error::StoreError;

/// Write-through token cache backed by a directory
#[derive(Debug)]
pub struct FileTokenStore {
    root: PathBuf,
    items: RwLock<HashMap<String, Token>>,
}

impl FileTokenStore {
    /// Open the store, creating the directory (mode 0700 on Unix) if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o700);
        }
        builder.create(&root).map_err(|e| io_error(&root, e))?;

        Ok(Self {
            root,
            items: RwLock::new(HashMap::new()),
        })
    }

    /// Directory holding the token files
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn write_file(&self, path: &Path, token: &Token) -> std::io::Result<()> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(path)?;

        // The open mode only applies to new files.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if file.metadata()?.is_file() {
                file.set_permissions(fs::Permissions::from_mode(0o600))?;
            }
        }

        if let Err(e) = file.write_all(token.as_str().as_bytes()).and_then(|()| file.sync_all()) {
            drop(file);
            if let Err(remove_err) = fs::remove_file(path) {
                log::warn!(
                    "Failed to remove partial token file {}: {}",
                    path.display(),
                    remove_err
                );
            }
            return Err(e);
        }

        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn set(&self, key: &str, token: &Token) -> Result<()> {
        let mut items = self.items.write().map_err(|_| StoreError::Poisoned)?;

        let path = self.path_for(key);
        self.write_file(&path, token)
            .map_err(|e| io_error(&path, e))?;

        items.insert(key.to_string(), token.clone());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Token>> {
        {
            let items = self.items.read().map_err(|_| StoreError::Poisoned)?;
            if let Some(token) = items.get(key) {
                return Ok(Some(token.clone()));
            }
        }

        let path = self.path_for(key);
        let contents = match fs::read(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&path, e)),
        };

        // A damaged file decodes to a claim-less token, which reads as
        // expired and gets replaced on the next authentication.
        let token = Token::new(String::from_utf8_lossy(&contents).trim().to_string());
        log::debug!("Loaded token {} from {}", key, path.display());

        let mut items = self.items.write().map_err(|_| StoreError::Poisoned)?;
        Ok(Some(items.entry(key.to_string()).or_insert(token).clone()))
    }
}

fn io_error(path: &Path, err: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}
