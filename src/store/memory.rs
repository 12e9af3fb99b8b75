//! In-memory token store

use std::collections::HashMap;
use std::sync::Mutex;

use super::{Result, TokenStore};
use crate::client::Token;
use crate::error::StoreError;

/// Process-local token cache guarded by a single mutex
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    items: Mutex<HashMap<String, Token>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn set(&self, key: &str, token: &Token) -> Result<()> {
        let mut items = self.items.lock().map_err(|_| StoreError::Poisoned)?;
        items.insert(key.to_string(), token.clone());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Token>> {
        let items = self.items.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(items.get(key).cloned())
    }
}
