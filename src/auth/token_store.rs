use crate::error::Result;
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

mod file_store;
mod keyring_store;

pub use file_store::FileTokenStore;
pub use keyring_store::KeyringTokenStore;

#[cfg(test)]
#[path = "token_store_test.rs"]
mod token_store_test;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKey {
    AccessToken,
    RefreshToken,
}

impl TokenKey {
    pub const ALL: [TokenKey; 2] = [TokenKey::AccessToken, TokenKey::RefreshToken];

    /// Storage name of the key.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKey::AccessToken => "access_token",
            TokenKey::RefreshToken => "refresh_token",
        }
    }
}

impl fmt::Display for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persistent key-value storage for the access and refresh tokens.
///
/// Implementations must not cache: every `get` observes the latest value
/// written by any process sharing the backing store.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: TokenKey) -> Result<Option<String>>;
    fn set(&self, key: TokenKey, value: &str) -> Result<()>;
    /// Removing a key that is absent is not an error.
    fn clear(&self, key: TokenKey) -> Result<()>;
}

/// In-process store, lost when dropped.
#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<HashMap<TokenKey, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<TokenKey, String>>> {
        self.tokens
            .lock()
            .map_err(|_| crate::error::ClientError::Other("Token store lock poisoned".to_string()))
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: TokenKey) -> Result<Option<String>> {
        Ok(self.lock()?.get(&key).cloned())
    }

    fn set(&self, key: TokenKey, value: &str) -> Result<()> {
        self.lock()?.insert(key, value.to_string());
        Ok(())
    }

    fn clear(&self, key: TokenKey) -> Result<()> {
        self.lock()?.remove(&key);
        Ok(())
    }
}
