// Allow dead code: the in-memory store is the test substitute for keyring
#![allow(dead_code)]

use std::sync::Mutex;

use anyhow::{Context, Result};
use keyring::Entry;

/// Keyring service name for the stored credential
const SERVICE_NAME: &str = "jotter";

/// The single fixed key the API token is stored under
const TOKEN_KEY: &str = "api_token";

/// Storage interface for the API credential.
///
/// Both the API client and the route guard take the store as an injected
/// dependency rather than reaching for storage directly, so tests can swap
/// in `MemoryTokenStore`.
pub trait TokenStore: Send + Sync {
    /// Read the stored token. `None` means no credential is saved.
    fn get(&self) -> Result<Option<String>>;

    /// Save a token, replacing any existing one.
    fn set(&self, token: &str) -> Result<()>;

    /// Remove the stored token. Removing an absent token is not an error.
    fn clear(&self) -> Result<()>;
}

/// Token storage backed by the OS keychain.
pub struct KeyringTokenStore;

impl KeyringTokenStore {
    pub fn new() -> Self {
        Self
    }

    fn entry() -> Result<Entry> {
        Entry::new(SERVICE_NAME, TOKEN_KEY).context("Failed to create keyring entry")
    }
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for KeyringTokenStore {
    fn get(&self) -> Result<Option<String>> {
        match Self::entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to read token from keychain"),
        }
    }

    fn set(&self, token: &str) -> Result<()> {
        Self::entry()?
            .set_password(token)
            .context("Failed to store token in keychain")?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match Self::entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete token from keychain"),
        }
    }
}

/// In-memory token storage, used by tests.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with a token.
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.token.lock().unwrap().clone())
    }

    fn set(&self, token: &str) -> Result<()> {
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.lock().unwrap() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get().unwrap(), None);

        store.set("abc123").unwrap();
        assert_eq!(store.get().unwrap(), Some("abc123".to_string()));

        store.set("def456").unwrap();
        assert_eq!(store.get().unwrap(), Some("def456".to_string()));

        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_memory_store_clear_when_empty() {
        let store = MemoryTokenStore::new();
        // Clearing an absent token is a no-op, not an error
        assert!(store.clear().is_ok());
    }

    #[test]
    fn test_memory_store_with_token() {
        let store = MemoryTokenStore::with_token("seeded");
        assert_eq!(store.get().unwrap(), Some("seeded".to_string()));
    }
}
