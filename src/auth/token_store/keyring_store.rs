use super::{TokenKey, TokenStore};
use crate::error::Result;
use log::{debug, error};

pub const SERVICE_NAME: &str = "clinic-client";

/// Tokens kept in the operating system keyring.
pub struct KeyringTokenStore {
    service: String,
}

impl KeyringTokenStore {
    pub fn new() -> Self {
        Self::with_service(SERVICE_NAME)
    }

    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: TokenKey) -> Result<keyring::Entry> {
        Ok(keyring::Entry::new(&self.service, key.as_str())?)
    }
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for KeyringTokenStore {
    fn get(&self, key: TokenKey) -> Result<Option<String>> {
        debug!("Reading {key} from keyring service {}", self.service);
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => {
                debug!("No {key} in keyring");
                Ok(None)
            }
            Err(e) => {
                error!("Error reading {key} from keyring: {e}");
                Err(e.into())
            }
        }
    }

    fn set(&self, key: TokenKey, value: &str) -> Result<()> {
        debug!("Writing {key} to keyring service {}", self.service);
        self.entry(key)?.set_password(value).map_err(|e| {
            error!("Error writing {key} to keyring: {e}");
            e.into()
        })
    }

    fn clear(&self, key: TokenKey) -> Result<()> {
        debug!("Deleting {key} from keyring service {}", self.service);
        match self.entry(key)?.delete_credential() {
            Ok(_) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => {
                error!("Error deleting {key} from keyring: {e}");
                Err(e.into())
            }
        }
    }
}
