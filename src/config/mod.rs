pub mod constants;
pub mod paths;
pub mod settings;

use crate::auth::{FileTokenStore, KeyringTokenStore, TokenStore};
use crate::error::{ClientError, Result};
use std::sync::{Arc, Mutex, MutexGuard};

pub use paths::AppPaths;
pub use settings::{Settings, TokenStoreKind};

pub struct Config {
    paths: AppPaths,
    settings: Mutex<Settings>,
}

impl Config {
    pub fn new() -> Result<Self> {
        Self::with_paths(AppPaths::new()?)
    }

    pub fn with_paths(paths: AppPaths) -> Result<Self> {
        let settings = Settings::load(&paths.settings_file)?;
        settings.validate()?;

        Ok(Config {
            paths,
            settings: Mutex::new(settings),
        })
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    pub fn settings(&self) -> Result<Settings> {
        Ok(self.lock()?.clone())
    }

    pub fn update_settings<F>(&self, updater: F) -> Result<()>
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.lock()?;
        let mut updated = settings.clone();
        updater(&mut updated);
        updated.validate()?;
        updated.save(&self.paths.settings_file)?;
        *settings = updated;
        Ok(())
    }

    pub fn api_base_url(&self) -> Result<String> {
        Ok(self.lock()?.api_base_url())
    }

    /// Build the token store selected in the settings.
    pub fn token_store(&self) -> Result<Arc<dyn TokenStore>> {
        let store: Arc<dyn TokenStore> = match self.lock()?.token_store {
            TokenStoreKind::Keyring => Arc::new(KeyringTokenStore::new()),
            TokenStoreKind::File => Arc::new(FileTokenStore::new(&self.paths.tokens_file)),
        };
        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Settings>> {
        self.settings
            .lock()
            .map_err(|_| ClientError::Other("Settings lock poisoned".to_string()))
    }
}
