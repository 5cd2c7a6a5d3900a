use super::{TokenKey, TokenStore};
use crate::error::Result;
use log::debug;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Tokens kept as a JSON object on disk, e.g. `{"access_token": "..."}`.
///
/// Each operation re-reads the file so edits made by other processes are seen.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self, tokens: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(tokens)?)?;
        restrict_permissions(&self.path)?;
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: TokenKey) -> Result<Option<String>> {
        Ok(self.read()?.remove(key.as_str()))
    }

    fn set(&self, key: TokenKey, value: &str) -> Result<()> {
        let mut tokens = self.read()?;
        tokens.insert(key.as_str().to_string(), value.to_string());
        debug!("Writing {key} to {}", self.path.display());
        self.write(&tokens)
    }

    fn clear(&self, key: TokenKey) -> Result<()> {
        let mut tokens = self.read()?;
        if tokens.remove(key.as_str()).is_some() {
            debug!("Removing {key} from {}", self.path.display());
            self.write(&tokens)?;
        }
        Ok(())
    }
}
