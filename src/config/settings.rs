use crate::config::constants;
use crate::error::ClientError;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;

/// Where tokens are persisted between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStoreKind {
    #[default]
    Keyring,
    File,
}

impl fmt::Display for TokenStoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenStoreKind::Keyring => f.write_str("keyring"),
            TokenStoreKind::File => f.write_str("file"),
        }
    }
}

impl FromStr for TokenStoreKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keyring" => Ok(TokenStoreKind::Keyring),
            "file" => Ok(TokenStoreKind::File),
            other => Err(format!("Unknown token store '{other}' (expected keyring or file)")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub token_store: TokenStoreKind,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        // A missing file means nothing has been configured yet
        let settings = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };

        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// API base address: environment override, then the settings file,
    /// then the local development default.
    pub fn api_base_url(&self) -> String {
        Self::resolve_base_url(
            std::env::var(constants::API_BASE_URL_ENV).ok().as_deref(),
            self.api_base_url.as_deref(),
        )
    }

    fn resolve_base_url(env_value: Option<&str>, configured: Option<&str>) -> String {
        // Blank values fall through to the next source
        [env_value, configured]
            .into_iter()
            .flatten()
            .map(|url| url.trim().trim_end_matches('/'))
            .find(|url| !url.is_empty())
            .unwrap_or(constants::DEFAULT_API_BASE_URL)
            .to_string()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.api_base_url {
            // Only absolute http(s) addresses
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ClientError::InvalidConfiguration(format!(
                    "API base URL must start with http:// or https://: {url}"
                )));
            }
        }
        Ok(())
    }
}
