use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[error("{message}")]
    Api {
        message: String,
        status: u16,
        data: Value,
    },

    #[error("No refresh token stored. Log in again.")]
    MissingRefreshToken,

    #[error("Unexpected response from {endpoint}: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("{0}")]
    Other(String),
}

impl ClientError {
    /// HTTP status of an API failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Interpreted response body of an API failure.
    pub fn data(&self) -> Option<&Value> {
        match self {
            ClientError::Api { data, .. } => Some(data),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
