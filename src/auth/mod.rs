pub mod jwt;
pub mod token_store;

use crate::api::endpoints::TokenPair;
use crate::error::Result;
use log::{debug, info};

pub use token_store::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenKey, TokenStore};


/// Persist whichever tokens are present in `tokens`.
///
/// A pair carrying only one token leaves the other stored value untouched.
pub fn store_tokens(store: &dyn TokenStore, tokens: Option<&TokenPair>) -> Result<()> {
    let Some(tokens) = tokens else {
        debug!("No token pair to store");
        return Ok(());
    };

    // Empty strings count as absent, like a missing field
    if let Some(access) = tokens.access() {
        store.set(TokenKey::AccessToken, access)?;
        debug!("Stored access token");
    }

    if let Some(refresh) = tokens.refresh() {
        store.set(TokenKey::RefreshToken, refresh)?;
        debug!("Stored refresh token");
    }

    Ok(())
}

pub fn clear_tokens(store: &dyn TokenStore) -> Result<()> {
    store.clear(TokenKey::AccessToken)?;
    store.clear(TokenKey::RefreshToken)?;
    info!("Cleared stored tokens");
    Ok(())
}
