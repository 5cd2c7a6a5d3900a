use crate::api::endpoints::Role;
use crate::error::Result;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "jwt_test.rs"]
mod jwt_test;

/// Claims the backend puts into its access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessClaims {
    pub role: Role,
    pub user_id: i64,
    pub exp: i64,
    /// "access" or "refresh"; older tokens omit it.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl AccessClaims {
    /// Read the claims of `token` without checking its signature.
    ///
    /// The signing secret lives on the server, so this is only fit for
    /// display. Expiry is reported by [`AccessClaims::is_expired`] rather
    /// than rejected here.
    pub fn peek(token: &str) -> Result<Self> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = decode::<AccessClaims>(token, &DecodingKey::from_secret(&[]), &validation)?;
        Ok(data.claims)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(self.exp, 0)
    }

    pub fn is_expired(&self) -> bool {
        self.exp <= Utc::now().timestamp()
    }

    pub fn expires_in(&self) -> Duration {
        let exp_time = self.expires_at().unwrap_or_else(Utc::now);
        exp_time - Utc::now()
    }
}
