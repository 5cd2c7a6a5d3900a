use super::Route;
use crate::api::endpoints::{LoginRequest, Role};
use crate::api::ApiClient;
use crate::error::ClientError;
use log::{info, warn};
use serde_json::Value;
use std::time::Duration;

#[cfg(test)]
#[path = "login_form_test.rs"]
mod login_form_test;

pub const REDIRECT_DELAY: Duration = Duration::from_millis(1200);

pub const SUCCESS_MESSAGE: &str = "Login successful! Redirecting...";
pub const NO_TOKEN_MESSAGE: &str = "Login succeeded but no token returned...";
pub const FALLBACK_ERROR_MESSAGE: &str = "Login failed. Please try again.";

/// Where to go after a successful submission, and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub to: Route,
    pub after: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub role: Role,
    pub email: String,
    pub password: String,
    pub loading: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credentials(&self) -> LoginRequest {
        LoginRequest {
            email: self.email.clone(),
            password: self.password.clone(),
            role: self.role,
        }
    }

    /// Log in with the current fields and persist any returned tokens.
    ///
    /// Failures end up in `error`; nothing is returned to the caller but
    /// the navigation to perform on success.
    pub async fn submit(&mut self, client: &ApiClient) -> Option<Navigation> {
        self.error = None;
        self.success = None;
        self.loading = true;

        let navigation = self.attempt(client).await;

        self.loading = false;
        navigation
    }

    async fn attempt(&mut self, client: &ApiClient) -> Option<Navigation> {
        let tokens = match client.login(&self.credentials()).await {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!("Login failed for {}: {e}", self.email);
                self.error = Some(extract_error_message(&e));
                return None;
            }
        };

        if !tokens.has_token() {
            warn!("Login response for {} carried no token", self.email);
            self.error = Some(NO_TOKEN_MESSAGE.to_string());
            return None;
        }

        if let Err(e) = client.store_tokens(Some(&tokens)) {
            self.error = Some(extract_error_message(&e));
            return None;
        }

        info!("Logged in as {} ({})", self.email, self.role);
        self.success = Some(SUCCESS_MESSAGE.to_string());
        Some(Navigation {
            to: Route::Landing,
            after: REDIRECT_DELAY,
        })
    }
}

/// One line for the user describing why login failed.
///
/// Validation failures list each `detail[].msg`, everything else shows the
/// error's own message.
pub fn extract_error_message(err: &ClientError) -> String {
    let details = err
        .data()
        .and_then(|data| data.get("detail"))
        .and_then(Value::as_array);

    if let Some(details) = details {
        let messages: Vec<&str> = details
            .iter()
            .filter_map(|d| d.get("msg").and_then(Value::as_str))
            .collect();
        if !messages.is_empty() {
            return messages.join(", ");
        }
    }

    let message = err.to_string();
    if message.trim().is_empty() {
        FALLBACK_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}
