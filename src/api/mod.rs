pub mod body;
pub mod endpoints;
mod scheduling;

use crate::auth::{self, TokenKey, TokenStore};
use crate::error::{ClientError, Result};
use endpoints::*;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;


/// Method, body and extra headers of a single request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    /// Sent after the defaults, so they win on a name collision.
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post<T: Serialize>(body: &T) -> Result<Self> {
        Self::with_body(Method::POST, body)
    }

    pub fn put<T: Serialize>(body: &T) -> Result<Self> {
        Self::with_body(Method::PUT, body)
    }

    fn with_body<T: Serialize>(method: Method, body: &T) -> Result<Self> {
        Ok(Self {
            method,
            body: Some(serde_json::to_value(body)?),
            headers: Vec::new(),
        })
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(base_url: String, store: Arc<dyn TokenStore>) -> Result<Self> {
        let client = Client::builder().build()?;

        Ok(ApiClient {
            client,
            base_url,
            store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &dyn TokenStore {
        self.store.as_ref()
    }

    /// Send a request to `base_url + path` and interpret the reply.
    ///
    /// The stored access token, if any, is attached as a bearer token.
    /// A non-2xx reply becomes [`ClientError::Api`] carrying the status
    /// and the interpreted body.
    pub async fn api_fetch(&self, path: &str, options: RequestOptions) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let headers = self.build_headers(&options.headers)?;

        debug!("{} {url}", options.method);

        let mut request = self.client.request(options.method, &url).headers(headers);
        if let Some(body) = &options.body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let response = request.send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // The body is read in full before the status is looked at
        let text = response.text().await?;
        let data = body::interpret_body(content_type.as_deref(), &text)?;

        if status.is_success() {
            return Ok(data);
        }

        let message = body::error_message(&data, status.as_u16());
        warn!("Request to {url} failed with {status}: {message}");
        Err(ClientError::Api {
            message,
            status: status.as_u16(),
            data,
        })
    }

    fn build_headers(&self, extra: &[(String, String)]) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        // Read fresh on every request; another process may have rotated it
        let token = self.store.get(TokenKey::AccessToken)?.filter(|t| !t.is_empty());
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                ClientError::Other("Stored access token is not a valid header value".to_string())
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        // Caller headers go in last and replace any default of the same name
        for (name, value) in extra {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ClientError::Other(format!("Invalid header name: {name}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| ClientError::Other(format!("Invalid value for header {name}")))?;
            headers.insert(name, value);
        }

        Ok(headers)
    }

    async fn fetch_as<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        options: RequestOptions,
    ) -> Result<T> {
        self.fetch_at(endpoint, endpoint, options).await
    }

    /// Like `fetch_as` for paths with ids or a query appended. `endpoint`
    /// names the route in decode errors.
    async fn fetch_at<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        options: RequestOptions,
    ) -> Result<T> {
        let data = self.api_fetch(path, options).await?;
        decode(endpoint, data)
    }

    async fn fetch_tokens(
        &self,
        endpoint: &'static str,
        options: RequestOptions,
    ) -> Result<TokenPair> {
        let data = self.api_fetch(endpoint, options).await?;

        // An empty 2xx reply carries no tokens
        if data.is_null() {
            return Ok(TokenPair::default());
        }
        decode(endpoint, data)
    }

    /// Exchange credentials for tokens. Nothing is persisted here.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<TokenPair> {
        debug!("Logging in as {} ({})", credentials.email, credentials.role);
        self.fetch_tokens(LOGIN, RequestOptions::post(credentials)?).await
    }

    pub fn store_tokens(&self, tokens: Option<&TokenPair>) -> Result<()> {
        auth::store_tokens(self.store.as_ref(), tokens)
    }

    /// Trade the stored refresh token for a new pair and persist it.
    pub async fn refresh_token(&self) -> Result<TokenPair> {
        let refresh_token = self
            .store
            .get(TokenKey::RefreshToken)?
            .filter(|t| !t.is_empty())
            .ok_or(ClientError::MissingRefreshToken)?;

        let tokens = self
            .fetch_tokens(
                REFRESH,
                RequestOptions::post(&RefreshTokenRequest { refresh_token })?,
            )
            .await?;

        self.store_tokens(Some(&tokens))?;
        Ok(tokens)
    }

    pub async fn me(&self) -> Result<UserInfo> {
        self.fetch_as(ME, RequestOptions::get()).await
    }

    /// Forget both stored tokens. The server keeps no session to end.
    pub fn logout(&self) -> Result<()> {
        auth::clear_tokens(self.store.as_ref())
    }

    /// Create an account. Doctor accounts need the admin token.
    pub async fn register(
        &self,
        request: &RegisterRequest,
        admin_token: Option<&str>,
    ) -> Result<UserRecord> {
        let mut options = RequestOptions::post(request)?;
        if let Some(token) = admin_token {
            options = options.header("X-Admin-Token", token);
        }
        self.fetch_as(REGISTER, options).await
    }
}

fn decode<T: DeserializeOwned>(endpoint: &'static str, data: Value) -> Result<T> {
    serde_json::from_value(data).map_err(|source| ClientError::Decode { endpoint, source })
}
