//! Identity Provider client — exchanges credentials for a bearer token.
//!
//! The provider is an external HTTP service (by default a mock API). Its
//! reply is always read as JSON, whatever the status code; whether it is a
//! successful login depends only on the body (see [`ProviderReply::token`]).

use std::time::Duration;

use serde_json::{Map, Value};

use crate::config::IdentityConfig;

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("identity request failed: {0}")]
    Request(String),

    /// The provider answered, but not with JSON.
    #[error("identity response parse failed (status {status}): {message}")]
    ResponseParse { status: u16, message: String },
}

/// Login credentials: whatever JSON object the provider expects.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Credentials(Map<String, Value>);

impl Credentials {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one field.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Credentials {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Raw provider reply: HTTP status plus parsed JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderReply {
    pub status: u16,
    pub body: Value,
}

impl ProviderReply {
    /// The issued token, if this reply represents a successful login.
    ///
    /// Only a non-empty string `token` field counts. The status code does
    /// not: the body decides.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.body
            .get("token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
    }
}

/// Seam between the session manager and whatever issues tokens.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Submit `credentials` and return the provider's reply.
    async fn authenticate(&self, credentials: &Credentials) -> Result<ProviderReply, IdentityError>;
}

// =============================================================================
// HTTP PROVIDER
// =============================================================================

/// Identity Provider reached over HTTP: `POST <url>` with a JSON body.
pub struct HttpIdentityProvider {
    http: reqwest::Client,
    url: String,
}

impl HttpIdentityProvider {
    /// Build a provider client from typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &IdentityConfig) -> Result<Self, IdentityError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| IdentityError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, url: config.url.clone() })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn authenticate(&self, credentials: &Credentials) -> Result<ProviderReply, IdentityError> {
        let response = self
            .http
            .post(&self.url)
            .json(credentials)
            .send()
            .await
            .map_err(|e| IdentityError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| IdentityError::Request(e.to_string()))?;
        tracing::debug!(status, bytes = text.len(), "identity provider replied");

        let body = serde_json::from_str(&text)
            .map_err(|e| IdentityError::ResponseParse { status, message: e.to_string() })?;
        Ok(ProviderReply { status, body })
    }
}

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;
