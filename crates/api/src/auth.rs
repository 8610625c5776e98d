//! Client-credentials token exchange.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;

/// Yields a bearer token for the platform API.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Pin<Box<dyn Future<Output = Result<String, ApiError>> + Send + '_>>;
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    audience: &'a str,
    grant_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// OAuth client-credentials exchange against the token endpoint.
///
/// Every call performs a fresh exchange; tokens are not cached.
pub struct ClientCredentials {
    http: reqwest::Client,
    token_url: String,
    audience: String,
    client_id: String,
    client_secret: String,
}

impl ClientCredentials {
    pub fn new(
        token_url: impl Into<String>,
        audience: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            token_url: token_url.into(),
            audience: audience.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    async fn exchange(&self) -> Result<String, ApiError> {
        let body = TokenRequest {
            client_id: &self.client_id,
            client_secret: &self.client_secret,
            audience: &self.audience,
            grant_type: "client_credentials",
        };

        let resp = self.http.post(&self.token_url).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Auth {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let token: TokenResponse = serde_json::from_slice(&resp.bytes().await?)?;
        debug!(token_url = %self.token_url, "obtained access token");
        Ok(token.access_token)
    }
}

impl TokenProvider for ClientCredentials {
    fn token(&self) -> Pin<Box<dyn Future<Output = Result<String, ApiError>> + Send + '_>> {
        Box::pin(self.exchange())
    }
}
