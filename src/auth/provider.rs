//! Token provider implementation
//!
//! Signs the exchange JWT and trades it for an IMS access token, caching the
//! result until shortly before expiry.

use super::types::CachedToken;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Lifetime of the exchange JWT
const JWT_LIFETIME_MINUTES: i64 = 30;

/// Exchanges a signed JWT for an IMS bearer token
pub struct TokenProvider {
    /// Client credentials and endpoints
    config: ClientConfig,
    /// Cached access token
    cached_token: Arc<RwLock<Option<CachedToken>>>,
    /// HTTP client for token requests
    http_client: Client,
}

impl TokenProvider {
    /// Create a new token provider
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            cached_token: Arc::new(RwLock::new(None)),
            http_client: Client::new(),
        }
    }

    /// Create a token provider with a custom HTTP client
    pub fn with_client(config: ClientConfig, http_client: Client) -> Self {
        Self {
            config,
            cached_token: Arc::new(RwLock::new(None)),
            http_client,
        }
    }

    /// Get a valid bearer token, exchanging a fresh JWT if necessary
    pub async fn bearer_token(&self) -> Result<String> {
        // Check if we have a valid cached token
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expired() {
                    return Ok(token.token.clone());
                }
            }
        }

        // Need to refresh - acquire write lock
        let mut cached = self.cached_token.write().await;

        // Double-check after acquiring write lock (another task might have refreshed)
        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.token.clone());
            }
        }

        let new_token = self.exchange().await?;
        let token_str = new_token.token.clone();
        *cached = Some(new_token);

        Ok(token_str)
    }

    /// Clear the cached token (useful for testing or forced refresh)
    pub async fn clear_cache(&self) {
        let mut cached = self.cached_token.write().await;
        *cached = None;
    }

    /// Get the current config
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the exchange JWT claims for the given expiration base
    pub(crate) fn build_claims(&self, now: DateTime<Utc>) -> ExchangeClaims {
        let mut metascope = HashMap::new();
        metascope.insert(self.config.metascope.clone(), true);

        ExchangeClaims {
            iss: self.config.org_id.clone(),
            sub: self.config.subject_account.clone(),
            aud: self.config.audience(),
            exp: (now + Duration::minutes(JWT_LIFETIME_MINUTES)).timestamp(),
            metascope,
        }
    }

    /// Sign the exchange JWT with the configured private key
    pub(crate) fn sign_jwt(&self, claims: &ExchangeClaims) -> Result<String> {
        let pem = self.config.private_key()?;

        let encoding_key =
            EncodingKey::from_rsa_pem(pem.as_bytes()).map_err(|e| Error::JwtGeneration {
                message: format!("Invalid private key: {e}"),
            })?;

        let header = Header::new(self.config.jwt_algorithm.into());

        encode(&header, claims, &encoding_key).map_err(|e| Error::JwtGeneration {
            message: format!("Failed to encode JWT: {e}"),
        })
    }

    /// Perform the JWT exchange against IMS
    async fn exchange(&self) -> Result<CachedToken> {
        let claims = self.build_claims(Utc::now());
        let jwt = self.sign_jwt(&claims)?;

        let form = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("jwt_token", jwt.as_str()),
        ];

        debug!("Exchanging JWT at {}", self.config.auth_url());

        let response = self
            .http_client
            .post(self.config.auth_url())
            .form(&form)
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::TokenExchange { status, body });
        }

        let token_response: TokenResponse = response.json().await.map_err(Error::Http)?;
        Ok(token_response.into_cached_token())
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// IMS token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    #[allow(dead_code)]
    token_type: Option<String>,
}

impl TokenResponse {
    fn into_cached_token(self) -> CachedToken {
        match self.expires_in {
            // IMS reports expiry in milliseconds
            Some(ms) => CachedToken::expires_in(self.access_token, ms / 1000),
            None => CachedToken::new(self.access_token, None),
        }
    }
}

/// Claims of the exchange JWT
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub(crate) struct ExchangeClaims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub exp: i64,
    #[serde(flatten)]
    pub metascope: HashMap<String, bool>,
}
