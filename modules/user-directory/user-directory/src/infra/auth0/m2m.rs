//! Machine-to-machine token for the Management API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;
use user_directory_sdk::{CredentialError, CredentialProvider};

use super::error_response::error_message;
use super::{SetupError, tenant_base_url};
use crate::config::M2mConfig;

/// Upper bound on how long a fetched token is reused.
const MAX_CACHED_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Serialize)]
struct TokenRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
    audience: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: SecretString,
    expires_in: u64,
    #[serde(default)]
    token_type: Option<String>,
}

struct CachedToken {
    token: SecretString,
    refresh_at: Instant,
}

/// Client-credentials token source with an in-memory cache.
///
/// The cache mutex is held for the whole refresh, so concurrent callers wait
/// for one request instead of each fetching a token.
pub struct M2mTokenManager {
    http: Client,
    token_url: String,
    client_id: String,
    client_secret: SecretString,
    audience: String,
    refresh_margin: Duration,
    cache: Mutex<Option<CachedToken>>,
}

impl M2mTokenManager {
    /// Token manager for the tenant at `https://{domain}`.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::Missing`] if the domain, client id or client
    /// secret is empty.
    pub fn new(http: Client, domain: &str, cfg: &M2mConfig) -> Result<Self, SetupError> {
        if domain.trim().is_empty() {
            return Err(SetupError::Missing("domain"));
        }
        if cfg.client_id.trim().is_empty() {
            return Err(SetupError::Missing("m2m.client_id"));
        }
        if cfg.client_secret.expose_secret().is_empty() {
            return Err(SetupError::Missing("m2m.client_secret"));
        }

        let base_url = tenant_base_url(domain);
        let audience = cfg
            .audience
            .clone()
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| format!("{base_url}/api/v2/"));

        Ok(Self {
            http,
            token_url: format!("{base_url}/oauth/token"),
            client_id: cfg.client_id.clone(),
            client_secret: cfg.client_secret.clone(),
            audience,
            refresh_margin: cfg.refresh_margin(),
            cache: Mutex::new(None),
        })
    }

    /// Send token requests to `base_url` instead of the tenant domain.
    /// The audience is left untouched.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.token_url = format!("{}/oauth/token", base_url.trim_end_matches('/'));
        self
    }

    async fn fetch(&self) -> Result<TokenResponse, CredentialError> {
        let response = self
            .http
            .post(&self.token_url)
            .json(&TokenRequest {
                grant_type: "client_credentials",
                client_id: &self.client_id,
                client_secret: self.client_secret.expose_secret(),
                audience: &self.audience,
            })
            .send()
            .await
            .map_err(|e| CredentialError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CredentialError::Rejected {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| CredentialError::Decode(e.to_string()))
    }
}

#[async_trait]
impl CredentialProvider for M2mTokenManager {
    async fn get_token(&self) -> Result<SecretString, CredentialError> {
        let mut cache = self.cache.lock().await;

        if let Some(cached) = cache.as_ref()
            && Instant::now() < cached.refresh_at
        {
            return Ok(cached.token.clone());
        }

        let fetched = self.fetch().await?;
        if fetched
            .token_type
            .as_deref()
            .is_some_and(|t| !t.eq_ignore_ascii_case("bearer"))
        {
            tracing::warn!(
                token_type = fetched.token_type.as_deref().unwrap_or_default(),
                "unexpected M2M token type"
            );
        }

        let lifetime = Duration::from_secs(fetched.expires_in)
            .saturating_sub(self.refresh_margin)
            .min(MAX_CACHED_LIFETIME);
        let now = Instant::now();
        tracing::debug!(expires_in = fetched.expires_in, "M2M token refreshed");

        *cache = Some(CachedToken {
            token: fetched.access_token.clone(),
            refresh_at: now.checked_add(lifetime).unwrap_or(now),
        });
        Ok(fetched.access_token)
    }
}
