//! End-user token verification against the tenant's signing keys.

use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::jwk::{Jwk, JwkSet};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use parking_lot::RwLock;
use reqwest::Client;
use serde::Deserialize;
use tokio::time::Instant;
use user_directory_sdk::{Claims, TokenError, TokenVerifier};

use super::{SetupError, tenant_base_url};
use crate::config::JwtConfig;

/// `scope` is a space-delimited string in Auth0 access tokens, but some
/// issuers send a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScopeClaim {
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct AccessTokenClaims {
    #[serde(default)]
    sub: String,
    #[serde(default)]
    scope: Option<ScopeClaim>,
    #[serde(default)]
    permissions: Vec<String>,
}

/// A missing `kid` does not trigger another fetch within this window.
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(10);

struct CachedJwks {
    jwks: JwkSet,
    fetched_at: Instant,
}

/// RS256 verifier with a TTL-bound JWKS cache.
///
/// Keys are looked up by `kid`; an unknown `kid` forces one refresh so key
/// rotation is picked up before the TTL runs out. Forced refreshes are at
/// most one per `MIN_REFRESH_INTERVAL`.
pub struct JwtVerifier {
    http: Client,
    jwks_url: String,
    issuer: String,
    audience: Option<String>,
    leeway_secs: u64,
    cache_ttl: Duration,
    cache: RwLock<Option<CachedJwks>>,
}

impl JwtVerifier {
    /// Verifier for tokens issued by the tenant at `domain`, or by
    /// `cfg.issuer` when set.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::Missing`] if neither an issuer nor a domain is
    /// configured.
    pub fn new(http: Client, domain: &str, cfg: &JwtConfig) -> Result<Self, SetupError> {
        let issuer = match cfg.issuer.as_deref().map(str::trim) {
            Some(issuer) if !issuer.is_empty() => issuer.to_owned(),
            _ if !domain.trim().is_empty() => format!("{}/", tenant_base_url(domain)),
            _ => return Err(SetupError::Missing("jwt.issuer")),
        };
        let jwks_url = format!("{}/.well-known/jwks.json", issuer.trim_end_matches('/'));

        Ok(Self {
            http,
            jwks_url,
            issuer,
            audience: cfg.audience.clone().filter(|a| !a.trim().is_empty()),
            leeway_secs: cfg.leeway_secs,
            cache_ttl: cfg.jwks_cache_ttl(),
            cache: RwLock::new(None),
        })
    }

    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    async fn signing_key(&self, kid: Option<&str>) -> Result<Jwk, TokenError> {
        if let Some(jwk) = self.cached_key(kid) {
            return Ok(jwk);
        }

        if !self.recently_refreshed() {
            self.refresh().await?;
        }

        self.cached_key(kid).ok_or_else(|| match kid {
            Some(kid) => TokenError::Invalid(format!("unknown signing key '{kid}'")),
            None => TokenError::KeysUnavailable("key set is empty".to_owned()),
        })
    }

    fn recently_refreshed(&self) -> bool {
        self.cache.read().as_ref().is_some_and(|cached| {
            let age = cached.fetched_at.elapsed();
            age < MIN_REFRESH_INTERVAL && age <= self.cache_ttl
        })
    }

    fn cached_key(&self, kid: Option<&str>) -> Option<Jwk> {
        let cache = self.cache.read();
        let cached = cache.as_ref()?;
        if cached.fetched_at.elapsed() > self.cache_ttl {
            return None;
        }
        match kid {
            Some(kid) => cached.jwks.find(kid).cloned(),
            None => cached.jwks.keys.first().cloned(),
        }
    }

    async fn refresh(&self) -> Result<(), TokenError> {
        tracing::debug!(url = %self.jwks_url, "fetching JWKS");

        let response = self
            .http
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| TokenError::KeysUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TokenError::KeysUnavailable(format!(
                "JWKS endpoint returned {status}"
            )));
        }

        let jwks = response
            .json::<JwkSet>()
            .await
            .map_err(|e| TokenError::KeysUnavailable(e.to_string()))?;

        *self.cache.write() = Some(CachedJwks {
            jwks,
            fetched_at: Instant::now(),
        });
        Ok(())
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = self.leeway_secs;
        match &self.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        validation
    }
}

fn map_jwt_error(e: &jsonwebtoken::errors::Error) -> TokenError {
    match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) => {
            TokenError::Malformed(e.to_string())
        }
        _ => TokenError::Invalid(e.to_string()),
    }
}

#[async_trait]
impl TokenVerifier for JwtVerifier {
    async fn verify(&self, token: &str, required_scope: &str) -> Result<Claims, TokenError> {
        let header = decode_header(token).map_err(|e| map_jwt_error(&e))?;
        if header.alg != Algorithm::RS256 {
            return Err(TokenError::Invalid(
                "unsupported algorithm, only RS256 is accepted".to_owned(),
            ));
        }

        let jwk = self.signing_key(header.kid.as_deref()).await?;
        let key = DecodingKey::from_jwk(&jwk)
            .map_err(|e| TokenError::KeysUnavailable(format!("unusable signing key: {e}")))?;

        let data = decode::<AccessTokenClaims>(token, &key, &self.validation())
            .map_err(|e| map_jwt_error(&e))?;
        let raw = data.claims;

        if raw.sub.trim().is_empty() {
            return Err(TokenError::Invalid("token has no subject".to_owned()));
        }

        let mut builder = Claims::builder().subject(raw.sub);
        builder = match raw.scope {
            Some(ScopeClaim::Text(scope)) => builder.scope_string(&scope),
            Some(ScopeClaim::List(scopes)) => builder.scopes(scopes),
            None => builder,
        };
        let claims = builder.extend_scopes(raw.permissions).build();

        if !claims.has_scope(required_scope) {
            tracing::debug!(required = required_scope, "token lacks required scope");
            return Err(TokenError::InsufficientScope {
                required: required_scope.to_owned(),
            });
        }
        Ok(claims)
    }
}
