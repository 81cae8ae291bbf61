//! Configuration for the user directory.

use std::path::Path;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use secrecy::SecretString;
use serde::Deserialize;

/// Prefix of the environment variables that override file settings.
pub const ENV_PREFIX: &str = "USER_DIRECTORY_";

/// Module configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UserDirectoryConfig {
    /// Tenant domain, e.g. `tenant.eu.auth0.com`. Required by every operation.
    pub domain: String,
    pub m2m: M2mConfig,
    pub jwt: JwtConfig,
    pub http: HttpConfig,
}

/// Client-credentials application used for reads without a caller token.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct M2mConfig {
    pub client_id: String,
    pub client_secret: SecretString,
    /// Defaults to the Management API of the tenant.
    pub audience: Option<String>,
    /// Refresh the cached token this many seconds before it expires.
    pub refresh_margin_secs: u64,
}

impl Default for M2mConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: SecretString::from(String::new()),
            audience: None,
            refresh_margin_secs: 60,
        }
    }
}

impl M2mConfig {
    #[must_use]
    pub fn refresh_margin(&self) -> Duration {
        Duration::from_secs(self.refresh_margin_secs)
    }
}

/// End-user token verification.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JwtConfig {
    /// Expected `iss`; defaults to `https://{domain}/`.
    pub issuer: Option<String>,
    /// Expected `aud`; not checked when unset.
    pub audience: Option<String>,
    pub jwks_cache_ttl_secs: u64,
    pub leeway_secs: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            issuer: None,
            audience: None,
            jwks_cache_ttl_secs: 300,
            leeway_secs: 60,
        }
    }
}

impl JwtConfig {
    #[must_use]
    pub fn jwks_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.jwks_cache_ttl_secs)
    }
}

/// Outbound HTTP client settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl UserDirectoryConfig {
    /// Load from an optional YAML file, then apply `USER_DIRECTORY_*`
    /// environment overrides (`__` separates nested keys, e.g.
    /// `USER_DIRECTORY_M2M__CLIENT_ID`).
    ///
    /// # Errors
    ///
    /// Returns a figment error if a source cannot be read or a value has the
    /// wrong type or an unknown key.
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
    }
}
