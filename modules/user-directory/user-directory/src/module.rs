//! User directory module bootstrap.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use tracing::info;
use user_directory_sdk::{CredentialProvider, TokenVerifier, UserDirectoryClient};

use crate::config::UserDirectoryConfig;
use crate::domain::{DirectoryGateway, Service, ServiceConfig, UserDirectoryLocalClient};
use crate::infra::auth0::{Auth0DirectoryGateway, JwtVerifier, M2mTokenManager};
use crate::redaction::redact;

/// User directory module.
///
/// Wires the Auth0 collaborators into the service:
/// 1. Builds the shared HTTP client
/// 2. Creates the M2M token manager and the JWT verifier
/// 3. Returns the local client as `Arc<dyn UserDirectoryClient>`
///
/// Any construction failure aborts the build; there is no partially working
/// instance.
pub struct UserDirectoryModule;

impl UserDirectoryModule {
    /// Build the client from configuration.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client, the M2M token manager or the JWT verifier
    /// cannot be constructed from `cfg`.
    #[tracing::instrument(skip_all, fields(domain))]
    pub fn build(cfg: &UserDirectoryConfig) -> anyhow::Result<Arc<dyn UserDirectoryClient>> {
        tracing::Span::current().record("domain", cfg.domain.as_str());
        info!("Initializing user_directory");

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.http.timeout_secs))
            .connect_timeout(Duration::from_secs(cfg.http.connect_timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        let credentials: Arc<dyn CredentialProvider> = Arc::new(
            M2mTokenManager::new(http.clone(), &cfg.domain, &cfg.m2m)
                .context("failed to create M2M token manager")?,
        );
        info!(client_id = %redact(&cfg.m2m.client_id), "M2M token manager ready");

        let verifier = JwtVerifier::new(http.clone(), &cfg.domain, &cfg.jwt)
            .context("failed to create JWT verifier")?;
        info!(issuer = %verifier.issuer(), "JWT verifier ready");
        let verifier: Arc<dyn TokenVerifier> = Arc::new(verifier);

        let gateway: Arc<dyn DirectoryGateway> =
            Arc::new(Auth0DirectoryGateway::new(http, &cfg.domain));

        Ok(Self::with_collaborators(
            gateway,
            credentials,
            verifier,
            ServiceConfig {
                domain: cfg.domain.clone(),
            },
        ))
    }

    /// Build the client around caller-supplied collaborators.
    #[must_use]
    pub fn with_collaborators(
        gateway: Arc<dyn DirectoryGateway>,
        credentials: Arc<dyn CredentialProvider>,
        verifier: Arc<dyn TokenVerifier>,
        config: ServiceConfig,
    ) -> Arc<dyn UserDirectoryClient> {
        let svc = Arc::new(Service::new(gateway, credentials, verifier, config));
        Arc::new(UserDirectoryLocalClient::new(svc))
    }
}
