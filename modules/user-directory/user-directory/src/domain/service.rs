//! Identity resolution and the metadata mutation gate.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};
use user_directory_sdk::{
    CredentialProvider, CriteriaType, READ_SCOPE, TokenError, TokenVerifier, UPDATE_SCOPE, User,
};

use super::disambiguation::select_candidate;
use super::error::DomainError;
use super::lookup::{LookupStrategy, classify};
use super::ports::{DirectoryGateway, GatewayError};
use crate::redaction::{redact, redact_email};

// ============================================================================
// Service Configuration
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    /// Directory tenant domain, e.g. `tenant.eu.auth0.com`.
    pub domain: String,
}

// ============================================================================
// Service Implementation
// ============================================================================

/// Resolves caller identifiers into directory users and updates metadata.
///
/// Holds no per-request state; one instance serves all callers.
pub struct Service {
    gateway: Arc<dyn DirectoryGateway>,
    credentials: Arc<dyn CredentialProvider>,
    verifier: Arc<dyn TokenVerifier>,
    config: ServiceConfig,
}

impl Service {
    #[must_use]
    pub fn new(
        gateway: Arc<dyn DirectoryGateway>,
        credentials: Arc<dyn CredentialProvider>,
        verifier: Arc<dyn TokenVerifier>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            gateway,
            credentials,
            verifier,
            config,
        }
    }

    /// Fetch a user by directory id.
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty id or a missing domain
    /// - `Unexpected` if no service token could be obtained
    /// - status-mapped errors from the directory, `NotFound` for an empty answer
    #[tracing::instrument(skip_all, fields(user_id = %redact(&user.user_id)))]
    pub async fn get_user(&self, user: &User) -> Result<User, DomainError> {
        if user.user_id.trim().is_empty() {
            return Err(DomainError::validation(
                "user_id",
                "user id is required to get a user",
            ));
        }
        self.ensure_domain()?;

        let token = self.read_token(user).await?;

        let found = self
            .gateway
            .get_user(&token, &user.user_id)
            .await
            .map_err(|e| match e {
                GatewayError::Status { status, message } => {
                    DomainError::from_status(status, message)
                }
                other => DomainError::unexpected("failed to get user", other),
            })?;

        let Some(found) = found else {
            debug!("directory answered without a user object");
            return Err(DomainError::user_not_found());
        };

        debug!("user retrieved");
        Ok(User::from(found))
    }

    /// Search a user by email or username and confirm the match.
    ///
    /// # Errors
    ///
    /// - `Validation` for an unknown criteria, an empty term, or a missing domain
    /// - `Unexpected` if no service token could be obtained or the search failed
    /// - `NotFound` if no candidate survives disambiguation
    #[tracing::instrument(skip_all, fields(criteria = %criteria))]
    pub async fn search_user(&self, user: &User, criteria: &str) -> Result<User, DomainError> {
        let criteria: CriteriaType = criteria.parse()?;
        self.ensure_domain()?;

        let term = match criteria {
            CriteriaType::Email => user.primary_email.trim().to_lowercase(),
            CriteriaType::Username => user.username.trim().to_owned(),
        };
        if term.is_empty() {
            return Err(DomainError::validation(
                criteria.as_str(),
                format!("{criteria} is required to search a user"),
            ));
        }

        let token = self.read_token(user).await?;

        debug!(term = %redact_term(criteria, &term), "searching directory");
        let candidates = self
            .gateway
            .search_users(&token, criteria, &term)
            .await
            .map_err(|e| DomainError::unexpected("failed to search user", e))?;

        debug!(candidates = candidates.len(), "search returned");
        select_candidate(candidates, criteria, &term)
    }

    /// Turn a raw identifier into a lookup-ready user record.
    ///
    /// # Errors
    ///
    /// - `Validation` for blank input
    /// - the verifier's own `Token` error for token-shaped input that fails
    #[tracing::instrument(skip_all)]
    pub async fn metadata_lookup(&self, input: &str) -> Result<User, DomainError> {
        let strategy = classify(input)
            .ok_or_else(|| DomainError::validation("input", "input is required"))?;

        match strategy {
            LookupStrategy::Token(token) => {
                debug!("token lookup strategy");
                let claims = self.verifier.verify(&token, READ_SCOPE).await?;
                let subject = claims.subject().to_owned();
                debug!(sub = %redact(&subject), "token verified for lookup");
                Ok(User {
                    user_id: subject.clone(),
                    sub: subject,
                    token: Some(SecretString::from(token)),
                    ..User::default()
                })
            }
            LookupStrategy::CanonicalSubject(subject) => {
                debug!(sub = %redact(&subject), "canonical subject lookup strategy");
                Ok(User::with_user_id(subject))
            }
            LookupStrategy::Username(username) => {
                debug!(username = %redact(&username), "username lookup strategy");
                Ok(User::with_username(username))
            }
        }
    }

    /// Replace the metadata of the user the caller's token belongs to.
    ///
    /// The target is always the verified token subject; `user.user_id` is
    /// ignored.
    ///
    /// # Errors
    ///
    /// - `Token` if the token is absent or fails verification for the update scope
    /// - `Validation` for a missing domain or missing metadata
    /// - `Unexpected` if the patch call failed
    #[tracing::instrument(skip_all)]
    pub async fn update_user(&self, user: &User) -> Result<User, DomainError> {
        let token = user
            .token
            .as_ref()
            .filter(|t| !t.expose_secret().trim().is_empty())
            .ok_or(TokenError::Missing)?;

        let claims = self
            .verifier
            .verify(token.expose_secret(), UPDATE_SCOPE)
            .await?;
        let target = claims.subject();

        self.ensure_domain()?;
        let Some(metadata) = user.user_metadata.as_ref() else {
            return Err(DomainError::validation(
                "user_metadata",
                "user metadata is required for update",
            ));
        };

        let stored = self
            .gateway
            .patch_user_metadata(token, target, metadata)
            .await
            .map_err(|e| DomainError::unexpected("failed to update user", e))?;

        info!(user_id = %redact(target), "user metadata updated");
        Ok(User {
            user_metadata: stored,
            ..User::default()
        })
    }

    /// Pick the bearer token for a read: the caller's own, or a service token.
    async fn read_token(&self, user: &User) -> Result<SecretString, DomainError> {
        if let Some(token) = user
            .token
            .as_ref()
            .filter(|t| !t.expose_secret().is_empty())
        {
            return Ok(token.clone());
        }

        debug!("no caller token, using service credentials");
        self.credentials
            .get_token()
            .await
            .map_err(|e| DomainError::unexpected("failed to get M2M token", e))
    }

    fn ensure_domain(&self) -> Result<(), DomainError> {
        if self.config.domain.trim().is_empty() {
            return Err(DomainError::validation(
                "domain",
                "directory domain is not configured",
            ));
        }
        Ok(())
    }
}

fn redact_term(criteria: CriteriaType, term: &str) -> String {
    match criteria {
        CriteriaType::Email => redact_email(term),
        CriteriaType::Username => redact(term),
    }
}
