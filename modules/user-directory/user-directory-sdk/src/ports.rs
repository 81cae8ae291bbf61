//! Collaborator traits the user directory depends on.
//!
//! The module ships Auth0 implementations of both; consumers may swap in
//! their own (e.g. a shared token cache, or a verifier backed by a gateway).

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::{CredentialError, TokenError};
use crate::models::Claims;

/// Supplies a service-level bearer token (machine-to-machine).
///
/// Implementations own any caching and must be safe for concurrent use.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Return a currently valid service token.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError`] if the token endpoint cannot be reached,
    /// rejects the client, or answers with an unreadable payload.
    async fn get_token(&self) -> Result<SecretString, CredentialError>;
}

/// Verifies end-user bearer tokens.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Validate `token` and check that it grants `required_scope`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError`] if the token is malformed, expired, signed by
    /// an unknown key, issued for another issuer/audience, or lacks the scope.
    async fn verify(&self, token: &str, required_scope: &str) -> Result<Claims, TokenError>;
}
