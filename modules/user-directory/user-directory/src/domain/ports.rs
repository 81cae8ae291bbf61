//! Outbound ports of the domain layer.

use async_trait::async_trait;
use secrecy::SecretString;
use user_directory_sdk::{CriteriaType, UserMetadata};

use super::directory::DirectoryUser;

/// Failure talking to the directory.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The directory answered with a non-success status.
    #[error("directory returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("directory request failed: {0}")]
    Transport(String),

    #[error("failed to decode directory response: {0}")]
    Decode(String),
}

/// Authenticated access to the directory's user endpoints.
///
/// Every call carries the bearer token chosen by the service; the gateway
/// never picks credentials on its own.
#[async_trait]
pub trait DirectoryGateway: Send + Sync {
    /// Fetch one user by directory id. `Ok(None)` when the directory
    /// answered successfully but without a user object.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Status`] carries the directory's own message.
    async fn get_user(
        &self,
        token: &SecretString,
        user_id: &str,
    ) -> Result<Option<DirectoryUser>, GatewayError>;

    /// Run a search on the endpoint that belongs to `criteria`.
    ///
    /// # Errors
    ///
    /// Any [`GatewayError`]; the term is escaped by the implementation.
    async fn search_users(
        &self,
        token: &SecretString,
        criteria: CriteriaType,
        term: &str,
    ) -> Result<Vec<DirectoryUser>, GatewayError>;

    /// Replace `user_metadata` fields of one user and return the stored
    /// metadata as the directory echoes it.
    ///
    /// # Errors
    ///
    /// Any [`GatewayError`].
    async fn patch_user_metadata(
        &self,
        token: &SecretString,
        user_id: &str,
        metadata: &UserMetadata,
    ) -> Result<Option<UserMetadata>, GatewayError>;
}
