//! Public API trait for the user directory.
//!
//! This trait defines the interface consumers use to resolve users and to
//! update the caller's own metadata. The module implements it on top of the
//! directory gateway, the token verifier and the credential provider.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::UserDirectoryError;
use crate::models::User;

/// Public API trait for the user directory.
///
/// Every operation takes a [`CancellationToken`]. Cancelling it aborts the
/// in-flight directory or verifier call and the operation returns
/// [`UserDirectoryError::Cancelled`].
///
/// ```ignore
/// let user = directory.metadata_lookup(&cancel, raw_input).await?;
/// let user = if user.user_id.is_empty() {
///     directory.search_user(&cancel, user, "username").await?
/// } else {
///     directory.get_user(&cancel, user).await?
/// };
/// ```
///
/// # Security
///
/// Reads fall back to a machine-to-machine credential when the caller did not
/// present a token. Writes never do: [`update_user`](Self::update_user)
/// requires a caller token verified for the update scope, and the target user
/// is always the token subject.
#[async_trait]
pub trait UserDirectoryClient: Send + Sync {
    /// Fetch a user by its directory id (`user.user_id`).
    ///
    /// # Errors
    ///
    /// - `Validation` if `user_id` is empty or the directory domain is not configured
    /// - `NotFound` if the directory has no such user
    /// - `Unauthorized` / `Forbidden` / `Conflict` / `ServiceUnavailable` per directory status
    /// - `Unexpected` if no credential could be obtained or the call failed in transit
    /// - `Cancelled` if `cancel` fired first
    async fn get_user(
        &self,
        cancel: &CancellationToken,
        user: User,
    ) -> Result<User, UserDirectoryError>;

    /// Search a user by `criteria` (`"email"` or `"username"`).
    ///
    /// The search term is taken from `user.primary_email` or `user.username`.
    ///
    /// # Errors
    ///
    /// - `Validation` for an unknown criteria, an empty search term, or a missing domain
    /// - `NotFound` if no candidate carries a matching password-database identity
    /// - `Unexpected` if the search call fails
    /// - `Cancelled` if `cancel` fired first
    async fn search_user(
        &self,
        cancel: &CancellationToken,
        user: User,
        criteria: &str,
    ) -> Result<User, UserDirectoryError>;

    /// Classify a raw identifier into a lookup-ready [`User`].
    ///
    /// Token-shaped input is verified for the read scope; input containing
    /// `|` is taken as a canonical subject; anything else is a username.
    ///
    /// # Errors
    ///
    /// - `Validation` if the input is blank
    /// - `Token` with the verifier's own error if token-shaped input fails verification
    /// - `Cancelled` if `cancel` fired first
    async fn metadata_lookup(
        &self,
        cancel: &CancellationToken,
        input: &str,
    ) -> Result<User, UserDirectoryError>;

    /// Replace the caller's `user_metadata`.
    ///
    /// The returned [`User`] only carries `user_metadata`; every other field
    /// is left empty on purpose.
    ///
    /// # Errors
    ///
    /// - `Token` if the token is missing or fails verification for the update scope
    /// - `Validation` if `user_metadata` is `None` or the domain is not configured
    /// - `Unexpected` if the patch call fails
    /// - `Cancelled` if `cancel` fired first
    async fn update_user(
        &self,
        cancel: &CancellationToken,
        user: User,
    ) -> Result<User, UserDirectoryError>;
}
