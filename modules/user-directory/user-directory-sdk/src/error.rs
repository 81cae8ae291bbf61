//! Public error types for the `user_directory` module.
//!
//! These errors are safe to expose to other modules and consumers.

use thiserror::Error;

/// Errors produced by a [`TokenVerifier`](crate::TokenVerifier).
///
/// The module passes these through to its callers unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// No token was presented where one is mandatory.
    #[error("token is required")]
    Missing,

    /// The token could not be parsed as a JWT.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// The token is past its expiry.
    #[error("token expired")]
    Expired,

    /// Signature, issuer, audience or claim validation failed.
    #[error("invalid token: {0}")]
    Invalid(String),

    /// The token is valid but does not grant the required scope.
    #[error("insufficient scope: '{required}' is required")]
    InsufficientScope { required: String },

    /// Signing keys could not be obtained from the issuer.
    #[error("signing keys unavailable: {0}")]
    KeysUnavailable(String),
}

/// Errors produced by a [`CredentialProvider`](crate::CredentialProvider).
#[derive(Error, Debug, Clone)]
pub enum CredentialError {
    /// The token endpoint could not be reached.
    #[error("token request failed: {0}")]
    Request(String),

    /// The token endpoint answered with a non-success status.
    #[error("token endpoint rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The token endpoint answered with an unreadable payload.
    #[error("invalid token response: {0}")]
    Decode(String),
}

/// Errors that can be returned by the `UserDirectoryClient`.
#[derive(Error, Debug, Clone)]
pub enum UserDirectoryError {
    /// Malformed or missing required input.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// No user matched.
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// The directory refused the credential.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// The directory denied access to the resource.
    #[error("Access denied: {message}")]
    Forbidden { message: String },

    /// The directory reported a conflicting state.
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// The directory is temporarily unavailable or rate limiting.
    #[error("Service unavailable: {message}")]
    ServiceUnavailable { message: String },

    /// Transport, credential acquisition, or other unexpected failure.
    #[error("Unexpected error: {message}")]
    Unexpected { message: String },

    /// Token verification failed; carries the verifier's error as is.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// The caller cancelled the operation.
    #[error("Operation cancelled")]
    Cancelled,
}

impl UserDirectoryError {
    /// Create a Validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a `NotFound` error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an Unexpected error.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }
}
