//! User Directory SDK
//!
//! This crate provides the public API for the `user_directory` module:
//!
//! - [`UserDirectoryClient`] - Public API trait for consumers
//! - [`CredentialProvider`] / [`TokenVerifier`] - Collaborator traits the module depends on
//! - [`User`], [`UserMetadata`], [`Claims`], [`CriteriaType`] - Models
//! - [`UserDirectoryError`], [`TokenError`], [`CredentialError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use tokio_util::sync::CancellationToken;
//! use user_directory_sdk::UserDirectoryClient;
//!
//! let cancel = CancellationToken::new();
//!
//! // Resolve whatever the caller sent us (token, `auth0|...` subject, or username)
//! let user = directory.metadata_lookup(&cancel, "alice").await?;
//!
//! // Then fetch the canonical record
//! let user = directory.search_user(&cancel, user, "username").await?;
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod error;
pub mod models;
pub mod ports;

// Re-export main types at crate root
pub use api::UserDirectoryClient;
pub use error::{CredentialError, TokenError, UserDirectoryError};
pub use models::{Claims, ClaimsBuilder, CriteriaType, UnknownCriteria, User, UserMetadata};
pub use ports::{CredentialProvider, TokenVerifier};

/// Scope a token must carry to read the caller's own profile.
pub const READ_SCOPE: &str = "read:current_user";

/// Scope a token must carry to update the caller's own metadata.
pub const UPDATE_SCOPE: &str = "update:current_user_metadata";
