//! Auth0 implementations of the directory gateway and its collaborators.
//!
//! - [`Auth0DirectoryGateway`] - Management API user endpoints
//! - [`M2mTokenManager`] - client-credentials token with caching
//! - [`JwtVerifier`] - RS256 verification against the tenant JWKS

pub mod error_response;
pub mod gateway;
pub mod jwt;
pub mod m2m;

pub use gateway::Auth0DirectoryGateway;
pub use jwt::JwtVerifier;
pub use m2m::M2mTokenManager;

/// A collaborator could not be built from the given configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
}

/// `https://{domain}` without a trailing slash.
///
/// A domain that already carries a scheme is used as is, which allows
/// plain-HTTP endpoints in local setups.
pub(crate) fn tenant_base_url(domain: &str) -> String {
    let domain = domain.trim().trim_end_matches('/');
    if domain.starts_with("https://") || domain.starts_with("http://") {
        domain.to_owned()
    } else {
        format!("https://{domain}")
    }
}
