//! Domain models for the user directory.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Working user record passed through a single request.
///
/// Created fresh per request and enriched step by step: the lookup sets
/// `username`/`user_id`/`sub`, reads and writes set `token` and
/// `user_metadata`. Nothing is cached between requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    /// Directory-assigned id (`auth0|...`), or empty when unknown.
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub primary_email: String,
    /// Subject of a verified token; empty until verification happened.
    #[serde(default)]
    pub sub: String,
    /// Bearer credential used for directory calls. Never serialized.
    /// Wrapped in `SecretString` so `Debug` redacts the value automatically.
    #[serde(skip)]
    pub token: Option<SecretString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_metadata: Option<UserMetadata>,
}

impl User {
    /// Start a record for a username lookup.
    pub fn with_username(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }

    /// Start a record for an email lookup.
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            primary_email: email.into(),
            ..Self::default()
        }
    }

    /// Start a record for a direct lookup by directory id.
    pub fn with_user_id(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    /// Attach a bearer token.
    #[must_use]
    pub fn token(mut self, token: impl Into<SecretString>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Attach a metadata payload.
    #[must_use]
    pub fn metadata(mut self, metadata: UserMetadata) -> Self {
        self.user_metadata = Some(metadata);
        self
    }
}

/// Opaque `user_metadata` object as stored by the directory.
///
/// The module never interprets the keys; it only carries the object between
/// the caller and the directory, so it round-trips exactly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserMetadata(Map<String, Value>);

impl UserMetadata {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Map<String, Value>> for UserMetadata {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for UserMetadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Verified token claims.
///
/// Only a [`TokenVerifier`](crate::TokenVerifier) builds these, after the
/// token signature, expiry and issuer were checked.
#[derive(Debug, Clone)]
pub struct Claims {
    /// Canonical directory id of the token owner.
    subject: String,
    /// Granted permissions, already split from the `scope`/`permissions` claims.
    scopes: Vec<String>,
}

impl Claims {
    /// Create a new `Claims` builder
    #[must_use]
    pub fn builder() -> ClaimsBuilder {
        ClaimsBuilder::default()
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// `true` if `scope` is among the granted scopes.
    #[must_use]
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }
}

#[derive(Default)]
pub struct ClaimsBuilder {
    subject: Option<String>,
    scopes: Vec<String>,
}

impl ClaimsBuilder {
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    #[must_use]
    pub fn scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Append scopes, e.g. from a `permissions` claim.
    #[must_use]
    pub fn extend_scopes(mut self, scopes: impl IntoIterator<Item = String>) -> Self {
        self.scopes.extend(scopes);
        self
    }

    /// Parse a space-delimited OAuth `scope` string and append its entries.
    #[must_use]
    pub fn scope_string(mut self, scope: &str) -> Self {
        self.scopes
            .extend(scope.split_whitespace().map(str::to_owned));
        self
    }

    #[must_use]
    pub fn build(self) -> Claims {
        let mut seen = HashSet::new();
        let mut scopes = self.scopes;
        scopes.retain(|s| seen.insert(s.clone()));
        Claims {
            subject: self.subject.unwrap_or_default(),
            scopes,
        }
    }
}

/// Search criteria accepted by `search_user`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CriteriaType {
    /// Match on the primary email (`users-by-email`).
    Email,
    /// Match on the password-database identity id (`identities.user_id`).
    Username,
}

impl CriteriaType {
    pub const EMAIL: &'static str = "email";
    pub const USERNAME: &'static str = "username";

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => Self::EMAIL,
            Self::Username => Self::USERNAME,
        }
    }
}

impl fmt::Display for CriteriaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a criteria string is neither `email` nor `username`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid criteria type: {0}")]
pub struct UnknownCriteria(pub String);

impl FromStr for CriteriaType {
    type Err = UnknownCriteria;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::EMAIL => Ok(Self::Email),
            Self::USERNAME => Ok(Self::Username),
            other => Err(UnknownCriteria(other.to_owned())),
        }
    }
}
