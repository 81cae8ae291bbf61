//! Raw directory records, as returned by the Management API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use user_directory_sdk::{User, UserMetadata};

/// Connection that owns username/password identities.
pub const PASSWORD_CONNECTION: &str = "Username-Password-Authentication";

/// A user object as the directory returns it.
///
/// Read-only: translated into [`User`] before it leaves the module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryUser {
    #[serde(default)]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default)]
    pub identities: Vec<Identity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_metadata: Option<UserMetadata>,
}

/// One authentication method attached to a directory user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub connection: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Provider-specific id. Most connections use a string, some social
    /// providers send numbers, so the type is only known after inspection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<IdentityUserId>,
    #[serde(default, rename = "isSocial", skip_serializing_if = "Option::is_none")]
    pub is_social: Option<bool>,
}

/// The directory-defined `identities[].user_id` value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdentityUserId {
    Text(String),
    Other(Value),
}

impl IdentityUserId {
    /// The id as a string, if the directory sent one.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Other(_) => None,
        }
    }
}

impl Identity {
    /// `true` if the identity belongs to the username/password database.
    #[must_use]
    pub fn is_password_identity(&self) -> bool {
        self.connection == PASSWORD_CONNECTION
    }
}

impl From<DirectoryUser> for User {
    fn from(d: DirectoryUser) -> Self {
        Self {
            user_id: d.user_id,
            username: d.username.unwrap_or_default(),
            primary_email: d.email.unwrap_or_default(),
            sub: String::new(),
            token: None,
            user_metadata: d.user_metadata,
        }
    }
}

impl From<&User> for DirectoryUser {
    fn from(u: &User) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_owned());
        Self {
            user_id: u.user_id.clone(),
            email: non_empty(&u.primary_email),
            username: non_empty(&u.username),
            user_metadata: u.user_metadata.clone(),
            ..Self::default()
        }
    }
}
