//! Domain errors for the user directory.

use user_directory_sdk::{TokenError, UnknownCriteria, UserDirectoryError};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Internal domain errors.
#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    #[error("validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("{0}")]
    NotFound(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("directory unavailable: {0}")]
    Unavailable(String),

    #[error("{message}")]
    Unexpected {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("operation cancelled")]
    Cancelled,
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn user_not_found() -> Self {
        Self::NotFound("user not found".to_owned())
    }

    pub fn unexpected(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Unexpected {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Translate a directory HTTP status into the matching domain error.
    ///
    /// `message` is the directory's own explanation when it sent one.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 => Self::validation("request", message),
            401 => Self::Unauthorized(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            429 | 502..=504 => Self::Unavailable(message),
            _ => Self::Unexpected {
                message: format!("directory responded with status {status}: {message}"),
                source: None,
            },
        }
    }

    /// `true` for outcomes that are a normal answer rather than a fault.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Validation { .. } | Self::Token(_) | Self::Cancelled
        )
    }
}

impl From<UnknownCriteria> for DomainError {
    fn from(e: UnknownCriteria) -> Self {
        Self::validation("criteria", e.to_string())
    }
}

/// Convert domain errors to SDK errors for public API consumption.
impl From<DomainError> for UserDirectoryError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation { field, message } => {
                Self::validation(format!("{field}: {message}"))
            }
            DomainError::NotFound(message) => Self::not_found(message),
            DomainError::Unauthorized(message) => Self::Unauthorized { message },
            DomainError::Forbidden(message) => Self::Forbidden { message },
            DomainError::Conflict(message) => Self::Conflict { message },
            DomainError::Unavailable(message) => Self::ServiceUnavailable { message },
            DomainError::Unexpected { message, source } => match source {
                Some(source) => Self::unexpected(format!("{message}: {source}")),
                None => Self::unexpected(message),
            },
            DomainError::Token(e) => Self::Token(e),
            DomainError::Cancelled => Self::Cancelled,
        }
    }
}
