//! Auth0 error bodies.
//!
//! Management API errors look like
//! `{"statusCode":404,"error":"Not Found","message":"The user does not exist.","errorCode":"inexistent_user"}`,
//! the token endpoint answers `{"error":"access_denied","error_description":"Unauthorized"}`.

use reqwest::StatusCode;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default, rename = "error_description")]
    pub error_description: Option<String>,
}

impl ErrorResponse {
    /// The most specific human-readable text in the body, if any.
    #[must_use]
    pub fn best_message(&self) -> Option<&str> {
        [&self.message, &self.error_description, &self.error]
            .into_iter()
            .filter_map(Option::as_deref)
            .map(str::trim)
            .find(|m| !m.is_empty())
    }
}

/// Message to report for a failed response with the given `body`.
///
/// Falls back to the canonical reason phrase when the body is not an Auth0
/// error object or carries no text.
#[must_use]
pub fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .as_ref()
        .and_then(ErrorResponse::best_message)
        .map_or_else(
            || {
                status
                    .canonical_reason()
                    .map_or_else(|| format!("status {}", status.as_u16()), str::to_owned)
            },
            str::to_owned,
        )
}
