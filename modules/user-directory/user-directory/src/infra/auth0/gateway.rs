//! Management API user endpoints.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use user_directory_sdk::{CriteriaType, UserMetadata};

use super::error_response::error_message;
use super::tenant_base_url;
use crate::domain::{DirectoryGateway, DirectoryUser, GatewayError};

#[derive(Serialize)]
struct MetadataPatch<'a> {
    user_metadata: &'a UserMetadata,
}

#[derive(Deserialize)]
struct MetadataPatchResponse {
    #[serde(default)]
    user_metadata: Option<UserMetadata>,
}

/// [`DirectoryGateway`] over the Auth0 Management API v2.
#[derive(Clone)]
pub struct Auth0DirectoryGateway {
    http: Client,
    base_url: String,
}

impl Auth0DirectoryGateway {
    /// Gateway for the tenant at `https://{domain}`.
    #[must_use]
    pub fn new(http: Client, domain: &str) -> Self {
        Self::with_base_url(http, tenant_base_url(domain))
    }

    /// Gateway for an explicit base URL (scheme, host and port).
    #[must_use]
    pub fn with_base_url(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { http, base_url }
    }

    fn user_url(&self, user_id: &str) -> String {
        format!(
            "{}/api/v2/users/{}",
            self.base_url,
            urlencoding::encode(user_id)
        )
    }

    fn search_url(&self, criteria: CriteriaType, term: &str) -> String {
        let term = urlencoding::encode(term);
        match criteria {
            CriteriaType::Email => {
                format!("{}/api/v2/users-by-email?email={term}", self.base_url)
            }
            CriteriaType::Username => format!(
                "{}/api/v2/users?q=identities.user_id:{term}&search_engine=v3",
                self.base_url
            ),
        }
    }

    /// Send `request` and return the body of a successful response.
    async fn send(request: RequestBuilder, token: &SecretString) -> Result<String, GatewayError> {
        let response = request
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = error_message(status, &body);
            tracing::debug!(status = status.as_u16(), %message, "directory rejected request");
            return Err(GatewayError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }
}

/// Decode a JSON body where both an empty body and `null` mean "nothing".
fn decode_optional<T: DeserializeOwned>(body: &str) -> Result<Option<T>, GatewayError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str::<Option<T>>(body).map_err(|e| GatewayError::Decode(e.to_string()))
}

#[async_trait]
impl DirectoryGateway for Auth0DirectoryGateway {
    async fn get_user(
        &self,
        token: &SecretString,
        user_id: &str,
    ) -> Result<Option<DirectoryUser>, GatewayError> {
        let body = Self::send(self.http.get(self.user_url(user_id)), token).await?;
        decode_optional(&body)
    }

    async fn search_users(
        &self,
        token: &SecretString,
        criteria: CriteriaType,
        term: &str,
    ) -> Result<Vec<DirectoryUser>, GatewayError> {
        let body = Self::send(self.http.get(self.search_url(criteria, term)), token).await?;
        Ok(decode_optional(&body)?.unwrap_or_default())
    }

    async fn patch_user_metadata(
        &self,
        token: &SecretString,
        user_id: &str,
        metadata: &UserMetadata,
    ) -> Result<Option<UserMetadata>, GatewayError> {
        let request = self
            .http
            .patch(self.user_url(user_id))
            .json(&MetadataPatch {
                user_metadata: metadata,
            });
        let body = Self::send(request, token).await?;
        let response: Option<MetadataPatchResponse> = decode_optional(&body)?;
        Ok(response.and_then(|r| r.user_metadata))
    }
}
