//! Post-filtering of directory search results.
//!
//! The directory evaluates `identities.user_id:X` against every identity of a
//! user, regardless of the connection it belongs to. A search can therefore
//! return users whose *social* identity id matches while their password
//! identity is someone else. Every candidate is re-checked here against the
//! password connection before it is accepted.

use user_directory_sdk::{CriteriaType, User};

use super::directory::DirectoryUser;
use super::error::DomainError;
use crate::redaction::redact;

/// Choose the search result that satisfies the connection constraint.
///
/// Candidates and their identities are scanned in directory order and the
/// first password identity decides:
///
/// - its id is not a string: skipped, scanning continues;
/// - username search and the id differs from `requested`: the directory
///   matched on some other identity, so the search fails as not found and
///   later candidates are not examined;
/// - otherwise the candidate is returned with `username` set to that id.
///
/// # Errors
///
/// Returns [`DomainError::NotFound`] when no candidate qualifies or a
/// username search hits a password identity with a different id.
pub fn select_candidate(
    candidates: Vec<DirectoryUser>,
    criteria: CriteriaType,
    requested: &str,
) -> Result<User, DomainError> {
    for candidate in candidates {
        let confirmed = candidate
            .identities
            .iter()
            .filter(|identity| identity.is_password_identity())
            .find_map(|identity| {
                let id = identity.user_id.as_ref().and_then(|id| id.as_text());
                if id.is_none() {
                    tracing::debug!(
                        user_id = %redact(&candidate.user_id),
                        "password identity without a string id, skipping"
                    );
                }
                id.map(str::to_owned)
            });

        let Some(confirmed) = confirmed else {
            continue;
        };

        if criteria == CriteriaType::Username && confirmed != requested {
            tracing::debug!(
                requested = %redact(requested),
                found = %redact(&confirmed),
                "search matched a different password identity"
            );
            return Err(DomainError::user_not_found());
        }

        let mut user = User::from(candidate);
        user.username = confirmed;
        return Ok(user);
    }

    Err(DomainError::user_not_found())
}
