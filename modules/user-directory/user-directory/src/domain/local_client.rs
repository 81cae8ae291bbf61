//! Local (in-process) client for the user directory.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use user_directory_sdk::{User, UserDirectoryClient, UserDirectoryError};

use super::{DomainError, Service};

/// Local client wrapping the service.
///
/// Handed out by the module bootstrap as `Arc<dyn UserDirectoryClient>`.
pub struct UserDirectoryLocalClient {
    svc: Arc<Service>,
}

impl UserDirectoryLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

fn log_and_convert(op: &str, e: DomainError) -> UserDirectoryError {
    if e.is_expected() {
        tracing::debug!(operation = op, error = %e, "user_directory call returned");
    } else {
        tracing::error!(operation = op, error = %e, "user_directory call failed");
    }
    e.into()
}

/// Race `fut` against `cancel`; the future is dropped if cancellation wins.
async fn cancellable<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = Result<T, DomainError>>,
) -> Result<T, DomainError> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(DomainError::Cancelled),
        res = fut => res,
    }
}

#[async_trait]
impl UserDirectoryClient for UserDirectoryLocalClient {
    async fn get_user(
        &self,
        cancel: &CancellationToken,
        user: User,
    ) -> Result<User, UserDirectoryError> {
        cancellable(cancel, self.svc.get_user(&user))
            .await
            .map_err(|e| log_and_convert("get_user", e))
    }

    async fn search_user(
        &self,
        cancel: &CancellationToken,
        user: User,
        criteria: &str,
    ) -> Result<User, UserDirectoryError> {
        cancellable(cancel, self.svc.search_user(&user, criteria))
            .await
            .map_err(|e| log_and_convert("search_user", e))
    }

    async fn metadata_lookup(
        &self,
        cancel: &CancellationToken,
        input: &str,
    ) -> Result<User, UserDirectoryError> {
        cancellable(cancel, self.svc.metadata_lookup(input))
            .await
            .map_err(|e| log_and_convert("metadata_lookup", e))
    }

    async fn update_user(
        &self,
        cancel: &CancellationToken,
        user: User,
    ) -> Result<User, UserDirectoryError> {
        cancellable(cancel, self.svc.update_user(&user))
            .await
            .map_err(|e| log_and_convert("update_user", e))
    }
}
