//! Synchronization protocol shared by every networked operation.
//!
//! An operation is: signal `loading`, make exactly one remote call, signal
//! `succeeded` or `failed`, and produce the outcome action. The outcome is
//! merged into state by the owning reducer; nothing is mutated before the
//! call resolves and nothing is retried.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use todosync_core::async_effect;
use todosync_core::effect::Effect;
use todosync_runtime::metrics::SyncMetrics;

use crate::api::RemoteApi;
use crate::environment::SyncEnvironment;
use crate::error::{ApiError, SyncError};
use crate::status::RequestStatus;
use crate::types::RequestId;

/// Build the effect performing one remote call.
///
/// `call` receives the shared API handle and returns the call's future;
/// `on_success` and `on_failure` turn its result into the outcome action.
pub fn remote_call<A, T, F, Fut, S, E>(
    env: &SyncEnvironment,
    operation: &'static str,
    request_id: RequestId,
    call: F,
    on_success: S,
    on_failure: E,
) -> Effect<A>
where
    A: Send + 'static,
    T: Send + 'static,
    F: FnOnce(Arc<dyn RemoteApi>) -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    S: FnOnce(T) -> A + Send + 'static,
    E: FnOnce(SyncError) -> A + Send + 'static,
{
    let api = Arc::clone(&env.api);
    let status = Arc::clone(&env.status);

    async_effect! {
        status.report(RequestStatus::Loading);
        SyncMetrics::record_started();
        let started = Instant::now();

        let result = call(api).await;
        let elapsed = started.elapsed();

        match result {
            Ok(value) => {
                SyncMetrics::record_outcome(operation, true, elapsed);
                tracing::debug!(
                    operation,
                    %request_id,
                    elapsed_ms = elapsed.as_millis(),
                    "Remote call succeeded"
                );
                status.report(RequestStatus::Succeeded);
                Some(on_success(value))
            },
            Err(error) => {
                SyncMetrics::record_outcome(operation, false, elapsed);
                tracing::warn!(operation, %request_id, %error, "Remote call failed");
                status.report(RequestStatus::Failed);
                Some(on_failure(SyncError::Remote(error)))
            },
        }
    }
}

/// Build the effect reporting an operation rejected before any remote call.
pub fn local_failure<A, E>(
    env: &SyncEnvironment,
    operation: &'static str,
    request_id: RequestId,
    error: SyncError,
    on_failure: E,
) -> Effect<A>
where
    A: Send + 'static,
    E: FnOnce(SyncError) -> A + Send + 'static,
{
    let status = Arc::clone(&env.status);

    async_effect! {
        SyncMetrics::record_local_failure(operation);
        tracing::warn!(operation, %request_id, %error, "Operation rejected locally");
        status.report(RequestStatus::Failed);
        Some(on_failure(error))
    }
}

/// Trimmed title, or [`SyncError::EmptyTitle`].
///
/// # Errors
///
/// Returns [`SyncError::EmptyTitle`] if nothing is left after trimming.
pub fn validate_title(title: &str) -> Result<String, SyncError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        Err(SyncError::EmptyTitle)
    } else {
        Ok(trimmed.to_string())
    }
}
