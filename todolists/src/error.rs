//! Error types for remote calls and sync operations.

use thiserror::Error;

use crate::types::{TaskId, TodolistId};

/// Result type alias for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Failure reported by a [`RemoteApi`](crate::api::RemoteApi) call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (connection, DNS, TLS)
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The server answered with a non-success HTTP status
    #[error("Server returned {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// The response body could not be decoded
    #[error("Failed to parse response: {0}")]
    ResponseParseFailed(String),

    /// The transport succeeded but the server rejected the operation
    #[error("Rejected by server: {}", messages.join("; "))]
    Rejected {
        /// Messages supplied by the server
        messages: Vec<String>,
    },
}

/// Failure of a sync operation, as returned to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The remote call failed
    #[error(transparent)]
    Remote(#[from] ApiError),

    /// The task to update is not in local state
    #[error("Task {task_id} not found in todolist {todolist_id}")]
    TaskNotFound {
        /// Bucket that was searched
        todolist_id: TodolistId,
        /// Missing task
        task_id: TaskId,
    },

    /// Title is empty after trimming
    #[error("Title must not be empty")]
    EmptyTitle,

    /// The store could not deliver the outcome
    #[error("Store error: {0}")]
    Store(String),
}

impl SyncError {
    /// Whether the failure happened before any remote call was made.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::TaskNotFound { .. } | Self::EmptyTitle)
    }
}

impl From<todosync_runtime::StoreError> for SyncError {
    fn from(error: todosync_runtime::StoreError) -> Self {
        Self::Store(error.to_string())
    }
}
