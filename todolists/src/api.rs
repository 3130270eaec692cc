//! Remote API contract.
//!
//! The engine only ever talks to the backend through this trait. Every call
//! either resolves to a typed result or to an [`ApiError`]; no call is
//! retried by the engine.

use std::future::Future;
use std::pin::Pin;

use crate::error::ApiError;
use crate::types::{GetTasksResponse, Task, TaskId, Todolist, TodolistId, UpdateTaskModel};

/// Boxed future returned by [`RemoteApi`] methods.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// Backend holding todolists and tasks.
///
/// # Dyn Compatibility
///
/// Methods return boxed futures instead of using `async fn` so the API can
/// be shared as `Arc<dyn RemoteApi>` and captured by effects.
pub trait RemoteApi: Send + Sync {
    /// List all todolists in server order.
    fn get_todolists(&self) -> ApiFuture<'_, Vec<Todolist>>;

    /// Create a todolist and return the stored entity.
    fn create_todolist(&self, title: String) -> ApiFuture<'_, Todolist>;

    /// Delete a todolist.
    fn delete_todolist(&self, id: TodolistId) -> ApiFuture<'_, ()>;

    /// Rename a todolist.
    fn rename_todolist(&self, id: TodolistId, title: String) -> ApiFuture<'_, ()>;

    /// List the tasks of one todolist.
    ///
    /// An application-level failure is carried in
    /// [`GetTasksResponse::error`]; callers check it with
    /// [`GetTasksResponse::into_items`].
    fn get_tasks(&self, todolist_id: TodolistId) -> ApiFuture<'_, GetTasksResponse>;

    /// Create a task and return the stored entity.
    fn create_task(&self, todolist_id: TodolistId, title: String) -> ApiFuture<'_, Task>;

    /// Delete a task.
    fn delete_task(&self, todolist_id: TodolistId, task_id: TaskId) -> ApiFuture<'_, ()>;

    /// Replace a task's editable fields and return the entity as the server
    /// stored it (possibly normalised).
    fn update_task(
        &self,
        todolist_id: TodolistId,
        task_id: TaskId,
        model: UpdateTaskModel,
    ) -> ApiFuture<'_, Task>;
}
