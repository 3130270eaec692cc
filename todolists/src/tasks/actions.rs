//! Task store actions.

use todosync_macros::Action;

use crate::error::SyncError;
use crate::todolists::TodolistLifecycle;
use crate::types::{RequestId, Task, TaskId, TaskPatch, TodolistId};

/// Inputs of the task store.
#[derive(Action, Clone, Debug, PartialEq, Eq)]
pub enum TaskAction {
    /// Load the tasks of one todolist.
    #[intent]
    FetchTasks {
        /// Correlation id
        request_id: RequestId,
        /// Bucket to load
        todolist_id: TodolistId,
    },

    /// Tasks arrived; they replace the bucket.
    #[outcome]
    TasksFetched {
        /// Correlation id
        request_id: RequestId,
        /// Bucket that was loaded
        todolist_id: TodolistId,
        /// Tasks in server order
        tasks: Vec<Task>,
    },

    /// Create a task in a todolist.
    #[intent]
    CreateTask {
        /// Correlation id
        request_id: RequestId,
        /// Owning list
        todolist_id: TodolistId,
        /// Title; must not be blank
        title: String,
    },

    /// The backend stored a new task.
    ///
    /// It is merged into the bucket named by the task's own `todo_list_id`.
    #[outcome]
    TaskCreated {
        /// Correlation id
        request_id: RequestId,
        /// Stored entity
        task: Task,
    },

    /// Delete a task.
    #[intent]
    DeleteTask {
        /// Correlation id
        request_id: RequestId,
        /// Owning list
        todolist_id: TodolistId,
        /// Task to delete
        task_id: TaskId,
    },

    /// The backend deleted a task.
    #[outcome]
    TaskDeleted {
        /// Correlation id
        request_id: RequestId,
        /// Owning list
        todolist_id: TodolistId,
        /// Deleted task
        task_id: TaskId,
    },

    /// Change some of a task's editable fields.
    ///
    /// The patch is overlaid onto the task as currently held locally and the
    /// complete model is sent. A task missing locally fails without a
    /// remote call.
    #[intent]
    UpdateTask {
        /// Correlation id
        request_id: RequestId,
        /// Owning list
        todolist_id: TodolistId,
        /// Task to update
        task_id: TaskId,
        /// Fields to change
        patch: TaskPatch,
    },

    /// The backend stored an update; the returned entity replaces the local one.
    #[outcome]
    TaskUpdated {
        /// Correlation id
        request_id: RequestId,
        /// Entity as stored by the backend
        task: Task,
    },

    /// An operation failed; state is unchanged.
    #[outcome]
    Failed {
        /// Correlation id
        request_id: RequestId,
        /// Name of the failed intent
        operation: &'static str,
        /// Cause
        error: SyncError,
    },

    /// A todolist was fetched, created or deleted.
    Lifecycle(TodolistLifecycle),
}
