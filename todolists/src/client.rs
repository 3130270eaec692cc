//! Async facade over the application store.
//!
//! Each method sends one intent with a fresh [`RequestId`] and waits for the
//! outcome carrying the same id, so concurrent callers never see each
//! other's results. When the method returns `Ok`, the outcome has already
//! been merged into state.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use todolists::client::TodoClient;
//! use todolists::environment::SyncEnvironment;
//! use todolists::mocks::InMemoryRemoteApi;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), todolists::error::SyncError> {
//! let client = TodoClient::new(SyncEnvironment::without_status(Arc::new(
//!     InMemoryRemoteApi::new(),
//! )));
//!
//! let list = client.create_todolist("Work").await?;
//! let task = client.create_task(&list.id, "Buy milk").await?;
//! assert_eq!(client.tasks(&list.id).await, vec![task]);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use tokio::sync::broadcast;
use todosync_runtime::Store;

use crate::app::{AppAction, AppReducer, AppState};
use crate::config::ClientConfig;
use crate::environment::SyncEnvironment;
use crate::error::{Result, SyncError};
use crate::selectors;
use crate::tasks::TaskAction;
use crate::todolists::TodolistAction;
use crate::types::{
    DomainTodolist, FilterValue, RequestId, Task, TaskId, TaskPatch, TaskStatus, Todolist,
    TodolistId,
};

/// Store type behind [`TodoClient`].
pub type AppStore = Store<AppState, AppAction, SyncEnvironment, AppReducer>;

/// Handle to a running sync engine. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct TodoClient {
    store: AppStore,
    outcome_timeout: Option<Duration>,
}

impl TodoClient {
    /// Start an engine with empty state and default configuration.
    #[must_use]
    pub fn new(env: SyncEnvironment) -> Self {
        Self::with_config(env, ClientConfig::default())
    }

    /// Start an engine with empty state.
    #[must_use]
    pub fn with_config(env: SyncEnvironment, config: ClientConfig) -> Self {
        let store =
            Store::with_config(AppState::default(), AppReducer::new(), env, config.store);
        Self {
            store,
            outcome_timeout: config.outcome_timeout,
        }
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &AppStore {
        &self.store
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Todolists
    // ═══════════════════════════════════════════════════════════════════════

    /// Load every todolist and append them to local state.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Remote`] if the call fails.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_todolists(&self) -> Result<Vec<Todolist>> {
        let request_id = RequestId::new();
        let intent = TodolistAction::FetchTodolists { request_id };

        match self.execute(intent.into(), request_id).await? {
            AppAction::Todolist(TodolistAction::TodolistsFetched { todolists, .. }) => {
                Ok(todolists)
            },
            other => Err(Self::failure(other)),
        }
    }

    /// Create a todolist; it is prepended with an empty task bucket.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::EmptyTitle`] for a blank title, or
    /// [`SyncError::Remote`] if the call fails.
    #[tracing::instrument(skip(self, title))]
    pub async fn create_todolist(&self, title: impl Into<String>) -> Result<Todolist> {
        let request_id = RequestId::new();
        let intent = TodolistAction::CreateTodolist {
            request_id,
            title: title.into(),
        };

        match self.execute(intent.into(), request_id).await? {
            AppAction::Todolist(TodolistAction::TodolistCreated { todolist, .. }) => Ok(todolist),
            other => Err(Self::failure(other)),
        }
    }

    /// Delete a todolist and drop its task bucket.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Remote`] if the call fails.
    #[tracing::instrument(skip(self))]
    pub async fn delete_todolist(&self, id: &TodolistId) -> Result<()> {
        let request_id = RequestId::new();
        let intent = TodolistAction::DeleteTodolist {
            request_id,
            id: id.clone(),
        };

        match self.execute(intent.into(), request_id).await? {
            AppAction::Todolist(TodolistAction::TodolistDeleted { .. }) => Ok(()),
            other => Err(Self::failure(other)),
        }
    }

    /// Rename a todolist.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::EmptyTitle`] for a blank title, or
    /// [`SyncError::Remote`] if the call fails.
    #[tracing::instrument(skip(self, title))]
    pub async fn rename_todolist(&self, id: &TodolistId, title: impl Into<String>) -> Result<()> {
        let request_id = RequestId::new();
        let intent = TodolistAction::RenameTodolist {
            request_id,
            id: id.clone(),
            title: title.into(),
        };

        match self.execute(intent.into(), request_id).await? {
            AppAction::Todolist(TodolistAction::TodolistRenamed { .. }) => Ok(()),
            other => Err(Self::failure(other)),
        }
    }

    /// Set a todolist's display filter. Local only.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Store`] if the engine is shutting down.
    pub async fn change_filter(&self, id: &TodolistId, filter: FilterValue) -> Result<()> {
        let action = TodolistAction::ChangeFilter {
            id: id.clone(),
            filter,
        };
        self.store.send(action.into()).await?;
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Tasks
    // ═══════════════════════════════════════════════════════════════════════

    /// Load the tasks of a todolist, replacing its bucket.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Remote`] if the call fails or the response
    /// carries an error; the bucket is left as it was.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_tasks(&self, todolist_id: &TodolistId) -> Result<Vec<Task>> {
        let request_id = RequestId::new();
        let intent = TaskAction::FetchTasks {
            request_id,
            todolist_id: todolist_id.clone(),
        };

        match self.execute(intent.into(), request_id).await? {
            AppAction::Task(TaskAction::TasksFetched { tasks, .. }) => Ok(tasks),
            other => Err(Self::failure(other)),
        }
    }

    /// Create a task; it is prepended to the bucket the server assigns it to.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::EmptyTitle`] for a blank title, or
    /// [`SyncError::Remote`] if the call fails.
    #[tracing::instrument(skip(self, title))]
    pub async fn create_task(
        &self,
        todolist_id: &TodolistId,
        title: impl Into<String>,
    ) -> Result<Task> {
        let request_id = RequestId::new();
        let intent = TaskAction::CreateTask {
            request_id,
            todolist_id: todolist_id.clone(),
            title: title.into(),
        };

        match self.execute(intent.into(), request_id).await? {
            AppAction::Task(TaskAction::TaskCreated { task, .. }) => Ok(task),
            other => Err(Self::failure(other)),
        }
    }

    /// Delete a task.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Remote`] if the call fails.
    #[tracing::instrument(skip(self))]
    pub async fn delete_task(&self, todolist_id: &TodolistId, task_id: &TaskId) -> Result<()> {
        let request_id = RequestId::new();
        let intent = TaskAction::DeleteTask {
            request_id,
            todolist_id: todolist_id.clone(),
            task_id: task_id.clone(),
        };

        match self.execute(intent.into(), request_id).await? {
            AppAction::Task(TaskAction::TaskDeleted { .. }) => Ok(()),
            other => Err(Self::failure(other)),
        }
    }

    /// Apply `patch` to a task held locally and store the server's result.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::TaskNotFound`] without calling the backend if the
    /// task is not in local state, or [`SyncError::Remote`] if the call fails.
    #[tracing::instrument(skip(self))]
    pub async fn update_task(
        &self,
        todolist_id: &TodolistId,
        task_id: &TaskId,
        patch: TaskPatch,
    ) -> Result<Task> {
        let request_id = RequestId::new();
        let intent = TaskAction::UpdateTask {
            request_id,
            todolist_id: todolist_id.clone(),
            task_id: task_id.clone(),
            patch,
        };

        match self.execute(intent.into(), request_id).await? {
            AppAction::Task(TaskAction::TaskUpdated { task, .. }) => Ok(task),
            other => Err(Self::failure(other)),
        }
    }

    /// Mark a task done (`Completed`) or not done (`New`).
    ///
    /// # Errors
    ///
    /// Same as [`TodoClient::update_task`].
    pub async fn change_task_status(
        &self,
        todolist_id: &TodolistId,
        task_id: &TaskId,
        is_done: bool,
    ) -> Result<Task> {
        let status = if is_done {
            TaskStatus::Completed
        } else {
            TaskStatus::New
        };
        self.update_task(todolist_id, task_id, TaskPatch::new().status(status))
            .await
    }

    /// Change a task's title.
    ///
    /// # Errors
    ///
    /// Same as [`TodoClient::update_task`].
    pub async fn change_task_title(
        &self,
        todolist_id: &TodolistId,
        task_id: &TaskId,
        title: impl Into<String>,
    ) -> Result<Task> {
        self.update_task(todolist_id, task_id, TaskPatch::new().title(title))
            .await
    }

    // ═══════════════════════════════════════════════════════════════════════
    // State
    // ═══════════════════════════════════════════════════════════════════════

    /// Snapshot of the whole state.
    pub async fn state(&self) -> AppState {
        self.store.state(AppState::clone).await
    }

    /// Read state through `f` without cloning it.
    pub async fn read<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&AppState) -> T,
    {
        self.store.state(f).await
    }

    /// Todolists in display order.
    pub async fn todolists(&self) -> Vec<DomainTodolist> {
        self.read(|state| selectors::select_todolists(state).to_vec())
            .await
    }

    /// Tasks of a todolist; empty if it has no bucket.
    pub async fn tasks(&self, todolist_id: &TodolistId) -> Vec<Task> {
        self.read(|state| selectors::select_tasks(state, todolist_id).to_vec())
            .await
    }

    /// Tasks of a todolist that pass its filter.
    pub async fn visible_tasks(&self, todolist_id: &TodolistId) -> Vec<Task> {
        self.read(|state| {
            selectors::select_visible_tasks(state, todolist_id)
                .into_iter()
                .cloned()
                .collect()
        })
        .await
    }

    /// Subscribe to every outcome merged from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AppAction> {
        self.store.subscribe_actions()
    }

    /// Stop accepting operations and wait for in-flight ones to land.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Store`] if calls are still running after `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<()> {
        self.store.shutdown(timeout).await?;
        Ok(())
    }

    /// Send `intent` and wait for the outcome with `request_id`.
    async fn execute(&self, intent: AppAction, request_id: RequestId) -> Result<AppAction> {
        let completes = move |action: &AppAction| action.completes(request_id);

        let outcome = match self.outcome_timeout {
            Some(timeout) => {
                self.store
                    .send_and_wait_for(intent, completes, timeout)
                    .await?
            },
            None => self.store.send_and_wait(intent, completes).await?,
        };
        Ok(outcome)
    }

    fn failure(outcome: AppAction) -> SyncError {
        match outcome {
            AppAction::Todolist(TodolistAction::Failed { error, .. })
            | AppAction::Task(TaskAction::Failed { error, .. }) => error,
            other => SyncError::Store(format!("unexpected outcome: {other:?}")),
        }
    }
}

impl std::fmt::Debug for TodoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoClient")
            .field("outcome_timeout", &self.outcome_timeout)
            .finish_non_exhaustive()
    }
}
