//! The combined application store.
//!
//! Both stores share one state tree and one action stream. Every action is
//! offered to both reducers: todolist actions drive the todolist store and,
//! through [`TodolistLifecycle`] events, create and drop task buckets; task
//! actions only reach the task store.
//!
//! [`TodolistLifecycle`]: crate::todolists::TodolistLifecycle

use std::sync::Arc;

use todosync_core::composition::{CombinedReducer, ScopedReducer, combine_reducers, scope_reducer};
use todosync_core::effect::Effect;
use todosync_core::reducer::Reducer;
use todosync_core::SmallVec;

use crate::environment::SyncEnvironment;
use crate::tasks::{TaskAction, TasksReducer, TasksState};
use crate::todolists::{TodolistAction, TodolistsReducer, TodolistsState};
use crate::types::RequestId;

/// Whole client state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    /// Ordered todolists with their filters
    pub todolists: TodolistsState,
    /// Task buckets keyed by todolist id
    pub tasks: TasksState,
}

/// Any action of either store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Todolist store action
    Todolist(TodolistAction),
    /// Task store action
    Task(TaskAction),
}

impl AppAction {
    /// Correlation id of an intent or outcome.
    #[must_use]
    pub fn request_id(&self) -> Option<RequestId> {
        match self {
            Self::Todolist(action) => action.request_id().copied(),
            Self::Task(action) => action.request_id().copied(),
        }
    }

    /// Whether the action ends an operation.
    #[must_use]
    pub const fn is_outcome(&self) -> bool {
        match self {
            Self::Todolist(action) => action.is_outcome(),
            Self::Task(action) => action.is_outcome(),
        }
    }

    /// Whether this is the outcome of the operation started with `request_id`.
    #[must_use]
    pub fn completes(&self, request_id: RequestId) -> bool {
        self.is_outcome() && self.request_id() == Some(request_id)
    }
}

impl From<TodolistAction> for AppAction {
    fn from(action: TodolistAction) -> Self {
        Self::Todolist(action)
    }
}

impl From<TaskAction> for AppAction {
    fn from(action: TaskAction) -> Self {
        Self::Task(action)
    }
}

fn todolists_slice(state: &mut AppState) -> &mut TodolistsState {
    &mut state.todolists
}

fn tasks_slice(state: &mut AppState) -> &mut TasksState {
    &mut state.tasks
}

fn to_todolist_action(action: &AppAction) -> Option<TodolistAction> {
    match action {
        AppAction::Todolist(action) => Some(action.clone()),
        AppAction::Task(_) => None,
    }
}

fn to_task_action(action: &AppAction) -> Option<TaskAction> {
    match action {
        AppAction::Task(action) => Some(action.clone()),
        AppAction::Todolist(action) => action.lifecycle().map(TaskAction::Lifecycle),
    }
}

/// The todolist reducer scoped to [`AppState::todolists`].
#[must_use]
pub fn todolists_scope()
-> ScopedReducer<AppState, TodolistsState, AppAction, TodolistAction, TodolistsReducer> {
    scope_reducer(
        TodolistsReducer::new(),
        todolists_slice,
        to_todolist_action,
        AppAction::Todolist,
    )
}

/// The task reducer scoped to [`AppState::tasks`], following todolist
/// lifecycle events.
#[must_use]
pub fn tasks_scope() -> ScopedReducer<AppState, TasksState, AppAction, TaskAction, TasksReducer> {
    scope_reducer(
        TasksReducer::new(),
        tasks_slice,
        to_task_action,
        AppAction::Task,
    )
}

/// Reducer of the whole client.
#[derive(Clone)]
pub struct AppReducer {
    inner: CombinedReducer<AppState, AppAction, SyncEnvironment>,
}

impl AppReducer {
    /// Combine both stores.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: combine_reducers(vec![Arc::new(todolists_scope()), Arc::new(tasks_scope())]),
        }
    }
}

impl Default for AppReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AppReducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppReducer").finish_non_exhaustive()
    }
}

impl Reducer for AppReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = SyncEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        self.inner.reduce(state, action, env)
    }
}
