//! Todolist store actions.

use todosync_macros::Action;

use crate::error::SyncError;
use crate::types::{FilterValue, RequestId, Todolist, TodolistId};

/// Inputs of the todolist store.
///
/// Intents are issued by callers; outcomes are produced by the store's own
/// effects and carry the intent's `request_id`.
#[derive(Action, Clone, Debug, PartialEq, Eq)]
pub enum TodolistAction {
    /// Load every todolist from the backend.
    #[intent]
    FetchTodolists {
        /// Correlation id
        request_id: RequestId,
    },

    /// Todolists arrived, in server order.
    #[outcome]
    TodolistsFetched {
        /// Correlation id
        request_id: RequestId,
        /// Lists as returned by the backend
        todolists: Vec<Todolist>,
    },

    /// Create a todolist.
    #[intent]
    CreateTodolist {
        /// Correlation id
        request_id: RequestId,
        /// Title; must not be blank
        title: String,
    },

    /// The backend stored a new todolist.
    #[outcome]
    TodolistCreated {
        /// Correlation id
        request_id: RequestId,
        /// Stored entity
        todolist: Todolist,
    },

    /// Delete a todolist.
    #[intent]
    DeleteTodolist {
        /// Correlation id
        request_id: RequestId,
        /// List to delete
        id: TodolistId,
    },

    /// The backend deleted a todolist.
    #[outcome]
    TodolistDeleted {
        /// Correlation id
        request_id: RequestId,
        /// Deleted list
        id: TodolistId,
    },

    /// Rename a todolist.
    #[intent]
    RenameTodolist {
        /// Correlation id
        request_id: RequestId,
        /// List to rename
        id: TodolistId,
        /// New title; must not be blank
        title: String,
    },

    /// The backend renamed a todolist.
    #[outcome]
    TodolistRenamed {
        /// Correlation id
        request_id: RequestId,
        /// Renamed list
        id: TodolistId,
        /// Title sent to the backend
        title: String,
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

    /// Change a list's display filter. Local only, always succeeds.
    ChangeFilter {
        /// List to change
        id: TodolistId,
        /// New filter
        filter: FilterValue,
    },
}

/// Todolist lifecycle events observed by the task store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TodolistLifecycle {
    /// Lists known to exist on the backend
    Fetched(Vec<TodolistId>),
    /// A list was created
    Created(TodolistId),
    /// A list was deleted
    Deleted(TodolistId),
}

impl TodolistAction {
    /// The lifecycle event carried by a success outcome, if any.
    #[must_use]
    pub fn lifecycle(&self) -> Option<TodolistLifecycle> {
        match self {
            Self::TodolistsFetched { todolists, .. } => Some(TodolistLifecycle::Fetched(
                todolists.iter().map(|list| list.id.clone()).collect(),
            )),
            Self::TodolistCreated { todolist, .. } => {
                Some(TodolistLifecycle::Created(todolist.id.clone()))
            },
            Self::TodolistDeleted { id, .. } => Some(TodolistLifecycle::Deleted(id.clone())),
            _ => None,
        }
    }
}
