//! Task store.
//!
//! Maps each todolist id to its ordered bucket of tasks. Buckets are created
//! and dropped in step with the todolist store through
//! [`TodolistLifecycle`](crate::todolists::TodolistLifecycle) events; task
//! mutations never check that the owning list still exists.

pub mod actions;
pub mod reducer;

pub use actions::TaskAction;
pub use reducer::TasksReducer;

use std::collections::HashMap;

use crate::types::{Task, TaskId, TodolistId};

/// State of the task store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TasksState {
    /// Tasks per todolist, newest first after local creation, server order
    /// after a fetch.
    pub buckets: HashMap<TodolistId, Vec<Task>>,
}

impl TasksState {
    /// The bucket of `todolist_id`, if it exists.
    #[must_use]
    pub fn bucket(&self, todolist_id: &TodolistId) -> Option<&[Task]> {
        self.buckets.get(todolist_id).map(Vec::as_slice)
    }

    /// The first task with `task_id` in the bucket of `todolist_id`.
    #[must_use]
    pub fn task(&self, todolist_id: &TodolistId, task_id: &TaskId) -> Option<&Task> {
        self.buckets
            .get(todolist_id)?
            .iter()
            .find(|task| &task.id == task_id)
    }
}
