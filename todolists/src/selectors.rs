//! Read-only projections of [`AppState`].

use crate::app::AppState;
use crate::types::{DomainTodolist, Task, TodolistId};

/// All todolists in display order.
#[must_use]
pub fn select_todolists(state: &AppState) -> &[DomainTodolist] {
    &state.todolists.items
}

/// The first todolist with `id`.
#[must_use]
pub fn select_todolist<'a>(state: &'a AppState, id: &TodolistId) -> Option<&'a DomainTodolist> {
    state.todolists.get(id)
}

/// The task bucket of `id`, or `None` if the list has no bucket.
#[must_use]
pub fn select_bucket<'a>(state: &'a AppState, id: &TodolistId) -> Option<&'a [Task]> {
    state.tasks.bucket(id)
}

/// Tasks of `id`; empty when the list has no bucket.
#[must_use]
pub fn select_tasks<'a>(state: &'a AppState, id: &TodolistId) -> &'a [Task] {
    select_bucket(state, id).unwrap_or_default()
}

/// Tasks of `id` that pass the list's filter.
///
/// A list that is not in state shows every task of its bucket.
#[must_use]
pub fn select_visible_tasks<'a>(state: &'a AppState, id: &TodolistId) -> Vec<&'a Task> {
    let filter = select_todolist(state, id)
        .map(|list| list.filter)
        .unwrap_or_default();

    select_tasks(state, id)
        .iter()
        .filter(|task| filter.matches(task))
        .collect()
}
