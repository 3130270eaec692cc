//! Todolist store.
//!
//! The ordered collection of todolists, each decorated with a client-only
//! display filter. It knows nothing about tasks; the task store follows it
//! through [`TodolistLifecycle`] events.

pub mod actions;
pub mod reducer;

pub use actions::{TodolistAction, TodolistLifecycle};
pub use reducer::TodolistsReducer;

use crate::types::{DomainTodolist, TodolistId};

/// State of the todolist store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodolistsState {
    /// Lists in display order: created lists first, then fetched ones in
    /// server order.
    pub items: Vec<DomainTodolist>,
}

impl TodolistsState {
    /// Index of the first list with `id`.
    #[must_use]
    pub fn position(&self, id: &TodolistId) -> Option<usize> {
        self.items.iter().position(|list| &list.id == id)
    }

    /// The first list with `id`.
    #[must_use]
    pub fn get(&self, id: &TodolistId) -> Option<&DomainTodolist> {
        self.items.iter().find(|list| &list.id == id)
    }
}
