//! Todolist store reducer.
//!
//! # Merge rules
//!
//! - fetched lists are appended in server order, decorated with `filter: all`
//! - a created list is prepended
//! - delete and rename touch the first entry with the id, or nothing
//!
//! There is no client-side re-sorting.

use todosync_core::effect::Effect;
use todosync_core::reducer::Reducer;
use todosync_core::{SmallVec, smallvec};

use super::actions::TodolistAction;
use super::TodolistsState;
use crate::environment::SyncEnvironment;
use crate::protocol::{local_failure, remote_call, validate_title};
use crate::types::DomainTodolist;

/// Reducer owning [`TodolistsState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TodolistsReducer;

impl TodolistsReducer {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for TodolistsReducer {
    type State = TodolistsState;
    type Action = TodolistAction;
    type Environment = SyncEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let operation = action.action_name();

        match action {
            // ═══════════════════════════════════════════════════════════════
            // Fetch
            // ═══════════════════════════════════════════════════════════════
            TodolistAction::FetchTodolists { request_id } => {
                smallvec![remote_call(
                    env,
                    operation,
                    request_id,
                    |api| async move { api.get_todolists().await },
                    move |todolists| TodolistAction::TodolistsFetched {
                        request_id,
                        todolists,
                    },
                    move |error| TodolistAction::Failed {
                        request_id,
                        operation,
                        error,
                    },
                )]
            },

            TodolistAction::TodolistsFetched { todolists, .. } => {
                tracing::debug!(count = todolists.len(), "Appending fetched todolists");
                state
                    .items
                    .extend(todolists.into_iter().map(DomainTodolist::from));
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════════
            // Create
            // ═══════════════════════════════════════════════════════════════
            TodolistAction::CreateTodolist { request_id, title } => {
                let title = match validate_title(&title) {
                    Ok(title) => title,
                    Err(error) => {
                        let on_failure = move |error| TodolistAction::Failed {
                            request_id,
                            operation,
                            error,
                        };
                        return smallvec![local_failure(
                            env, operation, request_id, error, on_failure
                        )];
                    },
                };

                smallvec![remote_call(
                    env,
                    operation,
                    request_id,
                    move |api| async move { api.create_todolist(title).await },
                    move |todolist| TodolistAction::TodolistCreated {
                        request_id,
                        todolist,
                    },
                    move |error| TodolistAction::Failed {
                        request_id,
                        operation,
                        error,
                    },
                )]
            },

            TodolistAction::TodolistCreated { todolist, .. } => {
                tracing::debug!(id = %todolist.id, "Prepending created todolist");
                state.items.insert(0, DomainTodolist::from(todolist));
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════════
            // Delete
            // ═══════════════════════════════════════════════════════════════
            TodolistAction::DeleteTodolist { request_id, id } => {
                smallvec![remote_call(
                    env,
                    operation,
                    request_id,
                    {
                        let id = id.clone();
                        move |api| async move { api.delete_todolist(id).await }
                    },
                    move |()| TodolistAction::TodolistDeleted { request_id, id },
                    move |error| TodolistAction::Failed {
                        request_id,
                        operation,
                        error,
                    },
                )]
            },

            TodolistAction::TodolistDeleted { id, .. } => {
                if let Some(index) = state.position(&id) {
                    state.items.remove(index);
                } else {
                    tracing::debug!(%id, "Deleted todolist was not in local state");
                }
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════════
            // Rename
            // ═══════════════════════════════════════════════════════════════
            TodolistAction::RenameTodolist {
                request_id,
                id,
                title,
            } => {
                let title = match validate_title(&title) {
                    Ok(title) => title,
                    Err(error) => {
                        let on_failure = move |error| TodolistAction::Failed {
                            request_id,
                            operation,
                            error,
                        };
                        return smallvec![local_failure(
                            env, operation, request_id, error, on_failure
                        )];
                    },
                };

                smallvec![remote_call(
                    env,
                    operation,
                    request_id,
                    {
                        let (id, title) = (id.clone(), title.clone());
                        move |api| async move { api.rename_todolist(id, title).await }
                    },
                    move |()| TodolistAction::TodolistRenamed {
                        request_id,
                        id,
                        title,
                    },
                    move |error| TodolistAction::Failed {
                        request_id,
                        operation,
                        error,
                    },
                )]
            },

            TodolistAction::TodolistRenamed { id, title, .. } => {
                if let Some(index) = state.position(&id) {
                    state.items[index].title = title;
                }
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════════
            // Local
            // ═══════════════════════════════════════════════════════════════
            TodolistAction::Failed { .. } => smallvec![Effect::None],

            TodolistAction::ChangeFilter { id, filter } => {
                if let Some(index) = state.position(&id) {
                    state.items[index].filter = filter;
                }
                smallvec![Effect::None]
            },
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::error::SyncError;
    use crate::mocks::InMemoryRemoteApi;
    use crate::types::{FilterValue, RequestId, Todolist, TodolistId};
    use std::sync::Arc;
    use todosync_testing::{ReducerTest, assertions, effects::collect_actions};

    fn env() -> SyncEnvironment {
        SyncEnvironment::without_status(Arc::new(InMemoryRemoteApi::new()))
    }

    fn list(id: &str, title: &str) -> Todolist {
        Todolist {
            id: TodolistId::new(id),
            title: title.to_string(),
            added_date: "2025-01-01T00:00:00".to_string(),
            order: 0,
        }
    }

    fn state_with(lists: &[(&str, &str)]) -> TodolistsState {
        TodolistsState {
            items: lists
                .iter()
                .map(|(id, title)| DomainTodolist::from(list(id, title)))
                .collect(),
        }
    }

    #[test]
    fn fetched_lists_are_appended_in_server_order() {
        ReducerTest::new(TodolistsReducer::new())
            .with_env(env())
            .given_state(state_with(&[("l0", "Existing")]))
            .when_action(TodolistAction::TodolistsFetched {
                request_id: RequestId::new(),
                todolists: vec![list("l1", "Work"), list("l2", "Home")],
            })
            .then_state(|state| {
                let ids: Vec<_> = state.items.iter().map(|l| l.id.as_str()).collect();
                assert_eq!(ids, vec!["l0", "l1", "l2"]);
                assert!(state.items.iter().all(|l| l.filter == FilterValue::All));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn created_list_is_prepended() {
        ReducerTest::new(TodolistsReducer::new())
            .with_env(env())
            .given_state(state_with(&[("l1", "Work")]))
            .when_action(TodolistAction::TodolistCreated {
                request_id: RequestId::new(),
                todolist: list("l2", "Home"),
            })
            .then_state(|state| {
                assert_eq!(state.items[0].id, TodolistId::new("l2"));
                assert_eq!(state.items[0].filter, FilterValue::All);
                assert_eq!(state.items.len(), 2);
            })
            .run();
    }

    #[test]
    fn delete_removes_only_the_first_match() {
        ReducerTest::new(TodolistsReducer::new())
            .with_env(env())
            .given_state(state_with(&[("l1", "A"), ("l2", "B"), ("l1", "C")]))
            .when_action(TodolistAction::TodolistDeleted {
                request_id: RequestId::new(),
                id: TodolistId::new("l1"),
            })
            .then_state(|state| {
                let titles: Vec<_> = state.items.iter().map(|l| l.title.as_str()).collect();
                assert_eq!(titles, vec!["B", "C"]);
            })
            .run();
    }

    #[test]
    fn delete_of_unknown_list_is_a_noop() {
        ReducerTest::new(TodolistsReducer::new())
            .with_env(env())
            .given_state(state_with(&[("l1", "Work")]))
            .when_action(TodolistAction::TodolistDeleted {
                request_id: RequestId::new(),
                id: TodolistId::new("missing"),
            })
            .then_state(|state| assert_eq!(*state, state_with(&[("l1", "Work")])))
            .run();
    }

    #[test]
    fn rename_overwrites_title_in_place() {
        ReducerTest::new(TodolistsReducer::new())
            .with_env(env())
            .given_state(state_with(&[("l1", "Work"), ("l2", "Home")]))
            .when_action(TodolistAction::TodolistRenamed {
                request_id: RequestId::new(),
                id: TodolistId::new("l2"),
                title: "House".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.items[1].title, "House");
                assert_eq!(state.items[0].title, "Work");
            })
            .run();
    }

    #[test]
    fn filter_change_is_local_and_idempotent() {
        let filter = TodolistAction::ChangeFilter {
            id: TodolistId::new("l1"),
            filter: FilterValue::Completed,
        };

        let once = ReducerTest::new(TodolistsReducer::new())
            .with_env(env())
            .given_state(state_with(&[("l1", "Work")]))
            .when_action(filter.clone())
            .then_effects(assertions::assert_no_effects)
            .run();

        let twice = ReducerTest::new(TodolistsReducer::new())
            .with_env(env())
            .given_state(state_with(&[("l1", "Work")]))
            .when_action(filter.clone())
            .when_action(filter)
            .run();

        assert_eq!(once, twice);
        assert_eq!(once.items[0].filter, FilterValue::Completed);
    }

    #[test]
    fn intents_do_not_mutate_state() {
        ReducerTest::new(TodolistsReducer::new())
            .with_env(env())
            .given_state(state_with(&[("l1", "Work")]))
            .when_action(TodolistAction::DeleteTodolist {
                request_id: RequestId::new(),
                id: TodolistId::new("l1"),
            })
            .then_state(|state| assert_eq!(state.items.len(), 1))
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[tokio::test]
    async fn blank_title_fails_without_remote_call() {
        let api = Arc::new(InMemoryRemoteApi::new());
        let env = SyncEnvironment::without_status(api.clone());
        let request_id = RequestId::new();
        let mut state = TodolistsState::default();

        let effects = TodolistsReducer::new().reduce(
            &mut state,
            TodolistAction::CreateTodolist {
                request_id,
                title: "   ".to_string(),
            },
            &env,
        );

        assert_eq!(
            collect_actions(effects).await,
            vec![TodolistAction::Failed {
                request_id,
                operation: "create_todolist",
                error: SyncError::EmptyTitle,
            }]
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn create_sends_trimmed_title() {
        let api = Arc::new(InMemoryRemoteApi::new());
        let env = SyncEnvironment::without_status(api.clone());
        let mut state = TodolistsState::default();

        let effects = TodolistsReducer::new().reduce(
            &mut state,
            TodolistAction::CreateTodolist {
                request_id: RequestId::new(),
                title: "  Groceries ".to_string(),
            },
            &env,
        );

        let outcomes = collect_actions(effects).await;
        let [TodolistAction::TodolistCreated { todolist, .. }] = outcomes.as_slice() else {
            panic!("expected a created outcome, got {outcomes:?}");
        };
        assert_eq!(todolist.title, "Groceries");
        assert!(state.items.is_empty());
    }
}
