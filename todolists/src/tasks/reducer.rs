//! Task store reducer.
//!
//! # Merge rules
//!
//! - a fetch replaces the whole bucket with the server order
//! - a created task is prepended to the bucket named by its own
//!   `todo_list_id`, which may differ from the id the caller passed
//! - delete removes the first match; update replaces the entity at its index
//!   with the server's copy
//! - lifecycle events create and drop buckets; they are idempotent

use todosync_core::effect::Effect;
use todosync_core::reducer::Reducer;
use todosync_core::{SmallVec, smallvec};

use super::actions::TaskAction;
use super::TasksState;
use crate::environment::SyncEnvironment;
use crate::error::SyncError;
use crate::protocol::{local_failure, remote_call, validate_title};
use crate::todolists::TodolistLifecycle;

/// Reducer owning [`TasksState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TasksReducer;

impl TasksReducer {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn apply_lifecycle(state: &mut TasksState, event: TodolistLifecycle) {
        match event {
            TodolistLifecycle::Fetched(ids) => {
                for id in ids {
                    state.buckets.entry(id).or_default();
                }
            },
            TodolistLifecycle::Created(id) => {
                state.buckets.entry(id).or_default();
            },
            TodolistLifecycle::Deleted(id) => {
                state.buckets.remove(&id);
            },
        }
    }
}

impl Reducer for TasksReducer {
    type State = TasksState;
    type Action = TaskAction;
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
            TaskAction::FetchTasks {
                request_id,
                todolist_id,
            } => {
                smallvec![remote_call(
                    env,
                    operation,
                    request_id,
                    {
                        let todolist_id = todolist_id.clone();
                        move |api| async move { api.get_tasks(todolist_id).await?.into_items() }
                    },
                    move |tasks| TaskAction::TasksFetched {
                        request_id,
                        todolist_id,
                        tasks,
                    },
                    move |error| TaskAction::Failed {
                        request_id,
                        operation,
                        error,
                    },
                )]
            },

            TaskAction::TasksFetched {
                todolist_id, tasks, ..
            } => {
                tracing::debug!(%todolist_id, count = tasks.len(), "Replacing task bucket");
                state.buckets.insert(todolist_id, tasks);
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════════
            // Create
            // ═══════════════════════════════════════════════════════════════
            TaskAction::CreateTask {
                request_id,
                todolist_id,
                title,
            } => {
                let title = match validate_title(&title) {
                    Ok(title) => title,
                    Err(error) => {
                        let on_failure = move |error| TaskAction::Failed {
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
                    move |api| async move { api.create_task(todolist_id, title).await },
                    move |task| TaskAction::TaskCreated { request_id, task },
                    move |error| TaskAction::Failed {
                        request_id,
                        operation,
                        error,
                    },
                )]
            },

            TaskAction::TaskCreated { task, .. } => {
                if let Some(bucket) = state.buckets.get_mut(&task.todo_list_id) {
                    bucket.insert(0, task);
                } else {
                    tracing::warn!(
                        todolist_id = %task.todo_list_id,
                        task_id = %task.id,
                        "Created task has no bucket, dropping it"
                    );
                }
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════════
            // Delete
            // ═══════════════════════════════════════════════════════════════
            TaskAction::DeleteTask {
                request_id,
                todolist_id,
                task_id,
            } => {
                smallvec![remote_call(
                    env,
                    operation,
                    request_id,
                    {
                        let (todolist_id, task_id) = (todolist_id.clone(), task_id.clone());
                        move |api| async move { api.delete_task(todolist_id, task_id).await }
                    },
                    move |()| TaskAction::TaskDeleted {
                        request_id,
                        todolist_id,
                        task_id,
                    },
                    move |error| TaskAction::Failed {
                        request_id,
                        operation,
                        error,
                    },
                )]
            },

            TaskAction::TaskDeleted {
                todolist_id,
                task_id,
                ..
            } => {
                let bucket = state.buckets.get_mut(&todolist_id);
                if let Some(bucket) = bucket {
                    if let Some(index) = bucket.iter().position(|task| task.id == task_id) {
                        bucket.remove(index);
                    }
                }
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════════
            // Update
            // ═══════════════════════════════════════════════════════════════
            TaskAction::UpdateTask {
                request_id,
                todolist_id,
                task_id,
                patch,
            } => {
                let Some(current) = state.task(&todolist_id, &task_id) else {
                    let error = SyncError::TaskNotFound {
                        todolist_id,
                        task_id,
                    };
                    let on_failure = move |error| TaskAction::Failed {
                        request_id,
                        operation,
                        error,
                    };
                    return smallvec![local_failure(env, operation, request_id, error, on_failure)];
                };

                let model = patch.apply_to(current);

                smallvec![remote_call(
                    env,
                    operation,
                    request_id,
                    move |api| async move { api.update_task(todolist_id, task_id, model).await },
                    move |task| TaskAction::TaskUpdated { request_id, task },
                    move |error| TaskAction::Failed {
                        request_id,
                        operation,
                        error,
                    },
                )]
            },

            TaskAction::TaskUpdated { task, .. } => {
                let slot = state.buckets.get_mut(&task.todo_list_id).and_then(|bucket| {
                    bucket.iter_mut().find(|existing| existing.id == task.id)
                });
                match slot {
                    Some(existing) => *existing = task,
                    None => tracing::debug!(
                        task_id = %task.id,
                        "Updated task is no longer in local state"
                    ),
                }
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════════
            // Local
            // ═══════════════════════════════════════════════════════════════
            TaskAction::Failed { .. } => smallvec![Effect::None],

            TaskAction::Lifecycle(event) => {
                Self::apply_lifecycle(state, event);
                smallvec![Effect::None]
            },
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::error::ApiError;
    use crate::mocks::{ApiCall, InMemoryRemoteApi};
    use crate::types::{
        RequestId, Task, TaskId, TaskPatch, TaskPriority, TaskStatus, TodolistId,
        UpdateTaskModel,
    };
    use std::collections::HashMap;
    use std::sync::Arc;
    use todosync_testing::{ReducerTest, assertions, effects::collect_actions};

    fn env() -> SyncEnvironment {
        SyncEnvironment::without_status(Arc::new(InMemoryRemoteApi::new()))
    }

    fn task(list: &str, id: &str, title: &str) -> Task {
        Task {
            id: TaskId::new(id),
            todo_list_id: TodolistId::new(list),
            title: title.to_string(),
            description: None,
            status: TaskStatus::New,
            priority: TaskPriority::Low,
            start_date: None,
            deadline: None,
            order: 0,
            added_date: "2025-01-01T00:00:00".to_string(),
        }
    }

    fn state_with(list: &str, tasks: Vec<Task>) -> TasksState {
        TasksState {
            buckets: HashMap::from([(TodolistId::new(list), tasks)]),
        }
    }

    fn ids(state: &TasksState, list: &str) -> Vec<String> {
        state
            .bucket(&TodolistId::new(list))
            .unwrap()
            .iter()
            .map(|t| t.id.to_string())
            .collect()
    }

    #[test]
    fn created_tasks_are_prepended() {
        ReducerTest::new(TasksReducer::new())
            .with_env(env())
            .given_state(state_with("l1", vec![]))
            .when_action(TaskAction::TaskCreated {
                request_id: RequestId::new(),
                task: task("l1", "t1", "First"),
            })
            .when_action(TaskAction::TaskCreated {
                request_id: RequestId::new(),
                task: task("l1", "t2", "Second"),
            })
            .then_state(|state| assert_eq!(ids(state, "l1"), vec!["t2", "t1"]))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn created_task_follows_server_echoed_list() {
        let mut state = state_with("l1", vec![]);
        state.buckets.insert(TodolistId::new("l2"), vec![]);

        ReducerTest::new(TasksReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(TaskAction::TaskCreated {
                request_id: RequestId::new(),
                task: task("l2", "t1", "Moved"),
            })
            .then_state(|state| {
                assert!(ids(state, "l1").is_empty());
                assert_eq!(ids(state, "l2"), vec!["t1"]);
            })
            .run();
    }

    #[test]
    fn created_task_without_bucket_is_dropped() {
        ReducerTest::new(TasksReducer::new())
            .with_env(env())
            .given_state(TasksState::default())
            .when_action(TaskAction::TaskCreated {
                request_id: RequestId::new(),
                task: task("gone", "t1", "Orphan"),
            })
            .then_state(|state| assert!(state.buckets.is_empty()))
            .run();
    }

    #[test]
    fn fetch_replaces_bucket_in_server_order() {
        ReducerTest::new(TasksReducer::new())
            .with_env(env())
            .given_state(state_with("l1", vec![task("l1", "old", "Old")]))
            .when_action(TaskAction::TasksFetched {
                request_id: RequestId::new(),
                todolist_id: TodolistId::new("l1"),
                tasks: vec![task("l1", "a", "A"), task("l1", "b", "B"), task("l1", "c", "C")],
            })
            .then_state(|state| assert_eq!(ids(state, "l1"), vec!["a", "b", "c"]))
            .run();
    }

    #[test]
    fn delete_removes_first_match_only_from_its_bucket() {
        let mut state = state_with("l1", vec![task("l1", "t1", "A"), task("l1", "t2", "B")]);
        state
            .buckets
            .insert(TodolistId::new("l2"), vec![task("l2", "t1", "Other")]);

        ReducerTest::new(TasksReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(TaskAction::TaskDeleted {
                request_id: RequestId::new(),
                todolist_id: TodolistId::new("l1"),
                task_id: TaskId::new("t1"),
            })
            .then_state(|state| {
                assert_eq!(ids(state, "l1"), vec!["t2"]);
                assert_eq!(ids(state, "l2"), vec!["t1"]);
            })
            .run();
    }

    #[test]
    fn update_outcome_replaces_entity_verbatim() {
        let mut normalised = task("l1", "t2", "x");
        normalised.status = TaskStatus::Completed;

        ReducerTest::new(TasksReducer::new())
            .with_env(env())
            .given_state(state_with("l1", vec![task("l1", "t1", "A"), task("l1", "t2", "X")]))
            .when_action(TaskAction::TaskUpdated {
                request_id: RequestId::new(),
                task: normalised.clone(),
            })
            .then_state(move |state| {
                let bucket = state.bucket(&TodolistId::new("l1")).unwrap();
                assert_eq!(bucket[1], normalised);
                assert_eq!(bucket[0].title, "A");
            })
            .run();
    }

    #[test]
    fn update_outcome_for_vanished_task_is_ignored() {
        ReducerTest::new(TasksReducer::new())
            .with_env(env())
            .given_state(state_with("l1", vec![]))
            .when_action(TaskAction::TaskUpdated {
                request_id: RequestId::new(),
                task: task("l1", "t1", "Late"),
            })
            .then_state(|state| assert!(ids(state, "l1").is_empty()))
            .run();
    }

    #[test]
    fn lifecycle_events_are_idempotent() {
        let existing = state_with("l1", vec![task("l1", "t1", "Keep")]);

        ReducerTest::new(TasksReducer::new())
            .with_env(env())
            .given_state(existing)
            .when_action(TaskAction::Lifecycle(TodolistLifecycle::Created(
                TodolistId::new("l1"),
            )))
            .when_action(TaskAction::Lifecycle(TodolistLifecycle::Fetched(vec![
                TodolistId::new("l1"),
                TodolistId::new("l2"),
            ])))
            .when_action(TaskAction::Lifecycle(TodolistLifecycle::Deleted(
                TodolistId::new("l3"),
            )))
            .then_state(|state| {
                assert_eq!(ids(state, "l1"), vec!["t1"]);
                assert!(ids(state, "l2").is_empty());
                assert_eq!(state.buckets.len(), 2);
            })
            .run();
    }

    #[test]
    fn deleted_list_drops_its_bucket() {
        ReducerTest::new(TasksReducer::new())
            .with_env(env())
            .given_state(state_with("l1", vec![task("l1", "t1", "A")]))
            .when_action(TaskAction::Lifecycle(TodolistLifecycle::Deleted(
                TodolistId::new("l1"),
            )))
            .then_state(|state| assert!(state.bucket(&TodolistId::new("l1")).is_none()))
            .run();
    }

    #[tokio::test]
    async fn update_of_missing_task_makes_no_call() {
        let api = Arc::new(InMemoryRemoteApi::new());
        let env = SyncEnvironment::without_status(api.clone());
        let request_id = RequestId::new();
        let mut state = state_with("l1", vec![]);

        let effects = TasksReducer::new().reduce(
            &mut state,
            TaskAction::UpdateTask {
                request_id,
                todolist_id: TodolistId::new("l1"),
                task_id: TaskId::new("ghost"),
                patch: TaskPatch::new().status(TaskStatus::Completed),
            },
            &env,
        );

        assert_eq!(
            collect_actions(effects).await,
            vec![TaskAction::Failed {
                request_id,
                operation: "update_task",
                error: SyncError::TaskNotFound {
                    todolist_id: TodolistId::new("l1"),
                    task_id: TaskId::new("ghost"),
                },
            }]
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn update_sends_complete_model() {
        let api = Arc::new(InMemoryRemoteApi::new().with_title_normaliser(str::to_lowercase));
        let list = api.seed_todolist("Work");
        let created = api.seed_task(&list.id, "X").unwrap();

        let env = SyncEnvironment::without_status(api.clone());
        let mut state = state_with(list.id.as_str(), vec![created.clone()]);

        let effects = TasksReducer::new().reduce(
            &mut state,
            TaskAction::UpdateTask {
                request_id: RequestId::new(),
                todolist_id: list.id.clone(),
                task_id: created.id.clone(),
                patch: TaskPatch::new().status(TaskStatus::Completed),
            },
            &env,
        );
        let outcomes = collect_actions(effects).await;

        assert_eq!(
            api.calls(),
            vec![ApiCall::UpdateTask {
                todolist_id: list.id.clone(),
                task_id: created.id.clone(),
                model: UpdateTaskModel {
                    title: "X".to_string(),
                    description: None,
                    status: TaskStatus::Completed,
                    priority: TaskPriority::Low,
                    start_date: None,
                    deadline: None,
                },
            }]
        );
        let [TaskAction::TaskUpdated { task, .. }] = outcomes.as_slice() else {
            panic!("expected an updated outcome, got {outcomes:?}");
        };
        assert_eq!(task.status, TaskStatus::Completed);

        // The normalised entity is what lands in state
        TasksReducer::new().reduce(&mut state, outcomes[0].clone(), &env);
        assert_eq!(state.task(&list.id, &created.id).unwrap().title, "x");
    }

    #[tokio::test]
    async fn list_tasks_error_field_is_a_failure() {
        let api = Arc::new(InMemoryRemoteApi::new());
        let env = SyncEnvironment::without_status(api.clone());
        let mut state = state_with("l1", vec![task("l1", "t1", "Known")]);

        // The in-memory backend reports unknown lists through the error field
        let effects = TasksReducer::new().reduce(
            &mut state,
            TaskAction::FetchTasks {
                request_id: RequestId::new(),
                todolist_id: TodolistId::new("l1"),
            },
            &env,
        );
        let outcomes = collect_actions(effects).await;

        let [TaskAction::Failed { error, .. }] = outcomes.as_slice() else {
            panic!("expected failure, got {outcomes:?}");
        };
        assert!(matches!(error, SyncError::Remote(ApiError::Rejected { .. })));
        assert_eq!(ids(&state, "l1"), vec!["t1"]);
    }
}
