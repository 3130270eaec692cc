//! In-memory backend for testing.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use todosync_core::environment::{Clock, SystemClock};
use uuid::Uuid;

use crate::api::{ApiFuture, RemoteApi};
use crate::error::ApiError;
use crate::types::{
    GetTasksResponse, Task, TaskId, TaskPriority, TaskStatus, Todolist, TodolistId,
    UpdateTaskModel,
};

/// One recorded call to [`InMemoryRemoteApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    /// `get_todolists`
    GetTodolists,
    /// `create_todolist`
    CreateTodolist {
        /// Requested title
        title: String,
    },
    /// `delete_todolist`
    DeleteTodolist {
        /// Target list
        id: TodolistId,
    },
    /// `rename_todolist`
    RenameTodolist {
        /// Target list
        id: TodolistId,
        /// Requested title
        title: String,
    },
    /// `get_tasks`
    GetTasks {
        /// Target list
        todolist_id: TodolistId,
    },
    /// `create_task`
    CreateTask {
        /// Owning list
        todolist_id: TodolistId,
        /// Requested title
        title: String,
    },
    /// `delete_task`
    DeleteTask {
        /// Owning list
        todolist_id: TodolistId,
        /// Target task
        task_id: TaskId,
    },
    /// `update_task`
    UpdateTask {
        /// Owning list
        todolist_id: TodolistId,
        /// Target task
        task_id: TaskId,
        /// Full model sent
        model: UpdateTaskModel,
    },
}

type DelayFn = dyn Fn(&ApiCall) -> Duration + Send + Sync;
type NormaliseFn = dyn Fn(&str) -> String + Send + Sync;

#[derive(Default)]
struct Backend {
    todolists: Vec<Todolist>,
    tasks: HashMap<TodolistId, Vec<Task>>,
    calls: Vec<ApiCall>,
    failures: VecDeque<ApiError>,
    next_order: i64,
}

/// In-memory [`RemoteApi`].
///
/// Stores todolists and tasks the way the real backend does: new todolists
/// go first, new tasks go first in their list, and the list of tasks for an
/// unknown todolist comes back with its `error` field set. Every call is
/// recorded and applied as soon as it is made.
///
/// Behaviour can be scripted:
/// - [`fail_next`](Self::fail_next) queues failures consumed by the next calls
/// - [`with_delay`](Self::with_delay) holds responses back on the tokio clock
/// - [`with_title_normaliser`](Self::with_title_normaliser) rewrites stored titles
#[derive(Clone)]
pub struct InMemoryRemoteApi {
    backend: Arc<Mutex<Backend>>,
    clock: Arc<dyn Clock>,
    delay: Option<Arc<DelayFn>>,
    normalise: Option<Arc<NormaliseFn>>,
}

impl InMemoryRemoteApi {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            backend: Arc::new(Mutex::new(Backend::default())),
            clock: Arc::new(SystemClock),
            delay: None,
            normalise: None,
        }
    }

    /// Stamp created entities with `clock` instead of the wall clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Delay every call by what `delay` returns for it.
    #[must_use]
    pub fn with_delay<F>(mut self, delay: F) -> Self
    where
        F: Fn(&ApiCall) -> Duration + Send + Sync + 'static,
    {
        self.delay = Some(Arc::new(delay));
        self
    }

    /// Delay every call by the same amount.
    #[must_use]
    pub fn with_latency(self, latency: Duration) -> Self {
        self.with_delay(move |_| latency)
    }

    /// Rewrite titles before storing them, like a server that normalises input.
    #[must_use]
    pub fn with_title_normaliser<F>(mut self, normalise: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.normalise = Some(Arc::new(normalise));
        self
    }

    /// Make the next call fail with `error`. Queued failures are consumed in
    /// call order.
    pub fn fail_next(&self, error: ApiError) {
        self.lock().failures.push_back(error);
    }

    /// Calls made so far, in the order they started.
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    /// Store a todolist without recording a call.
    pub fn seed_todolist(&self, title: &str) -> Todolist {
        let mut backend = self.lock();
        let todolist = Todolist {
            id: TodolistId::new(Uuid::new_v4().to_string()),
            title: title.to_string(),
            added_date: self.timestamp(),
            order: Self::next_order(&mut backend),
        };
        backend.todolists.insert(0, todolist.clone());
        backend.tasks.insert(todolist.id.clone(), Vec::new());
        todolist
    }

    /// Store a task without recording a call. Seeded titles are kept as given.
    ///
    /// Returns `None` if the todolist does not exist.
    pub fn seed_task(&self, todolist_id: &TodolistId, title: &str) -> Option<Task> {
        let mut backend = self.lock();
        let order = Self::next_order(&mut backend);
        let task = self.new_task(todolist_id.clone(), title.to_string(), order);
        backend.tasks.get_mut(todolist_id)?.insert(0, task.clone());
        Some(task)
    }

    /// Todolists as currently stored.
    #[must_use]
    pub fn stored_todolists(&self) -> Vec<Todolist> {
        self.lock().todolists.clone()
    }

    /// Tasks of one todolist as currently stored.
    #[must_use]
    pub fn stored_tasks(&self, todolist_id: &TodolistId) -> Option<Vec<Task>> {
        self.lock().tasks.get(todolist_id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Backend> {
        self.backend.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn timestamp(&self) -> String {
        self.clock.now().format("%Y-%m-%dT%H:%M:%S%.3f").to_string()
    }

    fn title(&self, title: String) -> String {
        match &self.normalise {
            Some(normalise) => normalise(&title),
            None => title,
        }
    }

    fn next_order(backend: &mut Backend) -> i64 {
        backend.next_order -= 1;
        backend.next_order
    }

    fn new_task(&self, todo_list_id: TodolistId, title: String, order: i64) -> Task {
        Task {
            id: TaskId::new(Uuid::new_v4().to_string()),
            todo_list_id,
            title,
            description: None,
            status: TaskStatus::New,
            priority: TaskPriority::Low,
            start_date: None,
            deadline: None,
            order,
            added_date: self.timestamp(),
        }
    }

    /// Record `call` and run `apply` at once unless a failure is queued,
    /// then hold the response back for the scripted delay.
    ///
    /// The backend acts on a call when it arrives, so a slow response may
    /// carry a snapshot older than calls that answered before it.
    fn run<T, F>(&self, call: ApiCall, apply: F) -> ApiFuture<'_, T>
    where
        T: Send + 'static,
        F: FnOnce(&Self, &mut Backend) -> Result<T, ApiError>,
    {
        let delay = self.delay.as_ref().map(|delay| delay(&call));
        let response = {
            let mut backend = self.lock();
            backend.calls.push(call);
            match backend.failures.pop_front() {
                Some(error) => Err(error),
                None => apply(self, &mut backend),
            }
        };

        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            response
        })
    }
}

impl Default for InMemoryRemoteApi {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryRemoteApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRemoteApi")
            .field("calls", &self.lock().calls.len())
            .finish_non_exhaustive()
    }
}

fn not_found(what: &str, id: &str) -> ApiError {
    ApiError::Rejected {
        messages: vec![format!("{what} {id} not found")],
    }
}

impl RemoteApi for InMemoryRemoteApi {
    fn get_todolists(&self) -> ApiFuture<'_, Vec<Todolist>> {
        self.run(ApiCall::GetTodolists, |_, backend| {
            Ok(backend.todolists.clone())
        })
    }

    fn create_todolist(&self, title: String) -> ApiFuture<'_, Todolist> {
        let call = ApiCall::CreateTodolist {
            title: title.clone(),
        };
        self.run(call, move |api, backend| {
            let todolist = Todolist {
                id: TodolistId::new(Uuid::new_v4().to_string()),
                title: api.title(title),
                added_date: api.timestamp(),
                order: Self::next_order(backend),
            };
            backend.todolists.insert(0, todolist.clone());
            backend.tasks.insert(todolist.id.clone(), Vec::new());
            Ok(todolist)
        })
    }

    fn delete_todolist(&self, id: TodolistId) -> ApiFuture<'_, ()> {
        let call = ApiCall::DeleteTodolist { id: id.clone() };
        self.run(call, move |_, backend| {
            let index = backend
                .todolists
                .iter()
                .position(|list| list.id == id)
                .ok_or_else(|| not_found("todolist", id.as_str()))?;
            backend.todolists.remove(index);
            backend.tasks.remove(&id);
            Ok(())
        })
    }

    fn rename_todolist(&self, id: TodolistId, title: String) -> ApiFuture<'_, ()> {
        let call = ApiCall::RenameTodolist {
            id: id.clone(),
            title: title.clone(),
        };
        self.run(call, move |api, backend| {
            let todolist = backend
                .todolists
                .iter_mut()
                .find(|list| list.id == id)
                .ok_or_else(|| not_found("todolist", id.as_str()))?;
            todolist.title = api.title(title);
            Ok(())
        })
    }

    fn get_tasks(&self, todolist_id: TodolistId) -> ApiFuture<'_, GetTasksResponse> {
        let call = ApiCall::GetTasks {
            todolist_id: todolist_id.clone(),
        };
        self.run(call, move |_, backend| {
            let response = match backend.tasks.get(&todolist_id) {
                Some(tasks) => GetTasksResponse {
                    error: None,
                    total_count: tasks.len() as u64,
                    items: tasks.clone(),
                },
                None => GetTasksResponse {
                    error: Some(format!("todolist {todolist_id} not found")),
                    total_count: 0,
                    items: Vec::new(),
                },
            };
            Ok(response)
        })
    }

    fn create_task(&self, todolist_id: TodolistId, title: String) -> ApiFuture<'_, Task> {
        let call = ApiCall::CreateTask {
            todolist_id: todolist_id.clone(),
            title: title.clone(),
        };
        self.run(call, move |api, backend| {
            let order = Self::next_order(backend);
            let tasks = backend
                .tasks
                .get_mut(&todolist_id)
                .ok_or_else(|| not_found("todolist", todolist_id.as_str()))?;
            let task = api.new_task(todolist_id, api.title(title), order);
            tasks.insert(0, task.clone());
            Ok(task)
        })
    }

    fn delete_task(&self, todolist_id: TodolistId, task_id: TaskId) -> ApiFuture<'_, ()> {
        let call = ApiCall::DeleteTask {
            todolist_id: todolist_id.clone(),
            task_id: task_id.clone(),
        };
        self.run(call, move |_, backend| {
            let tasks = backend
                .tasks
                .get_mut(&todolist_id)
                .ok_or_else(|| not_found("todolist", todolist_id.as_str()))?;
            let index = tasks
                .iter()
                .position(|task| task.id == task_id)
                .ok_or_else(|| not_found("task", task_id.as_str()))?;
            tasks.remove(index);
            Ok(())
        })
    }

    fn update_task(
        &self,
        todolist_id: TodolistId,
        task_id: TaskId,
        model: UpdateTaskModel,
    ) -> ApiFuture<'_, Task> {
        let call = ApiCall::UpdateTask {
            todolist_id: todolist_id.clone(),
            task_id: task_id.clone(),
            model: model.clone(),
        };
        self.run(call, move |api, backend| {
            let task = backend
                .tasks
                .get_mut(&todolist_id)
                .and_then(|tasks| tasks.iter_mut().find(|task| task.id == task_id))
                .ok_or_else(|| not_found("task", task_id.as_str()))?;
            task.title = api.title(model.title);
            task.description = model.description;
            task.status = model.status;
            task.priority = model.priority;
            task.start_date = model.start_date;
            task.deadline = model.deadline;
            Ok(task.clone())
        })
    }
}
