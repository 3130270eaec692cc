//! Entity types mirrored from the backend.
//!
//! Wire field names follow the backend's camelCase JSON. The only client-side
//! decoration is [`DomainTodolist::filter`], which never leaves this process.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::ApiError;

// ═══════════════════════════════════════════════════════════════════════
// Identifiers
// ═══════════════════════════════════════════════════════════════════════

/// Server-issued todolist id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodolistId(String);

impl TodolistId {
    /// Wrap a raw id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TodolistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Server-issued task id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wrap a raw id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Client-generated correlation id tying an intent to its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generate a fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Todolists
// ═══════════════════════════════════════════════════════════════════════

/// Todolist as the backend returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todolist {
    /// Server-issued id
    pub id: TodolistId,
    /// Display title
    pub title: String,
    /// Creation timestamp as sent by the server
    pub added_date: String,
    /// Server-side sort key
    pub order: i64,
}

/// Which tasks of a list the UI shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterValue {
    /// Every task
    #[default]
    All,
    /// Tasks not yet completed
    Active,
    /// Completed tasks only
    Completed,
}

impl FilterValue {
    /// Whether `task` is visible under this filter.
    #[must_use]
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => task.status != TaskStatus::Completed,
            Self::Completed => task.status == TaskStatus::Completed,
        }
    }
}

/// Todolist held in local state: the server entity plus its display filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainTodolist {
    /// Server-issued id
    pub id: TodolistId,
    /// Display title
    pub title: String,
    /// Creation timestamp as sent by the server
    pub added_date: String,
    /// Server-side sort key
    pub order: i64,
    /// Client-only filter
    pub filter: FilterValue,
}

impl From<Todolist> for DomainTodolist {
    fn from(todolist: Todolist) -> Self {
        Self {
            id: todolist.id,
            title: todolist.title,
            added_date: todolist.added_date,
            order: todolist.order,
            filter: FilterValue::All,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Tasks
// ═══════════════════════════════════════════════════════════════════════

/// Task progress. Only [`TaskStatus::Completed`] counts as done.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TaskStatus {
    /// Not started
    #[default]
    New = 0,
    /// Being worked on
    InProgress = 1,
    /// Done
    Completed = 2,
    /// Not yet ready to start
    Draft = 3,
}

impl TryFrom<u8> for TaskStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::New),
            1 => Ok(Self::InProgress),
            2 => Ok(Self::Completed),
            3 => Ok(Self::Draft),
            other => Err(format!("unknown task status {other}")),
        }
    }
}

impl From<TaskStatus> for u8 {
    fn from(status: TaskStatus) -> Self {
        status as Self
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TaskPriority {
    /// Lowest
    #[default]
    Low = 0,
    /// Normal
    Middle = 1,
    /// High
    Hi = 2,
    /// Needs attention now
    Urgent = 3,
    /// Deferred
    Later = 4,
}

impl TryFrom<u8> for TaskPriority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Low),
            1 => Ok(Self::Middle),
            2 => Ok(Self::Hi),
            3 => Ok(Self::Urgent),
            4 => Ok(Self::Later),
            other => Err(format!("unknown task priority {other}")),
        }
    }
}

impl From<TaskPriority> for u8 {
    fn from(priority: TaskPriority) -> Self {
        priority as Self
    }
}

/// Task as the backend returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Server-issued id
    pub id: TaskId,
    /// Owning todolist
    pub todo_list_id: TodolistId,
    /// Display title
    pub title: String,
    /// Free-form description
    pub description: Option<String>,
    /// Progress
    pub status: TaskStatus,
    /// Priority
    pub priority: TaskPriority,
    /// Planned start
    pub start_date: Option<String>,
    /// Due date
    pub deadline: Option<String>,
    /// Server-side sort key
    pub order: i64,
    /// Creation timestamp as sent by the server
    pub added_date: String,
}

/// Complete set of editable task fields, as the update call requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskModel {
    /// Title
    pub title: String,
    /// Description
    pub description: Option<String>,
    /// Progress
    pub status: TaskStatus,
    /// Priority
    pub priority: TaskPriority,
    /// Planned start
    pub start_date: Option<String>,
    /// Due date
    pub deadline: Option<String>,
}

impl From<&Task> for UpdateTaskModel {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            start_date: task.start_date.clone(),
            deadline: task.deadline.clone(),
        }
    }
}

/// Partial change to a task's editable fields.
///
/// `None` leaves a field as it is. For nullable fields, `Some(None)` clears
/// the value.
///
/// ```
/// use todolists::types::{TaskPatch, TaskStatus};
///
/// let patch = TaskPatch::new().status(TaskStatus::Completed).deadline(None);
/// assert_eq!(patch.status, Some(TaskStatus::Completed));
/// assert_eq!(patch.deadline, Some(None));
/// assert!(patch.title.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<Option<String>>,
    /// New status
    pub status: Option<TaskStatus>,
    /// New priority
    pub priority: Option<TaskPriority>,
    /// New start date
    pub start_date: Option<Option<String>>,
    /// New deadline
    pub deadline: Option<Option<String>>,
}

impl TaskPatch {
    /// An empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set or clear the description.
    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    /// Set the status.
    #[must_use]
    pub const fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the priority.
    #[must_use]
    pub const fn priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set or clear the start date.
    #[must_use]
    pub fn start_date(mut self, start_date: Option<String>) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Set or clear the deadline.
    #[must_use]
    pub fn deadline(mut self, deadline: Option<String>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Overlay this patch onto the current task, producing the full model
    /// the backend expects.
    #[must_use]
    pub fn apply_to(self, current: &Task) -> UpdateTaskModel {
        let base = UpdateTaskModel::from(current);
        UpdateTaskModel {
            title: self.title.unwrap_or(base.title),
            description: self.description.unwrap_or(base.description),
            status: self.status.unwrap_or(base.status),
            priority: self.priority.unwrap_or(base.priority),
            start_date: self.start_date.unwrap_or(base.start_date),
            deadline: self.deadline.unwrap_or(base.deadline),
        }
    }
}

/// Body of the "list tasks" response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTasksResponse {
    /// Application-level error; non-null means the call failed
    pub error: Option<String>,
    /// Total number of tasks on the server
    pub total_count: u64,
    /// Tasks in server order
    pub items: Vec<Task>,
}

impl GetTasksResponse {
    /// The tasks, or the application-level error the server reported.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] when `error` is set.
    pub fn into_items(self) -> Result<Vec<Task>, ApiError> {
        match self.error {
            Some(message) => Err(ApiError::Rejected {
                messages: vec![message],
            }),
            None => Ok(self.items),
        }
    }
}
