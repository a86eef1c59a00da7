/// Task model and request structures
///
/// Tasks are the core entity of TaskFlow. A task is created in the `todo`
/// state and mutated only through explicit partial updates.
///
/// # Stored document
///
/// ```json
/// {
///   "id": "8b0c4a9e-2f1d-4c3b-9a57-0f6b1c2d3e4f",
///   "title": "Write release notes",
///   "description": "",
///   "status": "todo",
///   "priority": "medium",
///   "due_date": "2025-03-01",
///   "assigned_to": "alice",
///   "tags": ["docs"],
///   "created_at": "2025-02-20T09:30:00.000000Z",
///   "updated_at": "2025-02-20T09:30:00.000000Z"
/// }
/// ```
///
/// # Example
///
/// ```
/// use taskflow_shared::models::task::{Task, TaskCreate, TaskPriority, TaskStatus};
///
/// let task = Task::new(TaskCreate {
///     title: "Write release notes".to_string(),
///     ..Default::default()
/// });
///
/// assert_eq!(task.status, TaskStatus::Todo);
/// assert_eq!(task.priority, TaskPriority::Medium);
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Task progress state
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started yet
    #[default]
    Todo,

    /// Someone is working on it
    InProgress,

    /// Done
    Completed,
}

impl TaskStatus {
    /// Every status, in workflow order
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Completed];

    /// Converts status to its stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(UnknownVariant {
                kind: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    /// Every priority, lowest first
    pub const ALL: [TaskPriority; 4] = [
        TaskPriority::Low,
        TaskPriority::Medium,
        TaskPriority::High,
        TaskPriority::Urgent,
    ];

    /// Converts priority to its stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Urgent => "urgent",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            "urgent" => Ok(TaskPriority::Urgent),
            other => Err(UnknownVariant {
                kind: "priority",
                value: other.to_string(),
            }),
        }
    }
}

/// A stored string that is not a member of a closed enum
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct UnknownVariant {
    /// Which enum was being parsed
    pub kind: &'static str,

    /// The offending value
    pub value: String,
}

/// Task model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task ID (UUID v4 text), immutable
    pub id: String,

    /// Short summary
    pub title: String,

    /// Longer free-form text
    pub description: String,

    /// Current progress state
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Calendar due date, no time component
    pub due_date: Option<NaiveDate>,

    /// Free-form assignee identifier, not checked against users
    pub assigned_to: Option<String>,

    /// Ordered labels
    pub tags: Vec<String>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Builds a new task from creation input
    ///
    /// Assigns a fresh id, `todo` status, and sets both timestamps to now.
    pub fn new(data: TaskCreate) -> Self {
        let now = super::now();

        Self {
            id: Uuid::new_v4().to_string(),
            title: data.title,
            description: data.description.unwrap_or_default(),
            status: TaskStatus::Todo,
            priority: data.priority.unwrap_or_default(),
            due_date: data.due_date,
            assigned_to: data.assigned_to,
            tags: data.tags,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the task is past its due date on `today` and not yet completed
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match (self.due_date, self.status) {
            (Some(_), TaskStatus::Completed) => false,
            (Some(due), TaskStatus::Todo | TaskStatus::InProgress) => due < today,
            (None, _) => false,
        }
    }
}

/// Input for creating a new task
///
/// Status is not accepted here; new tasks always start as `todo`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TaskCreate {
    /// Task title; must be present, may be empty
    pub title: String,

    /// Description (default: empty)
    #[serde(default)]
    pub description: Option<String>,

    /// Priority (default: medium)
    #[serde(default)]
    pub priority: Option<TaskPriority>,

    /// Due date (`YYYY-MM-DD`)
    #[serde(default)]
    pub due_date: Option<NaiveDate>,

    /// Assignee
    #[serde(default)]
    pub assigned_to: Option<String>,

    /// Tags (default: none); `null` is rejected
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Input for updating a task
///
/// All fields are optional. Only fields that are present (and not null) are
/// applied; everything else keeps its stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub status: Option<TaskStatus>,

    #[serde(default)]
    pub priority: Option<TaskPriority>,

    #[serde(default)]
    pub due_date: Option<NaiveDate>,

    #[serde(default)]
    pub assigned_to: Option<String>,

    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl TaskUpdate {
    /// Applies the provided fields onto `task` and stamps `updated_at`
    pub fn apply_to(&self, task: &mut Task, updated_at: DateTime<Utc>) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(assigned_to) = &self.assigned_to {
            task.assigned_to = Some(assigned_to.clone());
        }
        if let Some(tags) = &self.tags {
            task.tags = tags.clone();
        }
        task.updated_at = updated_at;
    }
}

/// Filter for listing tasks
///
/// An empty filter matches every task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assigned_to: Option<String>,
}

impl TaskFilter {
    /// Whether `task` satisfies every criterion that is set
    pub fn matches(&self, task: &Task) -> bool {
        self.status.map_or(true, |s| task.status == s)
            && self.priority.map_or(true, |p| task.priority == p)
            && self
                .assigned_to
                .as_deref()
                .map_or(true, |a| task.assigned_to.as_deref() == Some(a))
    }
}

/// Filter for counting tasks
///
/// Supports the criteria the analytics need: exact status or priority,
/// status exclusion, and a strict upper bound on the due date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCountFilter {
    pub status: Option<TaskStatus>,
    pub status_not: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,

    /// Matches tasks whose due date is strictly earlier than this date.
    /// Tasks without a due date never match.
    pub due_before: Option<NaiveDate>,
}

impl TaskCountFilter {
    /// Counts tasks with the given status
    pub fn with_status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Counts tasks with the given priority
    pub fn with_priority(priority: TaskPriority) -> Self {
        Self {
            priority: Some(priority),
            ..Default::default()
        }
    }

    /// Counts tasks due before `today` that are not completed
    pub fn overdue(today: NaiveDate) -> Self {
        Self {
            status_not: Some(TaskStatus::Completed),
            due_before: Some(today),
            ..Default::default()
        }
    }

    /// Whether `task` satisfies every criterion that is set
    pub fn matches(&self, task: &Task) -> bool {
        self.status.map_or(true, |s| task.status == s)
            && self.status_not.map_or(true, |s| task.status != s)
            && self.priority.map_or(true, |p| task.priority == p)
            && self
                .due_before
                .map_or(true, |limit| task.due_date.map_or(false, |due| due < limit))
    }
}

/// Task field that can be grouped and counted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    Status,
    Priority,
}

impl GroupField {
    /// Name of the field inside a stored task document
    pub fn document_key(&self) -> &'static str {
        match self {
            GroupField::Status => "status",
            GroupField::Priority => "priority",
        }
    }
}

/// One bucket of a grouped count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    /// Raw stored value of the grouped field
    pub value: String,

    /// Number of tasks holding that value
    pub count: u64,
}
