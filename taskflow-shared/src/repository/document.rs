/// Stored document shapes
///
/// The store has no calendar-date type distinct from date-time, so every
/// model is converted explicitly before it is written and parsed after it is
/// read:
///
/// - calendar dates are `YYYY-MM-DD` strings
/// - timestamps are RFC 3339 strings with microsecond precision and a `Z`
///   suffix, so lexical order is chronological order
/// - enums are their snake_case names
///
/// Both repository backends persist these types, never the models directly.

use crate::{
    error::{StoreError, StoreResult},
    models::{
        task::{Task, TaskUpdate},
        user::User,
    },
};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Formats a timestamp for storage
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parses a stored timestamp
pub fn parse_timestamp(value: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| StoreError::MalformedDocument(format!("invalid timestamp {:?}: {}", value, e)))
}

/// Formats a calendar date for storage
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a stored calendar date
pub fn parse_date(value: &str) -> StoreResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| StoreError::MalformedDocument(format!("invalid date {:?}: {}", value, e)))
}

/// A task as it sits in the `tasks` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDocument {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: String,
    pub priority: String,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Task> for TaskDocument {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status.as_str().to_string(),
            priority: task.priority.as_str().to_string(),
            due_date: task.due_date.as_ref().map(format_date),
            assigned_to: task.assigned_to.clone(),
            tags: task.tags.clone(),
            created_at: format_timestamp(&task.created_at),
            updated_at: format_timestamp(&task.updated_at),
        }
    }
}

impl TryFrom<TaskDocument> for Task {
    type Error = StoreError;

    fn try_from(doc: TaskDocument) -> StoreResult<Self> {
        let malformed = |e: crate::models::task::UnknownVariant| {
            StoreError::MalformedDocument(format!("task {}: {}", doc.id, e))
        };

        Ok(Task {
            status: doc.status.parse().map_err(malformed)?,
            priority: doc.priority.parse().map_err(malformed)?,
            due_date: doc.due_date.as_deref().map(parse_date).transpose()?,
            created_at: parse_timestamp(&doc.created_at)?,
            updated_at: parse_timestamp(&doc.updated_at)?,
            id: doc.id,
            title: doc.title,
            description: doc.description,
            assigned_to: doc.assigned_to,
            tags: doc.tags,
        })
    }
}

/// The subset of task fields written by an update
///
/// Serializes to a JSON object holding only the provided fields plus
/// `updated_at`, suitable for merging onto a stored document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskPatchDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub updated_at: String,
}

impl TaskPatchDocument {
    /// Builds the patch for `update`, stamped with `updated_at`
    pub fn new(update: &TaskUpdate, updated_at: &DateTime<Utc>) -> Self {
        Self {
            title: update.title.clone(),
            description: update.description.clone(),
            status: update.status.map(|s| s.as_str().to_string()),
            priority: update.priority.map(|p| p.as_str().to_string()),
            due_date: update.due_date.as_ref().map(format_date),
            assigned_to: update.assigned_to.clone(),
            tags: update.tags.clone(),
            updated_at: format_timestamp(updated_at),
        }
    }

    /// Merges the patch onto a stored document
    pub fn apply(&self, doc: &mut TaskDocument) {
        if let Some(title) = &self.title {
            doc.title = title.clone();
        }
        if let Some(description) = &self.description {
            doc.description = description.clone();
        }
        if let Some(status) = &self.status {
            doc.status = status.clone();
        }
        if let Some(priority) = &self.priority {
            doc.priority = priority.clone();
        }
        if self.due_date.is_some() {
            doc.due_date = self.due_date.clone();
        }
        if self.assigned_to.is_some() {
            doc.assigned_to = self.assigned_to.clone();
        }
        if let Some(tags) = &self.tags {
            doc.tags = tags.clone();
        }
        doc.updated_at = self.updated_at.clone();
    }
}

/// A user as it sits in the `users` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDocument {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: String,
}

impl From<&User> for UserDocument {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            created_at: format_timestamp(&user.created_at),
        }
    }
}

impl TryFrom<UserDocument> for User {
    type Error = StoreError;

    fn try_from(doc: UserDocument) -> StoreResult<Self> {
        Ok(User {
            created_at: parse_timestamp(&doc.created_at)?,
            id: doc.id,
            name: doc.name,
            email: doc.email,
            role: doc.role,
        })
    }
}
