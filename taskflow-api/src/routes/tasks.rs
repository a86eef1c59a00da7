/// Task management endpoints
///
/// # Endpoints
///
/// - `POST /api/tasks` - Create task
/// - `GET /api/tasks` - List tasks (filters: `status`, `priority`, `assigned_to`)
/// - `GET /api/tasks/:id` - Get task
/// - `PUT /api/tasks/:id` - Update task (partial)
/// - `DELETE /api/tasks/:id` - Delete task

use super::MessageResponse;
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiQuery, ValidatedJson},
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use taskflow_shared::models::task::{
    Task, TaskCreate, TaskFilter, TaskPriority, TaskStatus, TaskUpdate,
};
use tracing::info;

/// Query parameters for listing tasks
#[derive(Debug, Default, Deserialize)]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assigned_to: Option<String>,
}

impl From<TaskQuery> for TaskFilter {
    fn from(query: TaskQuery) -> Self {
        TaskFilter {
            status: query.status,
            priority: query.priority,
            // An empty assignee is treated as no filter
            assigned_to: query.assigned_to.filter(|a| !a.is_empty()),
        }
    }
}

/// Create a task
///
/// The server assigns the id, `todo` status and both timestamps.
///
/// ```text
/// POST /api/tasks
/// Content-Type: application/json
///
/// {
///   "title": "Write release notes",
///   "priority": "high",
///   "due_date": "2025-03-01",
///   "tags": ["docs"]
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: missing/empty title or malformed body
pub async fn create_task(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<TaskCreate>,
) -> ApiResult<Json<Task>> {
    let task = Task::new(req);
    state.repo.insert_task(&task).await?;

    info!(task_id = %task.id, priority = %task.priority, "Task created");
    Ok(Json(task))
}

/// List tasks, newest first
///
/// ```text
/// GET /api/tasks?status=todo&priority=high&assigned_to=alice
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: unknown status or priority value
pub async fn list_tasks(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TaskQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = state.repo.find_tasks(&query.into()).await?;
    Ok(Json(tasks))
}

/// Get a task by id
///
/// # Errors
///
/// - `404 Not Found`: no task with that id
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    let task = state
        .repo
        .find_task_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Update a task
///
/// Only the fields present in the body are changed; `updated_at` is always
/// refreshed.
///
/// ```text
/// PUT /api/tasks/:id
/// Content-Type: application/json
///
/// { "status": "completed" }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: no task with that id
/// - `422 Unprocessable Entity`: malformed body or empty title
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<TaskUpdate>,
) -> ApiResult<Json<Task>> {
    let task = state.repo.update_task(&id, &req).await?;

    info!(task_id = %task.id, status = %task.status, "Task updated");
    Ok(Json(task))
}

/// Delete a task
///
/// Response:
/// ```json
/// { "message": "Task deleted successfully" }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: no task with that id
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.repo.delete_task(&id).await?;

    info!(task_id = %id, "Task deleted");
    Ok(Json(MessageResponse::new("Task deleted successfully")))
}
