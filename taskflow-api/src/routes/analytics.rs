/// Dashboard analytics endpoints
///
/// All figures are computed from live data on each request.
///
/// # Endpoints
///
/// - `GET /api/analytics/overview`
/// - `GET /api/analytics/tasks-by-status`
/// - `GET /api/analytics/tasks-by-priority`

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use chrono::Utc;
use std::collections::BTreeMap;
use taskflow_shared::{
    analytics::{self, Overview},
    models::task::{TaskPriority, TaskStatus},
};

/// Task totals, status and priority breakdown, overdue count and completion rate
///
/// Response:
/// ```json
/// {
///   "total_tasks": 3,
///   "completed_tasks": 1,
///   "in_progress_tasks": 1,
///   "todo_tasks": 1,
///   "high_priority_tasks": 0,
///   "urgent_priority_tasks": 1,
///   "overdue_tasks": 1,
///   "completion_rate": 33.333333333333336
/// }
/// ```
pub async fn overview(State(state): State<AppState>) -> ApiResult<Json<Overview>> {
    let today = Utc::now().date_naive();
    let overview = analytics::overview(state.repo.as_ref(), today).await?;
    Ok(Json(overview))
}

/// Count of tasks per status present in the data
///
/// Response: `{ "todo": 2, "completed": 1 }`
pub async fn tasks_by_status(
    State(state): State<AppState>,
) -> ApiResult<Json<BTreeMap<TaskStatus, u64>>> {
    Ok(Json(analytics::tasks_by_status(state.repo.as_ref()).await?))
}

/// Count of tasks per priority present in the data
///
/// Response: `{ "medium": 2, "urgent": 1 }`
pub async fn tasks_by_priority(
    State(state): State<AppState>,
) -> ApiResult<Json<BTreeMap<TaskPriority, u64>>> {
    Ok(Json(analytics::tasks_by_priority(state.repo.as_ref()).await?))
}
