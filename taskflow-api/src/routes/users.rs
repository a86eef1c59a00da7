/// User endpoints
///
/// # Endpoints
///
/// - `POST /api/users` - Create user
/// - `GET /api/users` - List users

use crate::{app::AppState, error::ApiResult, extract::ValidatedJson};
use axum::{extract::State, Json};
use taskflow_shared::models::user::{User, UserCreate};
use tracing::info;

/// Create a user
///
/// ```text
/// POST /api/users
/// Content-Type: application/json
///
/// { "name": "Jane Doe", "email": "jane@example.com", "role": "admin" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: a user with this email already exists
/// - `422 Unprocessable Entity`: missing name or email
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<UserCreate>,
) -> ApiResult<Json<User>> {
    let user = User::new(req);
    state.repo.insert_user(&user).await?;

    info!(user_id = %user.id, role = %user.role, "User created");
    Ok(Json(user))
}

/// List all users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    let users = state.repo.find_all_users().await?;
    Ok(Json(users))
}
