/// Service identity endpoint
///
/// ```text
/// GET /api/
/// ```
///
/// Response:
/// ```json
/// { "message": "TaskFlow Manager API" }
/// ```

use super::MessageResponse;
use axum::Json;

/// Name reported by the identity endpoint
pub const SERVICE_NAME: &str = "TaskFlow Manager API";

pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new(SERVICE_NAME))
}
