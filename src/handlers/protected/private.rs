// handlers/protected/private.rs - endpoints behind the auth gate

use serde_json::{json, Value};

use crate::middleware::{ApiResponse, CurrentUser};

/// GET /auth/ - greets the authenticated user
pub async fn user_info(user: CurrentUser) -> ApiResponse<Value> {
    if let Some(user) = user.user() {
        tracing::debug!(login = %user.login, "Serving private user info");
    }
    ApiResponse::success(json!({ "Hello": "from private", "user": user }))
}

/// GET /auth/api
pub async fn api() -> ApiResponse<Value> {
    ApiResponse::success(json!({ "message": "Hello to private" }))
}
