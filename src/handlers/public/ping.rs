// handlers/public/ping.rs - GET /ping liveness probe

use serde_json::{json, Value};

use crate::middleware::ApiResponse;

pub async fn ping() -> ApiResponse<Value> {
    ApiResponse::success(json!({ "message": "pong" }))
}
