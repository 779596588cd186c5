// HTTP API Error Types
use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    BoxError, Json,
};
use serde_json::{json, Value};

use crate::auth::AuthError;
use crate::database::StoreError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    InvalidJson(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 408 Request Timeout
    RequestTimeout(String),

    // 413 Payload Too Large
    PayloadTooLarge(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 502 Bad Gateway (identity provider issues)
    BadGateway(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RequestTimeout(_) => StatusCode::REQUEST_TIMEOUT,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::InvalidJson(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::RequestTimeout(msg) => msg,
            ApiError::PayloadTooLarge(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::BadGateway(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({ "error": self.message() })
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn request_timeout(message: impl Into<String>) -> Self {
        ApiError::RequestTimeout(message.into())
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        ApiError::PayloadTooLarge(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        ApiError::BadGateway(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidId(raw) => {
                ApiError::bad_request(format!("invalid id {:?}: expected an integer", raw))
            }
            StoreError::NotFound(id) => ApiError::not_found(format!("person {} not found", id)),
            StoreError::Sqlx(sqlx::Error::RowNotFound) => ApiError::not_found("person not found"),
            StoreError::Sqlx(sqlx_err @ (sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed)) => {
                tracing::error!("Database unavailable: {}", sqlx_err);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            StoreError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error("Database error occurred")
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::StateMismatch => ApiError::unauthorized("Invalid session state"),
            AuthError::Exchange(reason) => {
                tracing::warn!("OAuth2 code exchange rejected: {}", reason);
                ApiError::unauthorized("Login was rejected by the identity provider")
            }
            AuthError::Provider(e) => {
                tracing::error!("Identity provider request failed: {}", e);
                ApiError::bad_gateway("Identity provider unavailable")
            }
            other => {
                tracing::error!("Auth error: {}", other);
                ApiError::internal_server_error("Authentication is misconfigured")
            }
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(format!("Invalid path: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(format!("Invalid query string: {}", rejection.body_text()))
    }
}

/// Maps failures from the tower middleware stack (timeouts) into API errors
pub async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        ApiError::request_timeout("Request took too long")
    } else {
        tracing::error!("Unhandled middleware error: {}", err);
        ApiError::internal_server_error("Unhandled internal error")
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_distinct_statuses() {
        let cases = [
            (StoreError::InvalidId("abc".into()), StatusCode::BAD_REQUEST),
            (StoreError::NotFound(9), StatusCode::NOT_FOUND),
            (StoreError::Sqlx(sqlx::Error::RowNotFound), StatusCode::NOT_FOUND),
            (StoreError::Sqlx(sqlx::Error::PoolTimedOut), StatusCode::SERVICE_UNAVAILABLE),
            (StoreError::Sqlx(sqlx::Error::Protocol("boom".into())), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code(), status);
        }
    }

    #[test]
    fn internal_details_are_not_leaked() {
        let err = ApiError::from(StoreError::Sqlx(sqlx::Error::Protocol("secret table layout".into())));
        assert!(!err.message().contains("secret"));
    }

    #[test]
    fn auth_errors_map_to_statuses() {
        assert_eq!(ApiError::from(AuthError::StateMismatch).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::from(AuthError::Exchange("bad code".into())).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn body_is_error_object() {
        let body = ApiError::not_found("person 3 not found").to_json();
        assert_eq!(body, json!({"error": "person 3 not found"}));
    }

    #[tokio::test]
    async fn elapsed_maps_to_request_timeout() {
        let err: BoxError = Box::new(tower::timeout::error::Elapsed::new());
        assert_eq!(handle_middleware_error(err).await.status_code(), StatusCode::REQUEST_TIMEOUT);
    }
}
