use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

#[cfg(test)]
pub mod testing;

pub use state::AppState;

/// Build the full router: public routes, the gated `/auth` subtree, and the
/// session, deadline and tracing layers around all of it
pub fn app(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(private_routes(state.clone()))
        .fallback(not_found)
        .layer(from_fn_with_state(state.clone(), middleware::session_middleware))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(error::handle_middleware_error))
                .timeout(request_timeout),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    use handlers::public::{self, users};

    Router::new()
        .route("/ping", get(public::ping))
        .route("/users", get(users::list).post(users::create))
        .route("/users/:id", get(users::get).put(users::update))
        .route("/login", get(public::login))
}

fn private_routes(state: AppState) -> Router<AppState> {
    use handlers::protected;

    Router::new()
        .route("/auth", get(protected::user_info))
        .route("/auth/", get(protected::user_info))
        .route("/auth/api", get(protected::api))
        .route_layer(from_fn_with_state(state, middleware::auth_middleware))
}

async fn not_found(uri: axum::http::Uri) -> error::ApiError {
    error::ApiError::not_found(format!("No route for {}", uri.path()))
}
