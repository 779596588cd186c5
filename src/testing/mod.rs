use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use url::Url;

use crate::auth::{AuthError, AuthUser, Credentials, IdentityProvider, OAuthConfig};
use crate::config::AuthConfig;
use crate::database::{self, Person, PersonId, PersonInput, PersonStore, SqlitePersonStore, StoreError};
use crate::state::AppState;

/// Provider double: accepts the code `good-code`, rejects everything else
pub struct StubProvider;

#[async_trait]
impl IdentityProvider for StubProvider {
    fn authorize_url(&self, _oauth: &OAuthConfig, state: &str) -> Result<Url, AuthError> {
        Ok(Url::parse_with_params("https://provider.test/authorize", &[("state", state)])?)
    }

    async fn exchange(&self, _oauth: &OAuthConfig, code: &str) -> Result<AuthUser, AuthError> {
        if code == "good-code" {
            Ok(test_user())
        } else {
            Err(AuthError::Exchange("bad_verification_code".into()))
        }
    }
}

/// Store double whose every call fails like a broken database
pub struct FailingStore;

#[async_trait]
impl PersonStore for FailingStore {
    async fn list(&self) -> Result<Vec<Person>, StoreError> {
        Err(broken())
    }

    async fn get(&self, _id: PersonId) -> Result<Person, StoreError> {
        Err(broken())
    }

    async fn create(&self, _input: PersonInput) -> Result<Person, StoreError> {
        Err(broken())
    }

    async fn save(&self, _person: Person) -> Result<Person, StoreError> {
        Err(broken())
    }
}

/// Store double whose listing outlives any short request deadline
pub struct SlowStore;

#[async_trait]
impl PersonStore for SlowStore {
    async fn list(&self) -> Result<Vec<Person>, StoreError> {
        tokio::time::sleep(Duration::from_secs(3)).await;
        Ok(Vec::new())
    }

    async fn get(&self, id: PersonId) -> Result<Person, StoreError> {
        Err(StoreError::NotFound(id))
    }

    async fn create(&self, _input: PersonInput) -> Result<Person, StoreError> {
        Err(broken())
    }

    async fn save(&self, _person: Person) -> Result<Person, StoreError> {
        Err(broken())
    }
}

fn broken() -> StoreError {
    StoreError::Sqlx(sqlx::Error::Protocol("disk I/O error".into()))
}

pub fn test_user() -> AuthUser {
    AuthUser {
        login: "octocat".into(),
        name: "The Octocat".into(),
        email: "octocat@github.com".into(),
        company: "GitHub".into(),
        url: "https://github.com/octocat".into(),
    }
}

pub fn test_oauth() -> OAuthConfig {
    let config = AuthConfig {
        redirect_url: "http://localhost:8080/auth/".into(),
        credentials_file: "unused.json".into(),
        scopes: vec!["read:user".into()],
        session_name: "person_session".into(),
        session_secret: "test-secret".into(),
        session_ttl_hours: 1,
    };
    let credentials = Credentials { client_id: "client-1".into(), client_secret: "shh".into() };
    OAuthConfig::new(credentials, &config).expect("valid test oauth config")
}

fn router(store: Arc<dyn PersonStore>) -> Router {
    router_with_deadline(store, Duration::from_secs(5))
}

fn router_with_deadline(store: Arc<dyn PersonStore>, deadline: Duration) -> Router {
    let state = AppState::new(store, test_oauth(), Arc::new(StubProvider));
    crate::app(state, deadline)
}

/// Full router over a fresh in-memory database
pub async fn test_app() -> Router {
    let pool = database::connect_in_memory().await.expect("in-memory database");
    database::migrate(&pool).await.expect("schema");
    router(Arc::new(SqlitePersonStore::new(pool)))
}

/// Full router whose store always fails
pub fn failing_app() -> Router {
    router(Arc::new(FailingStore))
}

/// Full router over [`SlowStore`] with the given request deadline
pub fn slow_app(deadline: Duration) -> Router {
    router_with_deadline(Arc::new(SlowStore), deadline)
}

/// One request through the router; the body is parsed as JSON when present
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .expect("valid request");

    let response = app.clone().oneshot(request).await.expect("infallible router");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON response body")
    };
    (status, value)
}
