use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tokio::sync::RwLock;

use crate::auth::{AuthUser, SessionData};
use crate::error::ApiError;
use crate::state::AppState;

/// Request-scoped handle on the signed session cookie.
///
/// Installed by [`session_middleware`]; any change marks the session dirty
/// and the middleware re-issues the cookie on the way out.
#[derive(Clone, Debug, Default)]
pub struct Session {
    inner: Arc<RwLock<SessionState>>,
}

#[derive(Debug, Default)]
struct SessionState {
    data: SessionData,
    dirty: bool,
}

impl Session {
    pub fn new(data: SessionData) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionState { data, dirty: false })),
        }
    }

    pub async fn user(&self) -> Option<AuthUser> {
        self.inner.read().await.data.user.clone()
    }

    pub async fn set_user(&self, user: AuthUser) {
        let mut state = self.inner.write().await;
        state.data.user = Some(user);
        state.dirty = true;
    }

    pub async fn set_state(&self, oauth_state: String) {
        let mut state = self.inner.write().await;
        state.data.state = Some(oauth_state);
        state.dirty = true;
    }

    /// Remove and return the pending OAuth2 state; it is single-use
    pub async fn take_state(&self) -> Option<String> {
        let mut state = self.inner.write().await;
        let taken = state.data.state.take();
        if taken.is_some() {
            state.dirty = true;
        }
        taken
    }

    async fn changes(&self) -> Option<SessionData> {
        let state = self.inner.read().await;
        state.dirty.then(|| state.data.clone())
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| ApiError::internal_server_error("Session layer is not installed"))
    }
}

/// Restores the session from its cookie and writes it back when it changed
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let oauth = &state.oauth;
    let data = read_cookie(request.headers(), &oauth.session_name)
        .and_then(|token| oauth.sessions.decode(&token))
        .unwrap_or_default();

    let session = Session::new(data);
    request.extensions_mut().insert(session.clone());

    let mut response = next.run(request).await;

    if let Some(changed) = session.changes().await {
        match oauth.sessions.encode(&changed) {
            Ok(token) => {
                let cookie = format!(
                    "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
                    oauth.session_name,
                    token,
                    oauth.sessions.ttl().num_seconds()
                );
                match HeaderValue::from_str(&cookie) {
                    Ok(value) => {
                        response.headers_mut().append(header::SET_COOKIE, value);
                    }
                    Err(e) => tracing::error!("Session cookie is not a valid header: {}", e),
                }
            }
            Err(e) => tracing::error!("Failed to sign session: {}", e),
        }
    }

    response
}

/// Value of the named cookie, searching every `Cookie` header
fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}
