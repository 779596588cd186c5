use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{rejection::QueryRejection, FromRequestParts, Query, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize, Serializer};

use crate::auth::{AuthError, AuthUser};
use crate::error::ApiError;
use crate::state::AppState;

use super::session::Session;

/// Where unauthenticated requests to the protected area are sent
pub const LOGIN_PATH: &str = "/login";

/// Authenticated-user context visible to handlers.
///
/// Serializes as the user descriptor, or `null` when anonymous.
#[derive(Clone, Debug, PartialEq)]
pub enum CurrentUser {
    Authenticated(AuthUser),
    Anonymous,
}

impl CurrentUser {
    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            CurrentUser::Authenticated(user) => Some(user),
            CurrentUser::Anonymous => None,
        }
    }
}

impl Serialize for CurrentUser {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CurrentUser::Authenticated(user) => user.serialize(serializer),
            CurrentUser::Anonymous => serializer.serialize_none(),
        }
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .unwrap_or(CurrentUser::Anonymous))
    }
}

/// Query parameters the provider appends when redirecting back
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
}

/// Gate for the protected subtree.
///
/// Lets through sessions that already carry a user, completes the
/// authorization-code flow when the provider redirects back with
/// `code` + `state`, and sends everyone else to the login handler.
pub async fn auth_middleware(
    State(state): State<AppState>,
    session: Session,
    callback: Result<Query<CallbackQuery>, QueryRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(user) = session.user().await {
        request.extensions_mut().insert(CurrentUser::Authenticated(user));
        return Ok(next.run(request).await);
    }

    let Query(callback) = callback?;
    let (code, returned_state) = match (callback.code, callback.state) {
        (Some(code), Some(returned_state)) => (code, returned_state),
        _ => {
            tracing::debug!("No session for {}, redirecting to login", request.uri().path());
            return Ok(Redirect::to(LOGIN_PATH).into_response());
        }
    };

    let expected = session.take_state().await;
    if expected.as_deref() != Some(returned_state.as_str()) {
        tracing::warn!("OAuth2 callback state mismatch on {}", request.uri().path());
        return Err(AuthError::StateMismatch.into());
    }

    let user = state.provider.exchange(&state.oauth, &code).await?;
    tracing::info!(login = %user.login, "User authenticated");

    session.set_user(user.clone()).await;
    request.extensions_mut().insert(CurrentUser::Authenticated(user));
    Ok(next.run(request).await)
}
