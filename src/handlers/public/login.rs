// handlers/public/login.rs - GET /login, start of the OAuth2 authorization-code flow

use axum::{extract::State, response::Redirect};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::Session;
use crate::state::AppState;

/// GET /login - remember a fresh `state` in the session and send the
/// browser to the provider's consent page
pub async fn login(State(state): State<AppState>, session: Session) -> Result<Redirect, ApiError> {
    let oauth_state = Uuid::new_v4().simple().to_string();
    let url = state.provider.authorize_url(&state.oauth, &oauth_state)?;

    session.set_state(oauth_state).await;
    tracing::debug!("Redirecting to identity provider");
    Ok(Redirect::to(url.as_str()))
}
