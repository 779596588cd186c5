#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use url::Url;

use person_api::auth::{AuthError, AuthUser, Credentials, IdentityProvider, OAuthConfig};
use person_api::config::AuthConfig;
use person_api::database::{self, SqlitePersonStore};
use person_api::AppState;

pub const GOOD_CODE: &str = "good-code";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
}

/// Accepts [`GOOD_CODE`] and answers with a fixed GitHub-like user
pub struct StubProvider;

#[async_trait]
impl IdentityProvider for StubProvider {
    fn authorize_url(&self, oauth: &OAuthConfig, state: &str) -> Result<Url, AuthError> {
        Ok(Url::parse_with_params(
            "https://github.example/login/oauth/authorize",
            &[
                ("client_id", oauth.credentials.client_id.as_str()),
                ("redirect_uri", oauth.redirect_url.as_str()),
                ("state", state),
            ],
        )?)
    }

    async fn exchange(&self, _oauth: &OAuthConfig, code: &str) -> Result<AuthUser, AuthError> {
        if code != GOOD_CODE {
            return Err(AuthError::Exchange("bad_verification_code".into()));
        }
        Ok(AuthUser {
            login: "octocat".into(),
            name: "The Octocat".into(),
            email: "octocat@github.com".into(),
            company: "GitHub".into(),
            url: "https://github.com/octocat".into(),
        })
    }
}

/// Serve the real router on a free port, backed by a private in-memory database
pub async fn spawn_server() -> Result<TestServer> {
    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let pool = database::connect_in_memory().await?;
    database::migrate(&pool).await?;

    let auth = AuthConfig {
        redirect_url: format!("{}/auth/", base_url),
        credentials_file: "unused.json".into(),
        scopes: vec!["read:user".into()],
        session_name: "person_session".into(),
        session_secret: "integration-secret".into(),
        session_ttl_hours: 1,
    };
    let credentials: Credentials =
        serde_json::from_str(r#"{"clientid": "client-1", "secret": "shh"}"#)?;
    let oauth = OAuthConfig::new(credentials, &auth)?;

    let state = AppState::new(
        Arc::new(SqlitePersonStore::new(pool)),
        oauth,
        Arc::new(StubProvider),
    );
    let app = person_api::app(state, Duration::from_secs(5));

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    Ok(TestServer { port, base_url })
}

/// Client that leaves redirects for the test to inspect
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("reqwest client")
}

/// `name=value` part of a `Set-Cookie` header
pub fn session_cookie(res: &reqwest::Response) -> Option<String> {
    res.headers()
        .get(reqwest::header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|v| v.to_string())
}
