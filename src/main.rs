use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use person_api::auth::{GitHubProvider, OAuthConfig};
use person_api::config::{AppConfig, Args};
use person_api::database::{self, SqlitePersonStore};
use person_api::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SESSION_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_args(Args::parse());

    let oauth = OAuthConfig::setup(&config.auth).context("failed to set up GitHub OAuth2")?;
    let provider = GitHubProvider::new().context("failed to build GitHub client")?;

    let pool = database::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    database::migrate(&pool).await.context("failed to migrate database")?;

    let state = AppState::new(
        Arc::new(SqlitePersonStore::new(pool)),
        oauth,
        Arc::new(provider),
    );
    let app = person_api::app(state, Duration::from_secs(config.server.request_timeout_secs));

    let listener = tokio::net::TcpListener::bind(&config.server.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.listen_addr))?;

    tracing::info!("Person API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
