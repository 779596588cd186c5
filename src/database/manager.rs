use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors raised while opening or preparing the database
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL {url}: {source}")]
    InvalidDatabaseUrl {
        url: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Failed to connect to {url}: {source}")]
    ConnectionError {
        url: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Schema migration failed: {0}")]
    MigrationError(#[source] sqlx::Error),
}

/// DDL for the person table; safe to run on every start
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS people (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT    NOT NULL,
        age         INTEGER NOT NULL,
        height      INTEGER NOT NULL,
        created_at  TEXT    NOT NULL,
        updated_at  TEXT    NOT NULL,
        deleted_at  TEXT
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_people_deleted_at ON people (deleted_at)",
];

/// Open a pool for the configured database, creating the file if needed
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|source| DatabaseError::InvalidDatabaseUrl {
            url: config.url.clone(),
            source,
        })?
        .create_if_missing(true);

    let mut pool_options = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout));

    // Every in-memory connection is its own database, so pin the pool to one.
    // A query cancelled by the request deadline can still drop that connection
    // and the data with it; in-memory databases are for tests only.
    if is_in_memory(&config.url) {
        pool_options = pool_options
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(|source| DatabaseError::ConnectionError {
            url: config.url.clone(),
            source,
        })?;

    info!("Opened database pool for: {}", config.url);
    Ok(pool)
}

/// Private in-memory database, used by tests
pub async fn connect_in_memory() -> Result<SqlitePool, DatabaseError> {
    connect(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        connection_timeout: 5,
    })
    .await
}

/// Create the person table if it is absent
pub async fn migrate(pool: &SqlitePool) -> Result<(), DatabaseError> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(DatabaseError::MigrationError)?;
    }
    info!("Database schema is up to date");
    Ok(())
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
