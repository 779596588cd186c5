use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;

use crate::database::models::{Person, PersonId, PersonInput};

/// Errors surfaced by a [`PersonStore`]
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid person id: {0:?}")]
    InvalidId(String),

    #[error("person {0} not found")]
    NotFound(PersonId),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Parse a path-supplied identifier into the store's id type
pub fn parse_id(raw: &str) -> Result<PersonId, StoreError> {
    raw.trim()
        .parse::<PersonId>()
        .map_err(|_| StoreError::InvalidId(raw.to_string()))
}

/// Persistence seam for person records.
///
/// Implementations must be safe to share across request tasks; the router
/// holds one behind an `Arc`. Rows carrying a soft-delete marker are
/// invisible to every operation.
#[async_trait]
pub trait PersonStore: Send + Sync {
    /// Every live record, ordered by id
    async fn list(&self) -> Result<Vec<Person>, StoreError>;

    async fn get(&self, id: PersonId) -> Result<Person, StoreError>;

    /// Insert a new record; the store assigns id and audit timestamps
    async fn create(&self, input: PersonInput) -> Result<Person, StoreError>;

    /// Upsert by primary key, bumping `updated_at`
    async fn save(&self, person: Person) -> Result<Person, StoreError>;
}

const SELECT_COLUMNS: &str = "id, name, age, height, created_at, updated_at, deleted_at";

/// SQLite-backed [`PersonStore`]
#[derive(Debug, Clone)]
pub struct SqlitePersonStore {
    pool: SqlitePool,
}

impl SqlitePersonStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersonStore for SqlitePersonStore {
    async fn list(&self) -> Result<Vec<Person>, StoreError> {
        let sql = format!(
            "SELECT {} FROM people WHERE deleted_at IS NULL ORDER BY id",
            SELECT_COLUMNS
        );
        let people = sqlx::query_as::<_, Person>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(people)
    }

    async fn get(&self, id: PersonId) -> Result<Person, StoreError> {
        let sql = format!(
            "SELECT {} FROM people WHERE id = ? AND deleted_at IS NULL",
            SELECT_COLUMNS
        );
        sqlx::query_as::<_, Person>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    async fn create(&self, input: PersonInput) -> Result<Person, StoreError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO people (name, age, height, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?) RETURNING {}",
            SELECT_COLUMNS
        );
        let person = sqlx::query_as::<_, Person>(&sql)
            .bind(&input.name)
            .bind(input.age)
            .bind(input.height)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!(id = person.id, "created person");
        Ok(person)
    }

    async fn save(&self, person: Person) -> Result<Person, StoreError> {
        let sql = format!(
            "INSERT INTO people (id, name, age, height, created_at, updated_at, deleted_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT(id) DO UPDATE SET \
                name = excluded.name, \
                age = excluded.age, \
                height = excluded.height, \
                updated_at = excluded.updated_at \
             RETURNING {}",
            SELECT_COLUMNS
        );
        let saved = sqlx::query_as::<_, Person>(&sql)
            .bind(person.id)
            .bind(&person.name)
            .bind(person.age)
            .bind(person.height)
            .bind(person.created_at)
            .bind(Utc::now())
            .bind(person.deleted_at)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!(id = saved.id, "saved person");
        Ok(saved)
    }
}
