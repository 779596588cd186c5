use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Integer identity assigned by the store on create
pub type PersonId = i64;

/// A persisted person row, audit columns included
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub age: i32,
    pub height: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Client-writable fields of a person.
///
/// Unknown keys are ignored, so an `id` or audit timestamp sent by the
/// client never reaches the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonInput {
    pub name: String,
    pub age: i32,
    pub height: i32,
}

impl Person {
    /// Whole-record replace of the client-writable fields
    pub fn replace_with(&mut self, input: PersonInput) {
        self.name = input.name;
        self.age = input.age;
        self.height = input.height;
    }
}
