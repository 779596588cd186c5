pub mod manager;
pub mod models;
pub mod repository;

pub use manager::{connect, connect_in_memory, migrate, DatabaseError};
pub use models::{Person, PersonId, PersonInput};
pub use repository::{parse_id, PersonStore, SqlitePersonStore, StoreError};
