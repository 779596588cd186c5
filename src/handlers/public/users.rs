// handlers/public/users.rs - /users CRUD handlers

use axum::extract::{rejection::PathRejection, Path, State};

use crate::api::JsonBody;
use crate::database::{parse_id, Person, PersonInput};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /users - every person, ordered by id
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Person>> {
    let people = state.store.list().await?;
    Ok(ApiResponse::success(people))
}

/// GET /users/:id - a single person
pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Person> {
    let Path(id) = path?;
    let id = parse_id(&id)?;
    let person = state.store.get(id).await?;
    Ok(ApiResponse::success(person))
}

/// POST /users - create a person; the store assigns the id
pub async fn create(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<PersonInput>,
) -> ApiResult<Person> {
    let person = state.store.create(input).await?;
    tracing::info!(id = person.id, "Created person");
    Ok(ApiResponse::created(person))
}

/// PUT /users/:id - whole-record replace of an existing person.
///
/// The record is looked up before the body is read, so an unknown id is a
/// 404 even when the body is also bad.
pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Result<JsonBody<PersonInput>, ApiError>,
) -> ApiResult<Person> {
    let Path(id) = path?;
    let id = parse_id(&id)?;
    let mut person = state.store.get(id).await?;

    let JsonBody(input) = body?;
    person.replace_with(input);

    let saved = state.store.save(person).await?;
    tracing::info!(id = saved.id, "Updated person");
    Ok(ApiResponse::success(saved))
}
