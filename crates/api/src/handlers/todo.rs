//! Handlers for the `/todos` resource.
//!
//! Payload validation is all-or-nothing and finishes before the store is
//! touched, so a rejected request never leaves a partial write behind.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};
use todo_core::error::CoreError;
use todo_core::list_query::TodoFilter;
use todo_core::todo::{as_payload, reject_id_change, reject_unknown_fields, TODO_ENTITY};
use todo_core::types::DbId;
use todo_db::models::todo::{CreateTodo, Todo, UpdateTodo};

use crate::error::{AppError, AppResult};
use crate::query::TodoListParams;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: TODO_ENTITY,
        id,
    })
}

/// GET /api/v1/todos?completed=&window=
///
/// `completed` selects on a case-insensitive `"true"`; `window` keeps todos
/// due within that many days from now. A repeated key keeps its first value.
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> AppResult<Json<Vec<Todo>>> {
    let Query(pairs) = query?;
    let params = TodoListParams::from_pairs(pairs);
    let filter = TodoFilter::from_query(
        params.completed.as_deref(),
        params.window.as_deref(),
        Utc::now().naive_utc(),
    )?;
    let todos = state.store.list(&filter).await?;
    tracing::debug!(count = todos.len(), ?filter, "Listed todos");
    Ok(Json(todos))
}

/// GET /api/v1/todos/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
) -> AppResult<Json<Todo>> {
    let Path(id) = path?;
    let todo = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(todo))
}

/// POST /api/v1/todos
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Todo>)> {
    let Json(body) = body?;
    let payload = as_payload(&body)?;
    reject_unknown_fields(payload)?;
    let input = CreateTodo::from_payload(payload)?;

    let todo = state.store.create(&input).await?;
    tracing::info!(todo_id = todo.id, "Todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

/// PUT /api/v1/todos/{id}
///
/// Checks run in a fixed order: id change (400), existence (404), unknown
/// keys (400), field values (400).
pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Todo>> {
    let Path(id) = path?;
    let Json(body) = body?;
    let payload = as_payload(&body)?;

    reject_id_change(payload, id)?;
    state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    reject_unknown_fields(payload)?;
    let changes = UpdateTodo::from_payload(payload)?;

    let todo = state
        .store
        .update(id, &changes)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(todo_id = id, "Todo updated");
    Ok(Json(todo))
}

/// DELETE /api/v1/todos/{id}
///
/// Idempotent: a missing todo yields `{}` with 200 rather than an error.
pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
) -> AppResult<Response> {
    let Path(id) = path?;
    match state.store.delete(id).await? {
        Some(todo) => {
            tracing::info!(todo_id = id, "Todo deleted");
            Ok(Json(todo).into_response())
        }
        None => {
            tracing::debug!(todo_id = id, "Delete of missing todo ignored");
            Ok(Json(json!({})).into_response())
        }
    }
}
