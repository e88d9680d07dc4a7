//! Repository for the `todos` table.

use sqlx::PgPool;
use todo_core::list_query::TodoFilter;
use todo_core::types::DbId;

use crate::models::todo::{CreateTodo, Todo, UpdateTodo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, completed, deadline_at, created_at, updated_at";

/// Provides CRUD operations for todos.
pub struct TodoRepo;

impl TodoRepo {
    /// Insert a new todo, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTodo) -> Result<Todo, sqlx::Error> {
        let query = format!(
            "INSERT INTO todos (title, description, completed, deadline_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Todo>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.completed)
            .bind(input.deadline_at)
            .fetch_one(pool)
            .await
    }

    /// Find a todo by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Todo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM todos WHERE id = $1");
        sqlx::query_as::<_, Todo>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List todos matching `filter`, ordered by ID.
    ///
    /// Rows with a null `deadline_at` never satisfy a deadline bound.
    pub async fn list(pool: &PgPool, filter: &TodoFilter) -> Result<Vec<Todo>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM todos \
             WHERE ($1::BOOL IS NULL OR completed = $1) \
               AND ($2::TIMESTAMP IS NULL OR deadline_at <= $2) \
             ORDER BY id"
        );
        sqlx::query_as::<_, Todo>(&query)
            .bind(filter.completed)
            .bind(filter.deadline_on_or_before)
            .fetch_all(pool)
            .await
    }

    /// Update a todo. Only supplied fields in `input` are applied and
    /// `updated_at` is always refreshed.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTodo,
    ) -> Result<Option<Todo>, sqlx::Error> {
        let query = format!(
            "UPDATE todos SET \
                title = COALESCE($2, title), \
                description = CASE WHEN $3::BOOL THEN $4::TEXT ELSE description END, \
                completed = COALESCE($5, completed), \
                deadline_at = CASE WHEN $6::BOOL THEN $7::TIMESTAMP ELSE deadline_at END, \
                updated_at = NOW() AT TIME ZONE 'utc' \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Todo>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.description.is_some())
            .bind(input.description.clone().flatten())
            .bind(input.completed)
            .bind(input.deadline_at.is_some())
            .bind(input.deadline_at.flatten())
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a todo, returning the removed row if it existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Todo>, sqlx::Error> {
        let query = format!("DELETE FROM todos WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Todo>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
