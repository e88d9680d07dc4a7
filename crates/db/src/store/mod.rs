//! The store dependency injected into request handlers.

mod memory;
mod pg;

use std::sync::Arc;

use async_trait::async_trait;
use todo_core::list_query::TodoFilter;
use todo_core::types::DbId;

use crate::models::todo::{CreateTodo, Todo, UpdateTodo};

pub use memory::InMemoryTodoStore;
pub use pg::PgTodoStore;

/// Persistence operations for todos.
///
/// Every mutating call is atomic on its own; callers perform at most one per
/// request.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Todos matching `filter`, in ascending id order.
    async fn list(&self, filter: &TodoFilter) -> Result<Vec<Todo>, sqlx::Error>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Todo>, sqlx::Error>;

    /// Insert a todo. The store assigns `id`, `created_at` and `updated_at`.
    async fn create(&self, input: &CreateTodo) -> Result<Todo, sqlx::Error>;

    /// Apply `input` and refresh `updated_at`. `None` if `id` does not exist.
    async fn update(&self, id: DbId, input: &UpdateTodo) -> Result<Option<Todo>, sqlx::Error>;

    /// Remove a todo, returning it if it existed.
    async fn delete(&self, id: DbId) -> Result<Option<Todo>, sqlx::Error>;

    /// Cheap reachability probe of the backing store.
    async fn health_check(&self) -> Result<(), sqlx::Error>;
}

/// Shared, type-erased store handle held in application state.
pub type SharedTodoStore = Arc<dyn TodoStore>;
