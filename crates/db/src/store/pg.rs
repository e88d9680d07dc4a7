use async_trait::async_trait;
use todo_core::list_query::TodoFilter;
use todo_core::types::DbId;

use super::TodoStore;
use crate::models::todo::{CreateTodo, Todo, UpdateTodo};
use crate::repositories::TodoRepo;
use crate::DbPool;

/// [`TodoStore`] backed by PostgreSQL through [`TodoRepo`].
#[derive(Clone)]
pub struct PgTodoStore {
    pool: DbPool,
}

impl PgTodoStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn list(&self, filter: &TodoFilter) -> Result<Vec<Todo>, sqlx::Error> {
        TodoRepo::list(&self.pool, filter).await
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Todo>, sqlx::Error> {
        TodoRepo::find_by_id(&self.pool, id).await
    }

    async fn create(&self, input: &CreateTodo) -> Result<Todo, sqlx::Error> {
        TodoRepo::create(&self.pool, input).await
    }

    async fn update(&self, id: DbId, input: &UpdateTodo) -> Result<Option<Todo>, sqlx::Error> {
        TodoRepo::update(&self.pool, id, input).await
    }

    async fn delete(&self, id: DbId) -> Result<Option<Todo>, sqlx::Error> {
        TodoRepo::delete(&self.pool, id).await
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }
}
