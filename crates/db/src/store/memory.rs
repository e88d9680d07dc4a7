use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use tokio::sync::RwLock;
use todo_core::list_query::TodoFilter;
use todo_core::types::{DbId, NaiveTimestamp};

use super::TodoStore;
use crate::models::todo::{CreateTodo, Todo, UpdateTodo};

/// [`TodoStore`] kept in process memory.
///
/// Ids start at 1 and are never reused, like a `BIGSERIAL` column.
/// Timestamps are truncated to microseconds to match PostgreSQL precision.
#[derive(Debug)]
pub struct InMemoryTodoStore {
    state: RwLock<MemoryState>,
}

#[derive(Debug)]
struct MemoryState {
    next_id: DbId,
    todos: BTreeMap<DbId, Todo>,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState {
                next_id: 1,
                todos: BTreeMap::new(),
            }),
        }
    }

    /// Number of stored todos.
    pub async fn len(&self) -> usize {
        self.state.read().await.todos.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryTodoStore {
    fn default() -> Self {
        Self::new()
    }
}

fn now() -> NaiveTimestamp {
    Utc::now().naive_utc().trunc_subsecs(6)
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    async fn list(&self, filter: &TodoFilter) -> Result<Vec<Todo>, sqlx::Error> {
        let state = self.state.read().await;
        Ok(state
            .todos
            .values()
            .filter(|todo| filter.matches(todo.completed, todo.deadline_at))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Todo>, sqlx::Error> {
        Ok(self.state.read().await.todos.get(&id).cloned())
    }

    async fn create(&self, input: &CreateTodo) -> Result<Todo, sqlx::Error> {
        let mut state = self.state.write().await;
        let id = state.next_id;
        state.next_id += 1;

        let created_at = now();
        let todo = Todo {
            id,
            title: input.title.clone(),
            description: input.description.clone(),
            completed: input.completed,
            deadline_at: input.deadline_at,
            created_at,
            updated_at: created_at,
        };
        state.todos.insert(id, todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: DbId, input: &UpdateTodo) -> Result<Option<Todo>, sqlx::Error> {
        let mut state = self.state.write().await;
        let Some(todo) = state.todos.get_mut(&id) else {
            return Ok(None);
        };
        input.apply_to(todo);
        todo.updated_at = now();
        Ok(Some(todo.clone()))
    }

    async fn delete(&self, id: DbId) -> Result<Option<Todo>, sqlx::Error> {
        Ok(self.state.write().await.todos.remove(&id))
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }
}
