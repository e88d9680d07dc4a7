//! Todo entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use todo_core::error::CoreError;
use todo_core::todo::{
    bool_field, deadline_field, nullable_bool_field, nullable_string_field, title_field, Payload,
    TITLE_MISSING,
};
use todo_core::types::{DbId, NaiveTimestamp};

/// A row from the `todos` table.
///
/// Serializes to the public todo shape; absent `description` and
/// `deadline_at` render as `null`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Todo {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub deadline_at: Option<NaiveTimestamp>,
    pub created_at: NaiveTimestamp,
    pub updated_at: NaiveTimestamp,
}

/// DTO for creating a new todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTodo {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub deadline_at: Option<NaiveTimestamp>,
}

impl CreateTodo {
    /// Build from a request payload whose keys were already checked.
    ///
    /// `title` is required. A null `completed` counts as `false`.
    pub fn from_payload(payload: &Payload) -> Result<Self, CoreError> {
        let title =
            title_field(payload)?.ok_or_else(|| CoreError::Validation(TITLE_MISSING.to_string()))?;
        let description = nullable_string_field(payload, "description")?.flatten();
        let completed = nullable_bool_field(payload, "completed")?
            .flatten()
            .unwrap_or(false);
        let deadline_at = deadline_field(payload)?.flatten();

        Ok(Self {
            title,
            description,
            completed,
            deadline_at,
        })
    }
}

/// DTO for updating an existing todo. All fields optional.
///
/// For the nullable columns the outer `Option` says whether the field was
/// supplied and the inner one carries the new value, so `Some(None)` clears.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
    pub deadline_at: Option<Option<NaiveTimestamp>>,
}

impl UpdateTodo {
    /// Build from a request payload whose keys were already checked.
    pub fn from_payload(payload: &Payload) -> Result<Self, CoreError> {
        Ok(Self {
            title: title_field(payload)?,
            description: nullable_string_field(payload, "description")?,
            completed: bool_field(payload, "completed")?,
            deadline_at: deadline_field(payload)?,
        })
    }

    /// Apply the supplied fields to `todo`. Timestamps are left to the store.
    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title = title.clone();
        }
        if let Some(description) = &self.description {
            todo.description = description.clone();
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
        if let Some(deadline_at) = self.deadline_at {
            todo.deadline_at = deadline_at;
        }
    }
}
