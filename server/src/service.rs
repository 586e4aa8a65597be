//! Use cases over the todo store.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{TodoError, TodoResult};
use crate::model::{Todo, TodoPatch};
use crate::store::TodoStore;

/// Cheap to clone; every clone shares the same store handle.
#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> TodoResult<Vec<Todo>> {
        self.store.find_all().await
    }

    pub async fn get_by_id(&self, id: i64) -> TodoResult<Todo> {
        match self.store.find_by_id(id).await? {
            Some(todo) => Ok(todo),
            None => {
                debug!(id, "todo lookup missed");
                Err(TodoError::NotFound(id))
            }
        }
    }

    pub async fn create(&self, text: &str) -> TodoResult<Todo> {
        let todo = self.store.create(text).await?;
        info!(id = todo.id, "todo created");
        Ok(todo)
    }

    /// Merge `patch` over the stored todo and persist the result.
    pub async fn update(&self, id: i64, patch: TodoPatch) -> TodoResult<Todo> {
        let mut todo = self.get_by_id(id).await?;
        patch.apply(&mut todo);

        let updated = self
            .store
            .update(&todo)
            .await?
            .ok_or(TodoError::NotFound(id))?;
        info!(id, completed = updated.completed_at.is_some(), "todo updated");
        Ok(updated)
    }

    /// Remove the todo and hand back what it looked like before deletion.
    pub async fn delete_by_id(&self, id: i64) -> TodoResult<Todo> {
        let snapshot = self.get_by_id(id).await?;
        if !self.store.delete(id).await? {
            return Err(TodoError::NotFound(id));
        }
        info!(id, "todo deleted");
        Ok(snapshot)
    }
}
