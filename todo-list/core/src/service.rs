use crate::repository::{RepositoryError, TodoRepository};
use crate::todo::{Todo, TodoError, TodoId, TodoProps, TodoStatus};
use chrono::Utc;
use std::sync::Arc;

/// Input for [`TodoService::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTodo {
    pub title: String,
    pub description: String,
}

/// Error type for TodoService operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TodoServiceError {
    /// The requested todo does not exist.
    #[error("Todo with id {0} not found.")]
    NotFound(TodoId),
    /// The entity rejected the change.
    #[error(transparent)]
    Todo(#[from] TodoError),
    /// The storage backend failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<RepositoryError> for TodoServiceError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound(id) => TodoServiceError::NotFound(id),
            RepositoryError::Storage(message) => TodoServiceError::Storage(message),
        }
    }
}

/// Orchestrates todo use cases on top of a [`TodoRepository`].
///
/// Stored todos are never mutated in place: every change is applied to a
/// clone which is then written back and returned.
#[derive(Clone)]
pub struct TodoService {
    repository: Arc<dyn TodoRepository>,
}

impl TodoService {
    pub fn new(repository: Arc<dyn TodoRepository>) -> Self {
        Self { repository }
    }

    /// Returns all todos in insertion order.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Todo>, TodoServiceError> {
        Ok(self.repository.list().await?)
    }

    /// Looks up a todo. A missing todo is `None` at this layer.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, TodoServiceError> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Creates a pending todo with a fresh ID.
    ///
    /// # Arguments
    ///
    /// * `input` - Title and description of the new todo.
    ///
    /// # Returns
    ///
    /// The stored todo, or `TodoError::InvalidEntity` if either text is blank.
    #[tracing::instrument(skip(self))]
    pub async fn create(&self, input: CreateTodo) -> Result<Todo, TodoServiceError> {
        let now = Utc::now();
        let id = self.repository.next_id().await?;
        let todo = Todo::new(TodoProps {
            id,
            title: input.title,
            description: input.description,
            status: TodoStatus::Pending,
            created_at: now,
            updated_at: now,
        })?;

        self.repository.create(todo.clone()).await?;
        tracing::info!("Created todo {}", id);
        Ok(todo)
    }

    /// Deletes a todo, failing with `NotFound` when it does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: TodoId) -> Result<(), TodoServiceError> {
        self.find_existing(id).await?;
        self.repository.delete(id).await?;
        tracing::info!("Deleted todo {}", id);
        Ok(())
    }

    /// Moves a todo from pending to in progress.
    #[tracing::instrument(skip(self))]
    pub async fn start(&self, id: TodoId) -> Result<Todo, TodoServiceError> {
        self.modify(id, Todo::start).await
    }

    /// Moves a todo from in progress to completed.
    #[tracing::instrument(skip(self))]
    pub async fn complete(&self, id: TodoId) -> Result<Todo, TodoServiceError> {
        self.modify(id, Todo::complete).await
    }

    /// Replaces title and description together. If either is blank nothing changes.
    #[tracing::instrument(skip(self))]
    pub async fn update_details(
        &self,
        id: TodoId,
        title: String,
        description: String,
    ) -> Result<Todo, TodoServiceError> {
        self.modify(id, |todo| {
            todo.set_title(title)?;
            todo.set_description(description)
        })
        .await
    }

    async fn find_existing(&self, id: TodoId) -> Result<Todo, TodoServiceError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TodoServiceError::NotFound(id))
    }

    async fn modify<F>(&self, id: TodoId, change: F) -> Result<Todo, TodoServiceError>
    where
        F: FnOnce(&mut Todo) -> Result<(), TodoError>,
    {
        let stored = self.find_existing(id).await?;
        let mut updated = stored.clone();
        change(&mut updated)?;
        self.repository.update(updated.clone()).await?;
        Ok(updated)
    }
}
