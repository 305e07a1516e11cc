//! Storage port for todos.
//!
//! The service only talks to storage through [`TodoRepository`], so the
//! in-memory backend can be replaced by a persistent one without touching
//! the service or the web layer.

use crate::todo::{Todo, TodoId};
use async_trait::async_trait;
use thiserror::Error;

pub mod memory;

/// Errors a storage backend can report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// No stored todo has the given ID.
    #[error("No stored todo with id {0}")]
    NotFound(TodoId),
    /// The backend failed for a reason unrelated to the request.
    #[error("Storage failure: {0}")]
    Storage(String),
}

/// Trait defining CRUD operations over stored todos.
///
/// Implementations hand out owned copies; mutating a returned todo never
/// changes what is stored until it is written back with [`update`](Self::update).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Reserves the next unused todo ID, greater than every ID stored so far.
    async fn next_id(&self) -> Result<TodoId, RepositoryError>;

    /// Appends a todo. IDs are not checked for duplicates, but later calls
    /// to [`next_id`](Self::next_id) never return an ID stored here.
    async fn create(&self, todo: Todo) -> Result<(), RepositoryError>;

    /// Replaces the stored todo with the same ID.
    ///
    /// # Errors
    ///
    /// [`RepositoryError::NotFound`] when no todo with that ID is stored.
    async fn update(&self, todo: Todo) -> Result<(), RepositoryError>;

    /// Removes the todo with the given ID. Absent IDs are ignored.
    async fn delete(&self, id: TodoId) -> Result<(), RepositoryError>;

    /// Returns every stored todo in insertion order.
    async fn list(&self) -> Result<Vec<Todo>, RepositoryError>;

    /// Looks up a todo by ID. Absence is `None`, not an error.
    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, RepositoryError>;
}
