//! Core domain model, storage port and service for the todo list.
pub mod repository;
pub mod service;
pub mod todo;

pub use repository::{RepositoryError, TodoRepository, memory::InMemoryTodoRepository};
pub use service::{CreateTodo, TodoService, TodoServiceError};
pub use todo::{Todo, TodoError, TodoId, TodoProps, TodoStatus};
