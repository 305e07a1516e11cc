use super::{RepositoryError, TodoRepository};
use crate::todo::{Todo, TodoError, TodoId, TodoProps, TodoStatus};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Demo records loaded by [`InMemoryTodoRepository::seeded`], one per status.
const SEED_TODOS: [(TodoId, &str, &str, TodoStatus); 3] = [
    (
        1,
        "Learn Rust",
        "Work through the ownership and borrowing chapters",
        TodoStatus::Pending,
    ),
    (
        2,
        "Build a todo app",
        "Wire the service into an axum server",
        TodoStatus::InProgress,
    ),
    (
        3,
        "Set up the workspace",
        "Create the cargo workspace and the core crate",
        TodoStatus::Completed,
    ),
];

/// Process-local repository keeping todos in a `Vec`.
///
/// Every call takes the lock once, so individual operations are atomic.
/// Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    todos: RwLock<Vec<Todo>>,
    last_id: AtomicU64,
}

impl InMemoryTodoRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository holding the three demo todos (IDs 1 to 3).
    pub fn seeded() -> Result<Self, TodoError> {
        let now = Utc::now();
        let todos = SEED_TODOS
            .iter()
            .map(|(id, title, description, status)| {
                Todo::new(TodoProps {
                    id: *id,
                    title: title.to_string(),
                    description: description.to_string(),
                    status: *status,
                    created_at: now,
                    updated_at: now,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::with_todos(todos))
    }

    /// Creates a repository holding the given todos in order.
    /// New IDs are handed out after the highest one present.
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        let last_id = todos.iter().map(Todo::id).max().unwrap_or(0);
        Self {
            todos: RwLock::new(todos),
            last_id: AtomicU64::new(last_id),
        }
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn next_id(&self) -> Result<TodoId, RepositoryError> {
        Ok(self.last_id.fetch_add(1, Ordering::Relaxed) + 1)
    }

    #[tracing::instrument(skip(self, todo), fields(id = todo.id()))]
    async fn create(&self, todo: Todo) -> Result<(), RepositoryError> {
        let mut todos = self.todos.write().await;
        self.last_id.fetch_max(todo.id(), Ordering::Relaxed);
        todos.push(todo);
        Ok(())
    }

    #[tracing::instrument(skip(self, todo), fields(id = todo.id()))]
    async fn update(&self, todo: Todo) -> Result<(), RepositoryError> {
        let mut todos = self.todos.write().await;
        let stored = todos
            .iter_mut()
            .find(|stored| stored.id() == todo.id())
            .ok_or(RepositoryError::NotFound(todo.id()))?;
        *stored = todo;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: TodoId) -> Result<(), RepositoryError> {
        let mut todos = self.todos.write().await;
        if let Some(position) = todos.iter().position(|todo| todo.id() == id) {
            todos.remove(position);
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Todo>, RepositoryError> {
        Ok(self.todos.read().await.clone())
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, RepositoryError> {
        let todos = self.todos.read().await;
        Ok(todos.iter().find(|todo| todo.id() == id).cloned())
    }
}
