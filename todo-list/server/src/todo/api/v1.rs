use crate::todo::TodoState;
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use todo_list_core::{CreateTodo, Todo, TodoError, TodoId, TodoServiceError, TodoStatus};

/// JSON representation of a Todo for API responses.
#[derive(Debug, Serialize)]
pub struct TodoJson {
    /// Unique identifier for the todo
    id: TodoId,
    title: String,
    description: String,
    /// One of PENDING, IN_PROGRESS, COMPLETED
    status: TodoStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<Todo> for TodoJson {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id(),
            title: todo.title().to_string(),
            description: todo.description().to_string(),
            status: todo.status(),
            created_at: todo.created_at(),
            updated_at: todo.updated_at(),
        }
    }
}

/// API response for listing all todos.
#[derive(Debug, Serialize)]
pub struct TodosResponse {
    todos: Vec<TodoJson>,
    /// Total number of todos
    count: usize,
}

/// JSON request payload for creating a todo.
#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
    pub description: String,
}

/// JSON response for API errors
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(err: TodoServiceError) -> ApiError {
    let (status, code) = match &err {
        TodoServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        TodoServiceError::Todo(TodoError::InvalidEntity(_)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_TODO")
        }
        TodoServiceError::Todo(TodoError::InvalidStatusTransition { .. }) => {
            (StatusCode::CONFLICT, "INVALID_STATUS_TRANSITION")
        }
        TodoServiceError::Storage(_) => {
            tracing::error!("Todo storage failed: {}", err);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "INTERNAL_ERROR".to_string(),
                    message: "Failed to access todos".to_string(),
                }),
            );
        }
    };

    (
        status,
        Json(ErrorResponse {
            error: code.to_string(),
            message: err.to_string(),
        }),
    )
}

/// Handler for GET /api/v1/todos - Returns all todos in insertion order.
#[tracing::instrument(skip(state))]
pub async fn list_todos_handler(
    State(state): State<Arc<TodoState>>,
) -> Result<Json<TodosResponse>, ApiError> {
    let todos = state.service.list().await.map_err(error_response)?;
    let todos: Vec<TodoJson> = todos.into_iter().map(TodoJson::from).collect();
    let count = todos.len();

    Ok(Json(TodosResponse { todos, count }))
}

/// Handler for POST /api/v1/todos - Creates a pending todo.
#[tracing::instrument(skip(state))]
pub async fn create_todo_handler(
    State(state): State<Arc<TodoState>>,
    Json(payload): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<TodoJson>), ApiError> {
    let todo = state
        .service
        .create(CreateTodo {
            title: payload.title,
            description: payload.description,
        })
        .await
        .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(TodoJson::from(todo))))
}

/// Handler for GET /api/v1/todos/{id}.
#[tracing::instrument(skip(state))]
pub async fn get_todo_handler(
    State(state): State<Arc<TodoState>>,
    Path(id): Path<TodoId>,
) -> Result<Json<TodoJson>, ApiError> {
    state
        .service
        .find_by_id(id)
        .await
        .map_err(error_response)?
        .map(|todo| Json(TodoJson::from(todo)))
        .ok_or_else(|| error_response(TodoServiceError::NotFound(id)))
}

/// Handler for DELETE /api/v1/todos/{id}.
#[tracing::instrument(skip(state))]
pub async fn delete_todo_handler(
    State(state): State<Arc<TodoState>>,
    Path(id): Path<TodoId>,
) -> Result<StatusCode, ApiError> {
    state.service.delete(id).await.map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST /api/v1/todos/{id}/start.
#[tracing::instrument(skip(state))]
pub async fn start_todo_handler(
    State(state): State<Arc<TodoState>>,
    Path(id): Path<TodoId>,
) -> Result<Json<TodoJson>, ApiError> {
    let todo = state.service.start(id).await.map_err(error_response)?;
    Ok(Json(TodoJson::from(todo)))
}

/// Handler for POST /api/v1/todos/{id}/complete.
#[tracing::instrument(skip(state))]
pub async fn complete_todo_handler(
    State(state): State<Arc<TodoState>>,
    Path(id): Path<TodoId>,
) -> Result<Json<TodoJson>, ApiError> {
    let todo = state.service.complete(id).await.map_err(error_response)?;
    Ok(Json(TodoJson::from(todo)))
}

/// Creates and returns the todos API router.
pub fn create_api_router(state: Arc<TodoState>) -> Router {
    Router::new()
        .route("/todos", get(list_todos_handler).post(create_todo_handler))
        .route(
            "/todos/{id}",
            get(get_todo_handler).delete(delete_todo_handler),
        )
        .route("/todos/{id}/start", post(start_todo_handler))
        .route("/todos/{id}/complete", post(complete_todo_handler))
        .with_state(state)
}
