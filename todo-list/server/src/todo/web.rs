use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use std::sync::Arc;
use todo_list_core::{CreateTodo, Todo, TodoError, TodoId, TodoServiceError, TodoStatus};

use crate::todo::TodoState;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Deserialize)]
pub struct TodoForm {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

/// Form sent by the Start, Complete and Delete buttons.
#[derive(Debug, Deserialize)]
pub struct ActionForm {
    /// Local path to return to once the action succeeded.
    #[serde(default)]
    redirect_to: Option<String>,
}

/// Custom error type for todo page handlers.
#[derive(Debug, thiserror::Error)]
enum TodoPageError {
    /// Represents an error during template rendering.
    #[error("Template rendering failed")]
    Template(#[from] askama::Error),
    /// Represents a todo service error.
    #[error("Todo service error: {0}")]
    Service(#[from] TodoServiceError),
}

impl IntoResponse for TodoPageError {
    fn into_response(self) -> Response {
        let (status_code, heading, message) = match &self {
            TodoPageError::Service(TodoServiceError::NotFound(_)) => (
                StatusCode::NOT_FOUND,
                "Todo not found",
                "The todo you're looking for doesn't exist".to_string(),
            ),
            TodoPageError::Service(TodoServiceError::Todo(
                error @ TodoError::InvalidStatusTransition { .. },
            )) => (
                StatusCode::CONFLICT,
                "Action not allowed",
                error.to_string(),
            ),
            TodoPageError::Service(TodoServiceError::Todo(error @ TodoError::InvalidEntity(_))) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Invalid todo",
                error.to_string(),
            ),
            _ => {
                tracing::error!("{}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong",
                    "An unexpected error occurred while processing your request. Please try again later."
                        .to_string(),
                )
            }
        };

        let error_template = ErrorPageTemplate::new(heading, message);
        let Ok(rendered) = error_template.render() else {
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        };
        (status_code, Html(rendered)).into_response()
    }
}

/// Display data for one todo, shared by the list and detail pages.
#[derive(Debug, Clone)]
struct TodoView {
    id: TodoId,
    title: String,
    description: String,
    status_label: &'static str,
    status_class: &'static str,
    can_start: bool,
    can_complete: bool,
    created_at: String,
    updated_at: String,
}

impl From<&Todo> for TodoView {
    fn from(todo: &Todo) -> Self {
        let status_class = match todo.status() {
            TodoStatus::Pending => "pending",
            TodoStatus::InProgress => "in-progress",
            TodoStatus::Completed => "completed",
        };
        Self {
            id: todo.id(),
            title: todo.title().to_string(),
            description: todo.description().to_string(),
            status_label: todo.status().label(),
            status_class,
            can_start: todo.status() == TodoStatus::Pending,
            can_complete: todo.status() == TodoStatus::InProgress,
            created_at: todo.created_at().format(DATE_FORMAT).to_string(),
            updated_at: todo.updated_at().format(DATE_FORMAT).to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "todos.html")]
struct TodosTemplate {
    todos: Vec<TodoView>,
}

impl TodosTemplate {
    pub fn new(todos: &[Todo]) -> Self {
        Self {
            todos: todos.iter().map(TodoView::from).collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "todos/create.html")]
struct CreateTodoTemplate {
    error: Option<String>,
    title: String,
    description: String,
}

impl CreateTodoTemplate {
    pub fn new(error: Option<String>, title: String, description: String) -> Self {
        Self {
            error,
            title,
            description,
        }
    }
}

#[derive(Template)]
#[template(path = "todos/detail.html")]
struct TodoDetailTemplate {
    todo: TodoView,
}

impl TodoDetailTemplate {
    pub fn new(todo: &Todo) -> Self {
        Self {
            todo: TodoView::from(todo),
        }
    }
}

#[derive(Template)]
#[template(path = "todos/edit.html")]
struct EditTodoTemplate {
    id: TodoId,
    error: Option<String>,
    title: String,
    description: String,
}

#[derive(Template)]
#[template(path = "todos/error.html")]
struct ErrorPageTemplate {
    heading: &'static str,
    message: String,
}

impl ErrorPageTemplate {
    pub fn new(heading: &'static str, message: String) -> Self {
        Self { heading, message }
    }
}

/// Trims both fields and returns the first validation message, if any.
fn validate_form(form: TodoForm) -> Result<(String, String), (String, String, String)> {
    let title = form.title.trim().to_string();
    let description = form.description.trim().to_string();

    if title.is_empty() {
        return Err(("Title is required.".to_string(), title, description));
    }
    if description.is_empty() {
        return Err(("Description is required.".to_string(), title, description));
    }
    Ok((title, description))
}

/// Only same-site paths are accepted as redirect targets. Browsers drop
/// tabs and newlines while parsing a URL, so any control or whitespace
/// character rejects the target.
fn safe_redirect_target(target: Option<&str>) -> &str {
    match target {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path
                    .chars()
                    .any(|c| c == '\\' || c.is_control() || c.is_whitespace()) =>
        {
            path
        }
        _ => "/",
    }
}

async fn find_todo(state: &TodoState, id: TodoId) -> Result<Todo, TodoPageError> {
    state
        .service
        .find_by_id(id)
        .await?
        .ok_or(TodoPageError::Service(TodoServiceError::NotFound(id)))
}

/// Handler for GET / that lists every todo.
#[tracing::instrument(skip(state))]
async fn todos_handler(State(state): State<Arc<TodoState>>) -> Result<Html<String>, TodoPageError> {
    let todos = state.service.list().await?;
    let template = TodosTemplate::new(&todos);
    template.render().map(Html).map_err(TodoPageError::from)
}

/// Handler for GET /todos/create that serves an empty create form.
#[tracing::instrument]
async fn create_form_handler() -> Result<Html<String>, TodoPageError> {
    let template = CreateTodoTemplate::new(None, String::new(), String::new());
    template.render().map(Html).map_err(TodoPageError::from)
}

/// Handler for POST /todos. Redirects to the list on success and
/// re-renders the form with a message when a field is blank.
#[tracing::instrument(skip(state))]
async fn create_todo_handler(
    State(state): State<Arc<TodoState>>,
    Form(form): Form<TodoForm>,
) -> Result<Response, TodoPageError> {
    let (title, description) = match validate_form(form) {
        Ok(fields) => fields,
        Err((message, title, description)) => {
            let template = CreateTodoTemplate::new(Some(message), title, description);
            let html = template.render()?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response());
        }
    };

    match state
        .service
        .create(CreateTodo {
            title: title.clone(),
            description: description.clone(),
        })
        .await
    {
        Ok(_) => Ok(Redirect::to("/").into_response()),
        Err(err) => {
            tracing::warn!("Failed to create todo: {}", err);
            let template = CreateTodoTemplate::new(
                Some("An error occurred while creating the todo.".to_string()),
                title,
                description,
            );
            let html = template.render()?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response())
        }
    }
}

/// Handler for GET /todos/{id} that shows a single todo.
#[tracing::instrument(skip(state))]
async fn todo_detail_handler(
    State(state): State<Arc<TodoState>>,
    Path(id): Path<TodoId>,
) -> Result<Html<String>, TodoPageError> {
    let todo = find_todo(&state, id).await?;
    let template = TodoDetailTemplate::new(&todo);
    template.render().map(Html).map_err(TodoPageError::from)
}

/// Handler for GET /todos/{id}/edit that serves the edit form.
#[tracing::instrument(skip(state))]
async fn edit_form_handler(
    State(state): State<Arc<TodoState>>,
    Path(id): Path<TodoId>,
) -> Result<Html<String>, TodoPageError> {
    let todo = find_todo(&state, id).await?;
    let template = EditTodoTemplate {
        id,
        error: None,
        title: todo.title().to_string(),
        description: todo.description().to_string(),
    };
    template.render().map(Html).map_err(TodoPageError::from)
}

/// Handler for POST /todos/{id} that saves the edit form.
#[tracing::instrument(skip(state))]
async fn update_todo_handler(
    State(state): State<Arc<TodoState>>,
    Path(id): Path<TodoId>,
    Form(form): Form<TodoForm>,
) -> Result<Response, TodoPageError> {
    let (title, description) = match validate_form(form) {
        Ok(fields) => fields,
        Err((message, title, description)) => {
            let template = EditTodoTemplate {
                id,
                error: Some(message),
                title,
                description,
            };
            let html = template.render()?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response());
        }
    };

    state
        .service
        .update_details(id, title, description)
        .await?;
    Ok(Redirect::to(&format!("/todos/{id}")).into_response())
}

/// Handler for POST /todos/{id}/start.
#[tracing::instrument(skip(state))]
async fn start_todo_handler(
    State(state): State<Arc<TodoState>>,
    Path(id): Path<TodoId>,
    Form(form): Form<ActionForm>,
) -> Result<Redirect, TodoPageError> {
    let target = safe_redirect_target(form.redirect_to.as_deref());
    state.service.start(id).await?;
    Ok(Redirect::to(target))
}

/// Handler for POST /todos/{id}/complete.
#[tracing::instrument(skip(state))]
async fn complete_todo_handler(
    State(state): State<Arc<TodoState>>,
    Path(id): Path<TodoId>,
    Form(form): Form<ActionForm>,
) -> Result<Redirect, TodoPageError> {
    let target = safe_redirect_target(form.redirect_to.as_deref());
    state.service.complete(id).await?;
    Ok(Redirect::to(target))
}

/// Handler for POST /todos/{id}/delete.
#[tracing::instrument(skip(state))]
async fn delete_todo_handler(
    State(state): State<Arc<TodoState>>,
    Path(id): Path<TodoId>,
    Form(form): Form<ActionForm>,
) -> Result<Redirect, TodoPageError> {
    let target = safe_redirect_target(form.redirect_to.as_deref());
    state.service.delete(id).await?;
    Ok(Redirect::to(target))
}

/// Creates and returns the todo router with all page routes.
pub fn create_todo_router(state: Arc<TodoState>) -> Router {
    Router::new()
        .route("/", get(todos_handler))
        .route("/todos", post(create_todo_handler))
        .route("/todos/create", get(create_form_handler))
        .route(
            "/todos/{id}",
            get(todo_detail_handler).post(update_todo_handler),
        )
        .route("/todos/{id}/edit", get(edit_form_handler))
        .route("/todos/{id}/start", post(start_todo_handler))
        .route("/todos/{id}/complete", post(complete_todo_handler))
        .route("/todos/{id}/delete", post(delete_todo_handler))
        .with_state(state)
}
