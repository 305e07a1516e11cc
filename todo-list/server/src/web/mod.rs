use askama::Template;
use axum::Router;
use axum::http::StatusCode;
use axum::response::Html;
use std::sync::Arc;
use todo_list_core::{InMemoryTodoRepository, TodoRepository, TodoService};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::todo::{TodoState, create_todo_router};

pub mod api;

/// Custom error type for web handler operations.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// Represents an error during template rendering.
    /// The specific `askama::Error` is captured as the source of this error.
    #[error("Template rendering failed")]
    Template(#[from] askama::Error),
}

impl axum::response::IntoResponse for WebError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!("{}", self);
        let user_facing_error_message =
            "An unexpected error occurred while processing your request. Please try again later.";
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(format!(
                "<h1>Internal Server Error</h1><p>{}</p>",
                user_facing_error_message
            )),
        )
            .into_response()
    }
}

/// Builds the repository selected by the config and starts serving.
#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let server_address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let repository: Arc<dyn TodoRepository> = if config.seed_demo_data {
        Arc::new(InMemoryTodoRepository::seeded()?)
    } else {
        Arc::new(InMemoryTodoRepository::new())
    };
    let service = TodoService::new(repository);

    axum::serve(listener, create_app(service)).await?;
    Ok(())
}

/// Creates the application router: HTML pages, the JSON API and health check.
pub fn create_app(service: TodoService) -> Router {
    let todo_state = Arc::new(TodoState { service });

    Router::new()
        .route("/health", axum::routing::get(health_check_handler))
        .merge(create_todo_router(todo_state.clone()))
        .merge(api::create_api_router(todo_state))
        .fallback(not_found_handler)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}

#[tracing::instrument]
pub async fn not_found_handler() -> Result<(StatusCode, Html<String>), WebError> {
    let template = PageNotFoundTemplate;
    let html = template.render()?;
    Ok((StatusCode::NOT_FOUND, Html(html)))
}

#[derive(Template)]
#[template(path = "not_found.html")]
struct PageNotFoundTemplate;
