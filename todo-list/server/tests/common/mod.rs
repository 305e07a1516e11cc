use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use std::sync::Arc;
use todo_list_core::{InMemoryTodoRepository, TodoService};
use todo_list_server::web::create_app;
use tower::ServiceExt;

/// Response parts needed by the endpoint tests.
#[allow(dead_code)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    #[allow(dead_code)]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }
}

/// Builds the full application on top of a freshly seeded in-memory store.
#[allow(dead_code)]
pub fn seeded_app() -> Router {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let service = TodoService::new(Arc::new(InMemoryTodoRepository::seeded().unwrap()));
    create_app(service)
}

/// Builds the application on top of an empty store.
#[allow(dead_code)]
pub fn empty_app() -> Router {
    let service = TodoService::new(Arc::new(InMemoryTodoRepository::new()));
    create_app(service)
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = String::from_utf8(body.to_vec()).unwrap();

    TestResponse {
        status,
        headers,
        body,
    }
}

#[allow(dead_code)]
pub async fn get(app: &Router, uri: &str) -> TestResponse {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

#[allow(dead_code)]
pub async fn post_form(app: &Router, uri: &str, form: &str) -> TestResponse {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    send(app, request).await
}

#[allow(dead_code)]
pub async fn send_json(app: &Router, method: Method, uri: &str, json: Option<&str>) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match json {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send(app, request).await
}
