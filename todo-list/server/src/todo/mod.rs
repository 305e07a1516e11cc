use todo_list_core::TodoService;

pub mod api;
pub mod web;

pub use web::create_todo_router;

/// Shared state for the todo routes. The service is injected at startup.
#[derive(Clone)]
pub struct TodoState {
    pub service: TodoService,
}
