use axum::http::StatusCode;

mod common;

#[tokio::test]
async fn can_render_todos_page_with_seeded_todos() {
    let app = common::seeded_app();

    let response = common::get(&app, "/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Manage your tasks and stay productive"));
    assert!(response.body.contains("Learn Rust"));
    assert!(response.body.contains("Build a todo app"));
    assert!(response.body.contains("Set up the workspace"));
    assert!(response.body.contains("In Progress"));
    assert!(response.body.contains(r#"action="/todos/1/start""#));
    assert!(response.body.contains(r#"action="/todos/2/complete""#));
    assert!(!response.body.contains(r#"action="/todos/3/start""#));
    assert!(!response.body.contains(r#"action="/todos/3/complete""#));
}

#[tokio::test]
async fn can_render_empty_state() {
    let app = common::empty_app();

    let response = common::get(&app, "/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("No todos yet"));
    assert!(response.body.contains("Create your first todo to get started"));
}

#[tokio::test]
async fn can_render_create_form() {
    let app = common::seeded_app();

    let response = common::get(&app, "/todos/create").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Create Todo"));
    assert!(response.body.contains("What needs to be done?"));
}

#[tokio::test]
async fn can_create_todo_and_redirect_to_list() {
    let app = common::seeded_app();

    let response = common::post_form(
        &app,
        "/todos",
        "title=New+Todo&description=New+description",
    )
    .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));

    let list = common::get(&app, "/").await;
    assert!(list.body.contains("New Todo"));
    assert_eq!(list.body.matches("class=\"card todo-item\"").count(), 4);
}

#[tokio::test]
async fn create_trims_title_and_description() {
    let app = common::seeded_app();

    common::post_form(&app, "/todos", "title=++Padded++&description=++Body++").await;

    let list = common::get(&app, "/").await;
    assert!(list.body.contains("<strong>Padded</strong>"));
}

#[tokio::test]
async fn create_with_blank_title_shows_error() {
    let app = common::seeded_app();

    let response = common::post_form(&app, "/todos", "title=+++&description=Something").await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Title is required."));
    assert!(response.body.contains("Something"));

    let list = common::get(&app, "/").await;
    assert_eq!(list.body.matches("class=\"card todo-item\"").count(), 3);
}

#[tokio::test]
async fn create_with_missing_description_shows_error() {
    let app = common::seeded_app();

    let response = common::post_form(&app, "/todos", "title=Only+a+title").await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Description is required."));
}

#[tokio::test]
async fn create_form_escapes_user_input() {
    let app = common::seeded_app();

    let response = common::post_form(&app, "/todos", "title=%3Cscript%3E&description=").await;

    assert!(!response.body.contains("<script>"));
    assert!(response.body.contains("&#60;script&#62;") || response.body.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn can_render_todo_detail() {
    let app = common::seeded_app();

    let response = common::get(&app, "/todos/2").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Todo Detail"));
    assert!(response.body.contains("Build a todo app"));
    assert!(response.body.contains("Created "));
    assert!(response.body.contains("Updated "));
    assert!(response.body.contains(r#"action="/todos/2/complete""#));
    assert!(!response.body.contains(r#"action="/todos/2/start""#));
}

#[tokio::test]
async fn unknown_todo_renders_not_found() {
    let app = common::seeded_app();

    let response = common::get(&app, "/todos/999").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body.contains("Todo not found"));
    assert!(response.body.contains("The todo you&#39;re looking for doesn&#39;t exist")
        || response.body.contains("The todo you&#x27;re looking for doesn&#x27;t exist"));
}

#[tokio::test]
async fn can_start_todo_from_list() {
    let app = common::seeded_app();

    let response = common::post_form(&app, "/todos/1/start", "redirect_to=%2F").await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));

    let detail = common::get(&app, "/todos/1").await;
    assert!(detail.body.contains("In Progress"));
    assert!(detail.body.contains(r#"action="/todos/1/complete""#));
}

#[tokio::test]
async fn can_complete_todo_and_return_to_detail() {
    let app = common::seeded_app();

    let response =
        common::post_form(&app, "/todos/2/complete", "redirect_to=%2Ftodos%2F2").await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/todos/2"));

    let detail = common::get(&app, "/todos/2").await;
    assert!(detail.body.contains("Completed"));
}

#[tokio::test]
async fn action_redirect_ignores_external_targets() {
    let app = common::seeded_app();

    let response = common::post_form(
        &app,
        "/todos/1/start",
        "redirect_to=https%3A%2F%2Fexample.com",
    )
    .await;

    assert_eq!(response.location(), Some("/"));
}

#[tokio::test]
async fn action_redirect_ignores_targets_with_tabs() {
    let app = common::seeded_app();

    let response =
        common::post_form(&app, "/todos/1/start", "redirect_to=%2F%09%2Fexample.com").await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));
}

#[tokio::test]
async fn action_with_newline_in_target_still_redirects_home() {
    let app = common::seeded_app();

    let response = common::post_form(&app, "/todos/1/start", "redirect_to=%2Fa%0Ab").await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));

    let detail = common::get(&app, "/todos/1").await;
    assert!(detail.body.contains("In Progress"));
}

#[tokio::test]
async fn completing_pending_todo_is_a_conflict() {
    let app = common::seeded_app();

    let response = common::post_form(&app, "/todos/1/complete", "").await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert!(response.body.contains("Action not allowed"));

    let detail = common::get(&app, "/todos/1").await;
    assert!(detail.body.contains("Pending"));
}

#[tokio::test]
async fn starting_unknown_todo_is_not_found() {
    let app = common::seeded_app();

    let response = common::post_form(&app, "/todos/999/start", "").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn can_delete_todo() {
    let app = common::seeded_app();

    let response = common::post_form(&app, "/todos/1/delete", "redirect_to=%2F").await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    let detail = common::get(&app, "/todos/1").await;
    assert_eq!(detail.status, StatusCode::NOT_FOUND);
    let list = common::get(&app, "/").await;
    assert_eq!(list.body.matches("class=\"card todo-item\"").count(), 2);
}

#[tokio::test]
async fn deleting_unknown_todo_is_not_found() {
    let app = common::seeded_app();

    let response = common::post_form(&app, "/todos/999/delete", "").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn can_edit_todo() {
    let app = common::seeded_app();

    let form = common::get(&app, "/todos/1/edit").await;
    assert_eq!(form.status, StatusCode::OK);
    assert!(form.body.contains(r#"value="Learn Rust""#));

    let response = common::post_form(
        &app,
        "/todos/1",
        "title=Learn+async+Rust&description=Tokio+and+axum",
    )
    .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/todos/1"));
    let detail = common::get(&app, "/todos/1").await;
    assert!(detail.body.contains("Learn async Rust"));
    assert!(detail.body.contains("Tokio and axum"));
}

#[tokio::test]
async fn edit_with_blank_description_keeps_todo_unchanged() {
    let app = common::seeded_app();

    let response = common::post_form(&app, "/todos/1", "title=Changed&description=+").await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Description is required."));
    let detail = common::get(&app, "/todos/1").await;
    assert!(detail.body.contains("Learn Rust"));
}

#[tokio::test]
async fn editing_unknown_todo_is_not_found() {
    let app = common::seeded_app();

    let response = common::get(&app, "/todos/999/edit").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
