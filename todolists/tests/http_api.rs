//! `HttpRemoteApi` against a mock HTTP server.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use todolists::api::RemoteApi;
use todolists::config::HttpApiConfig;
use todolists::error::ApiError;
use todolists::http::HttpRemoteApi;
use todolists::types::{TaskId, TaskPriority, TaskStatus, TodolistId, UpdateTaskModel};

// ============================================================================
// Fixtures
// ============================================================================

fn api(server: &MockServer) -> HttpRemoteApi {
    HttpRemoteApi::new(HttpApiConfig::new(server.uri()))
}

fn task_json(title: &str, status: u8) -> serde_json::Value {
    json!({
        "id": "t1",
        "todoListId": "l1",
        "title": title,
        "description": null,
        "status": status,
        "priority": 1,
        "startDate": null,
        "deadline": null,
        "order": 0,
        "addedDate": "2025-01-01T10:00:00.000"
    })
}

fn envelope(data: serde_json::Value) -> serde_json::Value {
    json!({ "resultCode": 0, "messages": [], "data": data })
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn lists_todolists_with_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/todo-lists"))
        .and(header("API-KEY", "secret"))
        .and(header("Authorization", "Bearer token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "l1", "title": "Work", "addedDate": "2025-01-01", "order": 0 },
            { "id": "l2", "title": "Home", "addedDate": "2025-01-02", "order": -1 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpRemoteApi::new(
        HttpApiConfig::new(server.uri())
            .with_api_key("secret")
            .with_token("token-1"),
    );
    let lists = api.get_todolists().await.unwrap();

    let titles: Vec<_> = lists.iter().map(|l| l.title.as_str()).collect();
    assert_eq!(titles, vec!["Work", "Home"]);
}

#[tokio::test]
async fn create_todolist_unwraps_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/todo-lists"))
        .and(body_json(json!({ "title": "Work" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "item": { "id": "l9", "title": "Work", "addedDate": "2025-01-01", "order": 0 }
        }))))
        .mount(&server)
        .await;

    let list = api(&server).create_todolist("Work".to_string()).await.unwrap();

    assert_eq!(list.id, TodolistId::new("l9"));
}

#[tokio::test]
async fn non_zero_result_code_is_a_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/todo-lists/l1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resultCode": 1,
            "messages": ["Title is too long"],
            "data": {}
        })))
        .mount(&server)
        .await;

    let error = api(&server)
        .rename_todolist(TodolistId::new("l1"), "x".repeat(200))
        .await
        .unwrap_err();

    assert_eq!(
        error,
        ApiError::Rejected {
            messages: vec!["Title is too long".to_string()]
        }
    );
}

#[tokio::test]
async fn error_status_carries_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/todo-lists/l1"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such list"))
        .mount(&server)
        .await;

    let error = api(&server)
        .delete_todolist(TodolistId::new("l1"))
        .await
        .unwrap_err();

    assert_eq!(
        error,
        ApiError::Status {
            status: 404,
            message: "no such list".to_string()
        }
    );
}

#[tokio::test]
async fn undecodable_body_is_a_parse_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/todo-lists"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let error = api(&server).get_todolists().await.unwrap_err();

    assert!(matches!(error, ApiError::ResponseParseFailed(_)));
}

#[tokio::test]
async fn get_tasks_keeps_error_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/todo-lists/l1/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "list is archived",
            "totalCount": 0,
            "items": []
        })))
        .mount(&server)
        .await;

    let response = api(&server).get_tasks(TodolistId::new("l1")).await.unwrap();

    assert_eq!(response.error.as_deref(), Some("list is archived"));
    assert!(response.into_items().is_err());
}

#[tokio::test]
async fn update_task_sends_complete_model() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/todo-lists/l1/tasks/t1"))
        .and(body_json(json!({
            "title": "X",
            "description": null,
            "status": 2,
            "priority": 1,
            "startDate": null,
            "deadline": null
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "item": task_json("x", 2)
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let model = UpdateTaskModel {
        title: "X".to_string(),
        description: None,
        status: TaskStatus::Completed,
        priority: TaskPriority::Middle,
        start_date: None,
        deadline: None,
    };
    let task = api(&server)
        .update_task(TodolistId::new("l1"), TaskId::new("t1"), model)
        .await
        .unwrap();

    assert_eq!(task.title, "x");
    assert_eq!(task.status, TaskStatus::Completed);
}

#[tokio::test]
async fn create_and_delete_task_routes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/todo-lists/l1/tasks"))
        .and(body_json(json!({ "title": "Buy milk" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "item": task_json("Buy milk", 0)
        }))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/todo-lists/l1/tasks/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({}))))
        .expect(1)
        .mount(&server)
        .await;

    let api = api(&server);
    let task = api
        .create_task(TodolistId::new("l1"), "Buy milk".to_string())
        .await
        .unwrap();
    api.delete_task(task.todo_list_id, task.id).await.unwrap();
}

#[tokio::test]
async fn unreachable_server_is_a_request_failure() {
    let api = HttpRemoteApi::new(HttpApiConfig::new("http://127.0.0.1:9"));

    let error = api.get_todolists().await.unwrap_err();

    assert!(matches!(error, ApiError::RequestFailed(_)));
}
