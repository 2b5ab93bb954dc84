use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use todo_core::{Dispatcher, Todo};
use todo_gateway::{app, app_with};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

fn milk_only() -> axum::Router {
    app_with(Dispatcher::new(vec![
        Todo::from_value(json!({"id": "1", "title": "buy milk"})).unwrap(),
    ]))
}

// --- list ---

#[tokio::test]
async fn list_todos_returns_seed() {
    let resp = milk_only().oneshot(empty_request("GET", "/todos")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[http::header::CONTENT_TYPE],
        "application/json"
    );
    let body = body_json(resp).await;
    assert_eq!(body, json!({"data": [{"id": "1", "title": "buy milk"}]}));
}

#[tokio::test]
async fn default_app_serves_builtin_seed() {
    let resp = app().oneshot(empty_request("GET", "/todos")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert!(!body["data"].as_array().unwrap().is_empty());
}

// --- get ---

#[tokio::test]
async fn get_todo_found() {
    let resp = milk_only().oneshot(empty_request("GET", "/todos/1")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body, json!({"data": {"id": "1", "title": "buy milk"}}));
}

#[tokio::test]
async fn get_todo_not_found() {
    let resp = milk_only().oneshot(empty_request("GET", "/todos/999")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body, json!({"message": "not found"}));
}

// --- create ---

#[tokio::test]
async fn create_todo_returns_201() {
    let resp = milk_only()
        .oneshot(json_request("POST", "/todos", r#"{"title":"Buy bread"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["title"], "Buy bread");
    assert!(body["data"]["id"].is_string());
}

#[tokio::test]
async fn create_todo_malformed_json_returns_echo_404() {
    let resp = milk_only()
        .oneshot(json_request("POST", "/todos", "{not json"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "not found");
    assert_eq!(body["path"], "/todos");
    assert_eq!(body["httpMethod"], "POST");
    assert_eq!(body["requestContext"]["stage"], "local");
    assert!(body["requestContext"]["requestId"].is_string());
}

// --- update ---

#[tokio::test]
async fn update_todo_merges_fields() {
    let resp = milk_only()
        .oneshot(json_request("PUT", "/todos/1", r#"{"completed":true}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(
        body,
        json!({"data": {"id": "1", "title": "buy milk", "completed": true}})
    );
}

#[tokio::test]
async fn update_todo_not_found() {
    let resp = milk_only()
        .oneshot(json_request("PUT", "/todos/999", r#"{"title":"Nope"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body, json!({"message": "not found"}));
}

// --- delete ---

#[tokio::test]
async fn delete_todo_returns_204() {
    let resp = milk_only().oneshot(empty_request("DELETE", "/todos/1")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let body = body_bytes(resp).await;
    assert!(body.is_empty());
}

#[tokio::test]
async fn delete_todo_not_found() {
    let resp = milk_only().oneshot(empty_request("DELETE", "/todos/999")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- undecodable input ---

#[tokio::test]
async fn invalid_utf8_body_reaches_dispatcher() {
    let req = Request::builder()
        .method("POST")
        .uri("/todos")
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(vec![0xff_u8, 0xfe]))
        .unwrap();
    let resp = milk_only().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "not found");
    assert_eq!(body["path"], "/todos");
    assert_eq!(body["httpMethod"], "POST");
}

#[tokio::test]
async fn undecodable_id_reaches_dispatcher() {
    let resp = milk_only().oneshot(empty_request("GET", "/todos/%FF")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body, json!({"message": "not found"}));
}

// --- routing misses ---

#[tokio::test]
async fn unsupported_method_echoes_template() {
    let resp = milk_only().oneshot(empty_request("PATCH", "/todos/1")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["path"], "/todos/{id}");
    assert_eq!(body["httpMethod"], "PATCH");
    assert_eq!(body["requestContext"]["path"], "/todos/1");
}

#[tokio::test]
async fn unknown_path_echoes_raw_path() {
    let resp = milk_only().oneshot(empty_request("GET", "/users/7")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "not found");
    assert_eq!(body["path"], "/users/7");
    assert_eq!(body["httpMethod"], "GET");
}

// --- per-request repository ---

#[tokio::test]
async fn writes_are_not_visible_to_later_requests() {
    use tower::Service;

    let mut app = milk_only().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/todos", r#"{"id":"2","title":"Walk dog"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    // get: the new record is gone
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/todos/2"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // delete the seeded record
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", "/todos/1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // list: seed is intact
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/todos"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}
