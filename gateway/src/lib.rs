//! Local HTTP front end for the todo router.
//!
//! # Design
//! Plays the part of the serverless trigger: every HTTP request is turned
//! into an `InvocationEvent` (resource path template, path parameters, raw
//! body), handed to the shared `Dispatcher`, and the `ProxyResponse` is
//! written back as-is. Routing decisions stay in `todo-core`; the axum routes
//! here only recover the path template, so every method is accepted and
//! unknown paths still reach the dispatcher through the fallback.

pub mod config;

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{rejection::PathRejection, Path, State},
    http::{header, Method, Response, StatusCode, Uri},
    routing::any,
    Router,
};
use serde_json::{json, Map, Value};
use todo_core::{Dispatcher, InvocationContext, InvocationEvent, ProxyResponse, RequestContext};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub use config::{ConfigError, GatewayConfig};

const FUNCTION_NAME: &str = "todo-service";
const STAGE: &str = "local";

type Shared = Arc<Dispatcher>;

/// The gateway serving the built-in seed data.
pub fn app() -> Router {
    app_with(Dispatcher::default())
}

pub fn app_with(dispatcher: Dispatcher) -> Router {
    Router::new()
        .route("/todos", any(collection))
        .route("/todos/{id}", any(item))
        .fallback(unmatched)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(dispatcher))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn collection(State(dispatcher): State<Shared>, method: Method, uri: Uri, body: Bytes) -> Response<Body> {
    let event = build_event(&method, "/todos", &uri, None, body_text(&body));
    invoke(&dispatcher, event)
}

async fn item(
    State(dispatcher): State<Shared>,
    method: Method,
    uri: Uri,
    id: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Response<Body> {
    // A segment that does not decode is passed through raw.
    let id = match id {
        Ok(Path(id)) => id,
        Err(_) => raw_segment(&uri),
    };
    let event = build_event(&method, "/todos/{id}", &uri, Some(id), body_text(&body));
    invoke(&dispatcher, event)
}

async fn unmatched(State(dispatcher): State<Shared>, method: Method, uri: Uri, body: Bytes) -> Response<Body> {
    let event = build_event(&method, uri.path(), &uri, None, body_text(&body));
    invoke(&dispatcher, event)
}

/// Invalid UTF-8 is replaced, so the handler sees a body it cannot parse.
fn body_text(body: &Bytes) -> String {
    String::from_utf8_lossy(body).into_owned()
}

fn raw_segment(uri: &Uri) -> String {
    uri.path().rsplit('/').next().unwrap_or_default().to_string()
}

fn build_event(method: &Method, resource_path: &str, uri: &Uri, id: Option<String>, body: String) -> InvocationEvent {
    let mut extra = Map::new();
    extra.insert("path".to_string(), json!(uri.path()));
    extra.insert("stage".to_string(), json!(STAGE));

    let mut event = InvocationEvent {
        request_context: RequestContext {
            http_method: method.as_str().to_string(),
            resource_path: resource_path.to_string(),
            extra,
        },
        path_parameters: None,
        body: (!body.is_empty()).then_some(body),
    };
    if let Some(id) = id {
        event = event.with_path_parameter("id", &id);
    }
    event
}

fn invoke(dispatcher: &Dispatcher, mut event: InvocationEvent) -> Response<Body> {
    let request_id = Uuid::new_v4().to_string();
    event
        .request_context
        .extra
        .insert("requestId".to_string(), Value::String(request_id.clone()));
    let ctx = InvocationContext {
        request_id,
        function_name: FUNCTION_NAME.to_string(),
    };
    into_http(dispatcher.dispatch(&event, &ctx))
}

/// Convert a proxy response into an HTTP response.
fn into_http(proxy: ProxyResponse) -> Response<Body> {
    let status = StatusCode::from_u16(proxy.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = Response::builder().status(status);
    if !proxy.body.is_empty() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    builder.body(Body::from(proxy.body)).unwrap_or_else(|_| {
        let mut fallback = Response::new(Body::empty());
        *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        fallback
    })
}
