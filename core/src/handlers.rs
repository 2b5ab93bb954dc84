//! The five CRUD handlers.
//!
//! Each handler turns one event shape into one repository call and one
//! response. A missing record is answered here with an explicit 404; any
//! other problem is returned as an `ApiError` for the dispatcher to coalesce.

use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;
use crate::http::{InvocationContext, InvocationEvent, ProxyResponse};
use crate::repository::TodoRepository;
use crate::types::Todo;

/// Common signature of every handler.
pub type Handler =
    fn(&InvocationEvent, &InvocationContext, &mut dyn TodoRepository) -> Result<ProxyResponse, ApiError>;

pub fn list(
    _event: &InvocationEvent,
    _ctx: &InvocationContext,
    repo: &mut dyn TodoRepository,
) -> Result<ProxyResponse, ApiError> {
    let todos = repo.list();
    debug!(count = todos.len(), "listing todos");
    ProxyResponse::ok_data(&todos)
}

pub fn detail(
    event: &InvocationEvent,
    _ctx: &InvocationContext,
    repo: &mut dyn TodoRepository,
) -> Result<ProxyResponse, ApiError> {
    let id = event.path_parameter("id")?;
    match repo.get(id) {
        Some(todo) => ProxyResponse::ok_data(&todo),
        None => Ok(record_not_found(id)),
    }
}

/// Store the body as a new record. A body without `id` gets a fresh UUID.
pub fn create(
    event: &InvocationEvent,
    _ctx: &InvocationContext,
    repo: &mut dyn TodoRepository,
) -> Result<ProxyResponse, ApiError> {
    let mut payload = body_object(event)?;
    if !payload.contains_key("id") {
        payload.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
    }
    let todo = Todo::from_value(Value::Object(payload))?;
    let created = repo.create(todo)?;
    debug!(id = %created.id, "created todo");
    ProxyResponse::created(&created)
}

pub fn update(
    event: &InvocationEvent,
    _ctx: &InvocationContext,
    repo: &mut dyn TodoRepository,
) -> Result<ProxyResponse, ApiError> {
    let id = event.path_parameter("id")?;
    let fields = body_object(event)?;
    match repo.update(id, fields) {
        Some(todo) => ProxyResponse::ok_data(&todo),
        None => Ok(record_not_found(id)),
    }
}

pub fn delete(
    event: &InvocationEvent,
    _ctx: &InvocationContext,
    repo: &mut dyn TodoRepository,
) -> Result<ProxyResponse, ApiError> {
    let id = event.path_parameter("id")?;
    if repo.delete(id) {
        Ok(ProxyResponse::no_content())
    } else {
        Ok(record_not_found(id))
    }
}

fn record_not_found(id: &str) -> ProxyResponse {
    debug!(error = %ApiError::RecordNotFound(id.to_string()), "answering 404");
    ProxyResponse::not_found()
}

fn body_object(event: &InvocationEvent) -> Result<Map<String, Value>, ApiError> {
    match event.json_body()? {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::MalformedBody("expected a JSON object".to_string())),
    }
}
