//! The invocation envelope exchanged with the hosting trigger.
//!
//! # Design
//! The host hands the router an `InvocationEvent` plus an opaque
//! `InvocationContext` and expects a `ProxyResponse` back. These are plain
//! data with the host's camelCase field names on the wire. The router never
//! performs I/O; the host owns the transport.
//!
//! `RequestContext` keeps every routing field it does not understand in
//! `extra` so the dispatcher can echo the full context back on a miss.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::ApiError;

/// HTTP method of an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Parse an uppercase method name. Anything outside the route table's
    /// methods yields `None`.
    pub fn parse(method: &str) -> Option<Self> {
        match method {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "DELETE" => Some(HttpMethod::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Routing metadata of an invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    pub http_method: String,
    /// Path template, e.g. `/todos/{id}`.
    pub resource_path: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An incoming request as delivered by the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvocationEvent {
    pub request_context: RequestContext,
    #[serde(default)]
    pub path_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
}

impl InvocationEvent {
    pub fn new(method: &str, resource_path: &str) -> Self {
        Self {
            request_context: RequestContext {
                http_method: method.to_string(),
                resource_path: resource_path.to_string(),
                extra: Map::new(),
            },
            path_parameters: None,
            body: None,
        }
    }

    pub fn with_path_parameter(mut self, name: &str, value: &str) -> Self {
        self.path_parameters
            .get_or_insert_with(HashMap::new)
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn path_parameter(&self, name: &'static str) -> Result<&str, ApiError> {
        self.path_parameters
            .as_ref()
            .and_then(|params| params.get(name))
            .map(String::as_str)
            .ok_or(ApiError::MissingPathParameter(name))
    }

    /// Parse the body as JSON. An absent or blank body is an error.
    pub fn json_body(&self) -> Result<Value, ApiError> {
        let body = self
            .body
            .as_deref()
            .filter(|body| !body.trim().is_empty())
            .ok_or(ApiError::MissingBody)?;
        serde_json::from_str(body).map_err(|e| ApiError::MalformedBody(e.to_string()))
    }
}

/// Execution context supplied by the host alongside the event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationContext {
    pub request_id: String,
    pub function_name: String,
}

/// The response handed back to the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,
    pub body: String,
}

impl ProxyResponse {
    pub fn json(status_code: u16, body: &Value) -> Result<Self, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(Self { status_code, body })
    }

    /// 200 with `{"data": ...}`.
    pub fn ok_data<T: Serialize>(data: &T) -> Result<Self, ApiError> {
        Self::data(200, data)
    }

    /// 201 with `{"data": ...}`.
    pub fn created<T: Serialize>(data: &T) -> Result<Self, ApiError> {
        Self::data(201, data)
    }

    pub fn no_content() -> Self {
        Self {
            status_code: 204,
            body: String::new(),
        }
    }

    /// 404 with `{"message":"not found"}`.
    pub fn not_found() -> Self {
        Self {
            status_code: 404,
            body: r#"{"message":"not found"}"#.to_string(),
        }
    }

    fn data<T: Serialize>(status_code: u16, data: &T) -> Result<Self, ApiError> {
        let data = serde_json::to_value(data).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Self::json(status_code, &json!({ "data": data }))
    }
}
