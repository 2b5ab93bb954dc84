//! Route table and dispatcher.
//!
//! # Design
//! `ROUTES` is a static table of `(method, path template, Route)` entries
//! and `resolve` is a pure lookup over it; nothing is registered at runtime.
//! `Dispatcher` holds the seed and, per invocation, builds a fresh
//! `MemTodoRepository` from it, so it is `Send + Sync` and can be shared
//! read-only by concurrent invocations.
//!
//! Every failure after the event is read (route miss, handler error,
//! handler panic) becomes the same 404 echo response. Callers cannot tell a
//! bad route from a server bug by status code; only the log can.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, info_span, warn};

use crate::error::ApiError;
use crate::handlers::{self, Handler};
use crate::http::{HttpMethod, InvocationContext, InvocationEvent, ProxyResponse, RequestContext};
use crate::repository::{MemTodoRepository, TodoRepository};
use crate::seed::TODO_DATA;
use crate::types::Todo;

/// The handler a route table entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    List,
    Detail,
    Create,
    Update,
    Delete,
}

/// The fixed route table.
pub const ROUTES: &[(HttpMethod, &str, Route)] = &[
    (HttpMethod::Get, "/todos", Route::List),
    (HttpMethod::Get, "/todos/{id}", Route::Detail),
    (HttpMethod::Post, "/todos", Route::Create),
    (HttpMethod::Put, "/todos/{id}", Route::Update),
    (HttpMethod::Delete, "/todos/{id}", Route::Delete),
];

impl Route {
    /// Look up `(method, path template)` in `ROUTES`.
    pub fn resolve(method: &str, path: &str) -> Option<Route> {
        let method = HttpMethod::parse(method)?;
        ROUTES
            .iter()
            .find(|(m, p, _)| *m == method && *p == path)
            .map(|(_, _, route)| *route)
    }

    pub fn handler(self) -> Handler {
        match self {
            Route::List => handlers::list,
            Route::Detail => handlers::detail,
            Route::Create => handlers::create,
            Route::Update => handlers::update,
            Route::Delete => handlers::delete,
        }
    }

    pub fn handler_name(self) -> &'static str {
        match self {
            Route::List => "list",
            Route::Detail => "detail",
            Route::Create => "create",
            Route::Update => "update",
            Route::Delete => "delete",
        }
    }
}

/// Resolves invocations to handlers and runs them against a fresh repository.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    seed: Arc<[Todo]>,
}

impl Default for Dispatcher {
    /// A dispatcher seeded from `TODO_DATA`.
    fn default() -> Self {
        Self::new(TODO_DATA.to_vec())
    }
}

impl Dispatcher {
    pub fn new(seed: Vec<Todo>) -> Self {
        Self { seed: seed.into() }
    }

    pub fn seed(&self) -> &[Todo] {
        &self.seed
    }

    /// Handle one invocation. Never fails: any error becomes the 404 echo
    /// response.
    pub fn dispatch(&self, event: &InvocationEvent, ctx: &InvocationContext) -> ProxyResponse {
        let span = info_span!(
            "invocation",
            request_id = %ctx.request_id,
            method = %event.request_context.http_method,
            path = %event.request_context.resource_path,
        );
        let _guard = span.enter();

        coalesce(event, self.try_dispatch(event, ctx))
    }

    /// Handle one invocation without coalescing failures.
    pub fn try_dispatch(
        &self,
        event: &InvocationEvent,
        ctx: &InvocationContext,
    ) -> Result<ProxyResponse, ApiError> {
        let context = &event.request_context;
        let route = Route::resolve(&context.http_method, &context.resource_path).ok_or_else(|| {
            ApiError::RouteNotFound {
                method: context.http_method.clone(),
                path: context.resource_path.clone(),
            }
        })?;
        debug!(handler = route.handler_name(), "route resolved");

        let mut repo = MemTodoRepository::from_seed(&self.seed);
        run_handler(route.handler(), event, ctx, &mut repo)
    }

    /// Raw-JSON entry point for hosts that deliver the event untyped.
    ///
    /// Only an event without a readable `requestContext` is returned as an
    /// error; there is no routing metadata to echo. Any other malformed part
    /// (a non-string body or path parameter) gets the 404 echo.
    pub fn handle_value(&self, event: Value, ctx: &InvocationContext) -> Result<ProxyResponse, ApiError> {
        let raw_context = event
            .get("requestContext")
            .cloned()
            .ok_or_else(|| ApiError::MalformedEvent("missing `requestContext`".to_string()))?;
        let request_context: RequestContext =
            serde_json::from_value(raw_context).map_err(|e| ApiError::MalformedEvent(e.to_string()))?;

        match serde_json::from_value::<InvocationEvent>(event) {
            Ok(event) => Ok(self.dispatch(&event, ctx)),
            Err(err) => {
                let event = InvocationEvent {
                    request_context,
                    path_parameters: None,
                    body: None,
                };
                let err = ApiError::MalformedEvent(err.to_string());
                Ok(coalesce(&event, Err(err)))
            }
        }
    }
}

/// Run `handler`, turning a panic into `HandlerPanicked`.
fn run_handler(
    handler: Handler,
    event: &InvocationEvent,
    ctx: &InvocationContext,
    repo: &mut dyn TodoRepository,
) -> Result<ProxyResponse, ApiError> {
    catch_unwind(AssertUnwindSafe(|| handler(event, ctx, repo)))
        .map_err(|panic| ApiError::HandlerPanicked(panic_message(&*panic)))?
}

/// Pass a response through, or replace any error with the 404 echo.
fn coalesce(event: &InvocationEvent, result: Result<ProxyResponse, ApiError>) -> ProxyResponse {
    match result {
        Ok(response) => response,
        Err(err) => {
            warn!(error = %err, handler_failure = err.is_handler_failure(), "invocation failed");
            fallback_response(event)
        }
    }
}

/// The uniform not-found response echoing the routing metadata.
fn fallback_response(event: &InvocationEvent) -> ProxyResponse {
    let context = &event.request_context;
    let request_context = serde_json::to_value(context).unwrap_or(Value::Null);
    let body = json!({
        "message": "not found",
        "path": context.resource_path,
        "httpMethod": context.http_method,
        "requestContext": request_context,
    });
    ProxyResponse::json(404, &body).unwrap_or_else(|_| ProxyResponse::not_found())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
