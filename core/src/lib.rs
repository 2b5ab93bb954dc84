//! Request router and repository for a serverless todo CRUD API.
//!
//! # Overview
//! A host (a serverless trigger or the local gateway) hands the
//! `Dispatcher` an `InvocationEvent`; the dispatcher looks up
//! `(httpMethod, resourcePath)` in a static route table, runs the matched
//! handler against a fresh in-memory repository and returns a
//! `ProxyResponse`. No I/O happens here.
//!
//! # Design
//! - `TodoRepository` is the only storage seam; `MemTodoRepository` deep-copies
//!   the static seed per invocation, so writes never outlive one request.
//! - Handlers answer missing records with an explicit 404. Every other
//!   failure is coalesced by the dispatcher into one generic 404.
//! - Wire types use owned `String` / `Map` fields and the host's camelCase
//!   names.

pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod http;
pub mod repository;
pub mod seed;
pub mod types;

pub use dispatcher::{Dispatcher, Route, ROUTES};
pub use error::{ApiError, RepoError};
pub use http::{HttpMethod, InvocationContext, InvocationEvent, ProxyResponse, RequestContext};
pub use repository::{MemTodoRepository, TodoRepository};
pub use seed::TODO_DATA;
pub use types::Todo;
