//! Error types for the todo router.
//!
//! # Design
//! `RecordNotFound` is raised only for diagnostics; handlers answer a missing
//! record themselves with an explicit 404. Every other variant is a failure
//! that the dispatcher coalesces into its generic not-found response, so the
//! caller sees the same 404 for a bad route, a malformed body or a repository
//! error. The variants exist for logging and for `try_dispatch`.

use thiserror::Error;

/// Errors raised by a `TodoRepository`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoError {
    /// `create` was called with an id that is already stored.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),
}

/// Errors raised while routing or handling an invocation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No route table entry for the method and resource path.
    #[error("no route for {method} {path}")]
    RouteNotFound { method: String, path: String },

    /// The route is valid but the id is absent from the repository.
    #[error("record not found: {0}")]
    RecordNotFound(String),

    /// A path parameter the handler needs was not supplied.
    #[error("missing path parameter `{0}`")]
    MissingPathParameter(&'static str),

    /// The handler needs a body and the event carried none.
    #[error("missing request body")]
    MissingBody,

    /// The body could not be parsed into the expected shape.
    #[error("malformed body: {0}")]
    MalformedBody(String),

    #[error(transparent)]
    Repository(#[from] RepoError),

    /// The handler panicked; the payload is kept for the log.
    #[error("handler panicked: {0}")]
    HandlerPanicked(String),

    /// The raw event could not be read as an invocation event.
    #[error("malformed event: {0}")]
    MalformedEvent(String),

    /// A response body could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// True for failures raised while a matched handler was running, as
    /// opposed to a route miss.
    pub fn is_handler_failure(&self) -> bool {
        !matches!(self, ApiError::RouteNotFound { .. })
    }
}
