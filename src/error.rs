//! Some common error types.

use http::{Method, StatusCode};
use serde_json::json;

use crate::{param::ParamType, IntoResponse, Json, Response};

/// A route pattern could not be parsed.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum PatternError {
    /// The pattern does not start with `/`.
    #[error("route pattern `{0}` must start with `/`")]
    MissingLeadingSlash(String),

    /// The pattern contains `//` before its last segment.
    #[error("route pattern `{0}` contains an empty segment")]
    EmptySegment(String),

    /// A literal segment does not percent-decode to UTF-8.
    #[error("literal segment `{0}` is not valid percent-encoded UTF-8")]
    InvalidEncoding(String),

    /// A segment has unbalanced braces or mixes a placeholder with literal
    /// text.
    #[error("malformed placeholder segment `{0}`")]
    MalformedPlaceholder(String),

    /// A placeholder name is not an identifier.
    #[error("invalid placeholder name `{0}`")]
    InvalidName(String),

    /// A placeholder declares a type outside of `str`, `int`, `float` and
    /// `bool`.
    #[error("unknown type `{ty}` for placeholder `{name}`")]
    UnknownType {
        /// The placeholder name.
        name: String,
        /// The declared type.
        ty: String,
    },

    /// The same placeholder name appears twice in one pattern.
    #[error("duplicate placeholder `{0}`")]
    DuplicateName(String),
}

/// A route matched structurally, but a captured segment could not be
/// converted to the type declared by its placeholder.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
#[error("path parameter `{name}` expects {expected}, got `{value}`")]
pub struct PlaceholderTypeError {
    /// The placeholder name.
    pub name: String,
    /// The declared type.
    pub expected: ParamType,
    /// The captured text, after percent-decoding.
    pub value: String,
}

/// Why a request could not be dispatched to a handler.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum DispatchError {
    /// No route of the request method matches the path structurally.
    #[error("no route for {method} {path}")]
    RouteNotFound {
        /// The request method.
        method: Method,
        /// The request path.
        path: String,
    },

    /// The first structurally matching route rejected a captured value.
    #[error(transparent)]
    PlaceholderType(#[from] PlaceholderTypeError),
}

impl DispatchError {
    /// Returns `true` for [`DispatchError::RouteNotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, DispatchError::RouteNotFound { .. })
    }

    /// The status code a client should receive for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            DispatchError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            DispatchError::PlaceholderType(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            DispatchError::RouteNotFound { .. } => json!({ "detail": "Not Found" }),
            DispatchError::PlaceholderType(err) => json!({
                "detail": [{
                    "loc": ["path", err.name],
                    "msg": err.expected.error_message(),
                    "type": err.expected.error_type(),
                    "input": err.value,
                }]
            }),
        };
        (status, Json(body)).into_response()
    }
}

/// Path parameters could not be deserialized into the requested type.
#[derive(Debug, thiserror::Error)]
#[error("invalid path params: {0}")]
pub struct ParamsDeserializeError(#[from] pub serde_json::Error);

/// Path parameters were requested from a request that was not dispatched
/// through a [`Route`](crate::Route).
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
#[error("missing route params")]
pub struct MissingParamsError;
