//! Response envelope
//!
//! Every endpoint answers `{"v": <value>, "e": <error>}` with HTTP 200.
//! Failures are reported in `e` only; `v` is then the empty string.

use std::fmt::Display;

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error text returned when the shared secret does not match
pub const AUTH_FAIL: &str = "auth fail";

/// Uniform response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Operation result, `""` when there is none
    pub v: Value,
    /// Error message, `""` on success
    pub e: String,
}

impl Envelope {
    /// Successful response carrying `value`
    pub fn ok(value: impl Into<Value>) -> Self {
        Self {
            v: value.into(),
            e: String::new(),
        }
    }

    /// Successful response with no payload
    pub fn empty() -> Self {
        Self::ok("")
    }

    /// Failed response carrying the error's message
    pub fn fail(err: impl Display) -> Self {
        Self {
            v: Value::from(""),
            e: err.to_string(),
        }
    }

    /// The shared secret did not match
    pub fn auth_fail() -> Self {
        Self::fail(AUTH_FAIL)
    }

    /// Wrap an operation result, serializing the success value
    pub fn from_result<T, E>(result: Result<T, E>) -> Self
    where
        T: Serialize,
        E: Display,
    {
        match result {
            Ok(value) => match serde_json::to_value(value) {
                Ok(v) => Self::ok(v),
                Err(e) => Self::fail(e),
            },
            Err(e) => Self::fail(e),
        }
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
