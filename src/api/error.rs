// API error taxonomy
// Every failure is terminal for the request and maps to one status code

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use thiserror::Error;

use crate::http;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Wrong path segment count or shape
    #[error("Invalid path format. Use {expected}")]
    MalformedRequest { expected: &'static str },
    /// Missing file or directory
    #[error("{0}")]
    NotFound(&'static str),
    /// I/O, decode or listing failure
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MalformedRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn into_response(self) -> Response<Full<Bytes>> {
        http::build_error_response(self.status(), &self.to_string())
    }
}
