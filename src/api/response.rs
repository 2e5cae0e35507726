//! Uniform response envelope and error mapping
//!
//! Every body is either `{"success": true, "data": ...}` or
//! `{"success": false, "error": "..."}`.

use std::any::Any;

use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::data::ServiceError;

/// Message returned for anything that escapes a handler
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong on the server!";

#[derive(Debug, Serialize)]
pub struct Success<T> {
    success: bool,
    data: T,
}

impl<T> Success<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Failure {
    success: bool,
    error: String,
}

impl Failure {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    /// A required request parameter is missing
    #[error("{0}")]
    Validation(&'static str),

    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The data could not be turned into a JSON body
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),

    /// Path parameters that do not decode, e.g. invalid UTF-8
    #[error(transparent)]
    Path(#[from] PathRejection),

    /// A query string that does not deserialize
    #[error(transparent)]
    Query(#[from] QueryRejection),

    #[error("Not found")]
    NotFound,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Path(rejection) => rejection.status(),
            ApiError::Query(rejection) => rejection.status(),
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Service { .. } | ApiError::Serialize { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(Failure::new(self.to_string()))).into_response()
    }
}

/// Unknown routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Turns a handler panic into a generic 500 without leaking the panic message
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    error!(panic = detail, "Request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(Failure::new(INTERNAL_ERROR_MESSAGE)),
    )
        .into_response()
}
