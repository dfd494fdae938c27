//! Error-to-response mapping.
//!
//! Every error body, including 404 for unmatched paths and 405 for
//! unsupported methods, is a JSON object with a `detail` string. Validation
//! errors additionally key the message list by field name.

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use planner_core::{CurriculumServiceError, NoteServiceError};
use serde_json::{json, Map, Value};

const NOT_FOUND_DETAIL: &str = "Not found.";
const PHASE_MISSING_DETAIL: &str = "阶段不存在";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 404 for any missing phase/note or unmatched path.
    NotFound,
    /// 404 raised by create-note when the owning phase is missing.
    PhaseMissing,
    /// 405 for a known path without a handler for the method.
    MethodNotAllowed(Method),
    /// 400 with a field-keyed message.
    Validation {
        field: &'static str,
        message: String,
    },
    /// 400 carrying the raw failure text.
    BadRequest(String),
    /// 500 carrying the raw failure text.
    Internal(String),
}

impl ApiError {
    /// Maps create-note failures. Anything besides a missing phase or a
    /// rejected body is surfaced to the client as a 400.
    pub fn from_note_create(err: NoteServiceError) -> Self {
        match err {
            NoteServiceError::PhaseNotFound(_) => Self::PhaseMissing,
            NoteServiceError::Validation(err) => Self::Validation {
                field: err.field,
                message: err.message.to_string(),
            },
            other => Self::BadRequest(other.to_string()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound | Self::PhaseMissing => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Validation { .. } | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> Value {
        match self {
            Self::NotFound => json!({ "detail": NOT_FOUND_DETAIL }),
            Self::PhaseMissing => json!({ "detail": PHASE_MISSING_DETAIL }),
            Self::MethodNotAllowed(method) => {
                json!({ "detail": format!("Method \"{method}\" not allowed.") })
            }
            Self::Validation { field, message } => {
                let mut body = Map::new();
                body.insert("detail".to_string(), Value::from(message.as_str()));
                body.insert((*field).to_string(), json!([message]));
                Value::Object(body)
            }
            Self::BadRequest(detail) | Self::Internal(detail) => json!({ "detail": detail }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

impl From<CurriculumServiceError> for ApiError {
    fn from(err: CurriculumServiceError) -> Self {
        match err {
            CurriculumServiceError::PhaseNotFound(_) => Self::NotFound,
            other => {
                error!("event=api_error module=api status=error error={other}");
                Self::Internal(other.to_string())
            }
        }
    }
}

impl From<NoteServiceError> for ApiError {
    fn from(err: NoteServiceError) -> Self {
        match err {
            NoteServiceError::PhaseNotFound(_) | NoteServiceError::NoteNotFound { .. } => {
                Self::NotFound
            }
            other => {
                error!("event=api_error module=api status=error error={other}");
                Self::Internal(other.to_string())
            }
        }
    }
}
