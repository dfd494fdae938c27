//! HTTP routing table.
//!
//! Paths keep their trailing slash; `/api/phases/5` and `/api/phases/5/`
//! are different routes and only the latter exists.

mod error;
mod notes;
mod phases;
mod request_log;

pub use error::ApiError;

use crate::state::AppState;
use axum::http::header::HOST;
use axum::http::{HeaderMap, Method};
use axum::routing::get;
use axum::{middleware, Json, Router};
use serde_json::{json, Value};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/", get(api_root))
        .route("/api/phases/", get(phases::list_phases))
        .route("/api/phases/:phase_id/", get(phases::get_phase))
        .route(
            "/api/phases/:phase_id/notes/",
            get(notes::list_notes).post(notes::create_note),
        )
        .route(
            "/api/phases/:phase_id/notes/:note_id/",
            get(notes::get_note).delete(notes::delete_note),
        )
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(middleware::from_fn(request_log::log_requests))
        .with_state(state)
}

/// GET /api/
async fn api_root(headers: HeaderMap) -> Json<Value> {
    let base = headers
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .map(|host| format!("http://{host}"))
        .unwrap_or_default();
    Json(json!({ "phases": format!("{base}/api/phases/") }))
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed(method)
}
