//! Per-request access log.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use log::{error, info, warn};
use std::time::Instant;

pub(super) async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started_at = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let http_status = status.as_u16();
    let duration_ms = started_at.elapsed().as_millis();
    if status.is_server_error() {
        error!(
            "event=http_request module=api status=error method={method} path={path} http_status={http_status} duration_ms={duration_ms}"
        );
    } else if status.is_client_error() {
        warn!(
            "event=http_request module=api status=rejected method={method} path={path} http_status={http_status} duration_ms={duration_ms}"
        );
    } else {
        info!(
            "event=http_request module=api status=ok method={method} path={path} http_status={http_status} duration_ms={duration_ms}"
        );
    }
    response
}
