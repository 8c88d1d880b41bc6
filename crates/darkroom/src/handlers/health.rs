//! Health check endpoint.

use axum::http::StatusCode;

/// GET /health - Basic liveness probe.
///
/// Returns 200 immediately. Used to check if the server is accepting
/// connections; it does not touch the backing store.
#[axum::debug_handler]
pub async fn health() -> StatusCode {
    StatusCode::OK
}
