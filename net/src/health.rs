use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

/// `GET /health` liveness probe. No dependency checks -- an agent that can
/// answer HTTP at all is, by definition, live.
#[instrument(name = "health")]
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
