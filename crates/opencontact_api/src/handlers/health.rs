use crate::dto::HealthResponse;
use axum::Json;

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: opencontact_core::core_version(),
    })
}
