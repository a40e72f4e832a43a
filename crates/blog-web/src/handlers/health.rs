//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use blog_service::dto::{HealthChecks, HealthResponse, ReadinessResponse};
use tracing::warn;

use crate::state::AppState;

/// Liveness probe
///
/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Readiness probe: database and page cache must answer
///
/// GET /health/ready
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let ctx = state.service_context();

    let database = match ctx.check_database().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Database readiness check failed");
            false
        }
    };
    let cache = match ctx.page_cache().health_check().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Page cache readiness check failed");
            false
        }
    };

    let response = ReadinessResponse::new(HealthChecks { database, cache });
    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response))
}
