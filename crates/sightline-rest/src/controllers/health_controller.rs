//! Health check controller.

use crate::state::AppState;
use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};
use futures::future::join_all;
use serde::Serialize;
use sightline_core::{HealthCheck, HealthStatus};
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status.
    pub status: String,
    /// Application version.
    pub version: String,
}

/// Status of one dependency probed by the readiness check.
#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentHealth {
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Readiness check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadinessResponse {
    pub status: String,
    pub checks: Vec<ComponentHealth>,
}

/// Creates the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/live", get(liveness_check))
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check endpoint.
///
/// Probes every registered dependency. Degraded dependencies still report
/// ready; any unhealthy one fails the check.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service is ready", body = ReadinessResponse),
        (status = 503, description = "Service is not ready", body = ReadinessResponse)
    )
)]
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let statuses = join_all(state.health_checks.iter().map(|check| check.check())).await;

    let mut ready = true;
    let checks: Vec<ComponentHealth> = state
        .health_checks
        .iter()
        .zip(statuses)
        .map(|(check, status)| {
            let (label, message) = match status {
                HealthStatus::Healthy => ("healthy", None),
                HealthStatus::Degraded(msg) => ("degraded", Some(msg)),
                HealthStatus::Unhealthy(msg) => {
                    ready = false;
                    ("unhealthy", Some(msg))
                }
            };
            ComponentHealth {
                name: check.name().to_string(),
                status: label.to_string(),
                message,
            }
        })
        .collect();

    let (code, status) = if ready {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    };

    (
        code,
        Json(ReadinessResponse {
            status: status.to_string(),
            checks,
        }),
    )
}

/// Liveness check endpoint.
#[utoipa::path(
    get,
    path = "/live",
    tag = "health",
    responses(
        (status = 200, description = "Service is alive")
    )
)]
pub async fn liveness_check() -> impl IntoResponse {
    StatusCode::OK
}
