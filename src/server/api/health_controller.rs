use axum::{
    Extension, Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;

use crate::{
    Logger,
    metrics::Metrics,
    server::{
        dtos::health_dto::{HealthResponse, HealthStatus},
        get_app_version, get_uptime_seconds,
        services::PortalServices,
    },
};

/// liveness only, the directory site is never contacted from here
pub async fn health_endpoint(
    Extension(services): Extension<PortalServices>,
) -> (StatusCode, Json<HealthResponse>) {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        timestamp: Utc::now(),
        uptime_seconds: get_uptime_seconds(),
        version: get_app_version().to_string(),
        environment: Logger::environment_name(services.config.cargo_env).to_string(),
        source: services.config.source_base_url.clone(),
    };

    (StatusCode::OK, Json(response))
}

pub async fn metrics_endpoint() -> Response {
    match Metrics::render() {
        Some(body) => (
            StatusCode::OK,
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; version=0.0.4"),
            )],
            body,
        )
            .into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics recorder unavailable",
        )
            .into_response(),
    }
}
