pub mod api;
pub mod dtos;
pub mod error;
pub mod extractors;
pub mod services;
pub mod utils;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use axum::{
    Extension, Router, ServiceExt,
    extract::Request,
    http::{HeaderValue, Method, header},
    routing::get,
};
use lazy_static::lazy_static;
use tokio::net::TcpListener;
use tower::{Layer, ServiceBuilder};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    normalize_path::NormalizePathLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::config::AppConfig;

use api::{
    health_controller::{health_endpoint, metrics_endpoint},
    matches_controller::MatchesController,
    proxy_stream_controller::ProxyStreamController,
};
use services::PortalServices;

lazy_static! {
    static ref START_TIME: Instant = Instant::now();
}

pub fn get_uptime_seconds() -> u64 {
    START_TIME.elapsed().as_secs()
}

pub fn get_app_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub struct PortalApplicationServer;

impl PortalApplicationServer {
    /// every route with its layers, split out from `serve` so tests can drive it with oneshot
    pub fn router(services: PortalServices) -> Router {
        let cors = Self::cors_layer(&services.config);

        Router::new()
            .merge(MatchesController::app())
            .merge(ProxyStreamController::app())
            .route("/health", get(health_endpoint))
            .route("/metrics", get(metrics_endpoint))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(cors)
                    .layer(Extension(services)),
            )
    }

    /// `*` opens everything up, otherwise a comma separated list of origins
    pub fn cors_layer(config: &AppConfig) -> CorsLayer {
        let origin = if config.cors_origin.trim() == "*" {
            AllowOrigin::any()
        } else {
            let origins = config
                .cors_origin
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .filter_map(|o| match o.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!("ignoring invalid cors origin '{}'", o);
                        None
                    }
                })
                .collect::<Vec<_>>();
            AllowOrigin::list(origins)
        };

        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
            .expose_headers(Any)
    }

    pub async fn serve(config: Arc<AppConfig>) -> anyhow::Result<()> {
        lazy_static::initialize(&START_TIME);

        let services = PortalServices::new(config.clone());

        // has to wrap the router from the outside, a Router::layer runs after routing
        let app = NormalizePathLayer::trim_trailing_slash().layer(Self::router(services));

        let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;

        info!("portal listening on {}", addr);

        axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
            .with_graceful_shutdown(Self::shutdown_signal())
            .await
            .context("server exited with an error")?;

        info!("portal shut down");
        Ok(())
    }

    async fn shutdown_signal() {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for ctrl-c: {}", e);
            // never resolve, we just can't shut down gracefully
            std::future::pending::<()>().await;
        }
        info!("shutdown signal received");
    }
}
