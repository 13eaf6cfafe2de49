use std::time::Duration;

use axum::{Extension, Json, Router, routing::get};
use tracing::warn;

use crate::server::{
    api::method_not_allowed,
    dtos::MatchesResponse,
    services::{PortalServices, matches_services::fallback_response},
};

pub struct MatchesController;

impl MatchesController {
    pub fn app() -> Router {
        Router::new().route(
            "/api/matches",
            get(Self::matches_get)
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        )
    }

    /// always 200, a dead directory or a blown budget just means fallback data
    async fn matches_get(Extension(services): Extension<PortalServices>) -> Json<MatchesResponse> {
        let budget = Duration::from_secs(services.config.handler_timeout_secs);

        let response = match tokio::time::timeout(budget, services.matches.get_matches()).await {
            Ok(response) => response,
            Err(_) => {
                warn!(
                    "matches took longer than {}s, serving fallback",
                    budget.as_secs()
                );
                fallback_response(Some(format!(
                    "live scrape timed out after {}s",
                    budget.as_secs()
                )))
            }
        };

        Json(response)
    }
}
