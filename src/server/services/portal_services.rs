use std::sync::Arc;

use tracing::info;

use crate::{
    config::AppConfig,
    server::utils::{http_utils::build_scrape_client, url_utils::origin_of},
};

use super::{
    directory_services::DirectoryService,
    extraction_services::ExtractionService,
    matches_services::{DynMatchesService, MatchesService},
    relay_services::{DynRelayService, RelayService},
};

/// everything the handlers need, cloned into every request through an `Extension`
#[derive(Clone)]
pub struct PortalServices {
    pub matches: DynMatchesService,
    pub relay: DynRelayService,
    pub config: Arc<AppConfig>,
}

impl PortalServices {
    pub fn new(config: Arc<AppConfig>) -> Self {
        info!("starting portal services...");

        // one pool for the directory and every channel page
        let http = build_scrape_client(&config.user_agent, config.request_timeout_secs);

        let directory = Arc::new(DirectoryService::new(
            http.clone(),
            config.source_base_url.clone(),
        ));
        let extraction = Arc::new(ExtractionService::new(
            http,
            config.source_base_url.clone(),
        ));
        let matches = Arc::new(MatchesService::new(directory, extraction, config.clone()))
            as DynMatchesService;

        // the base url may carry a path, upstreams only ever see scheme + host
        let origin = origin_of(&config.source_base_url)
            .unwrap_or_else(|| config.source_origin().to_string());
        let relay = Arc::new(RelayService::new(
            origin,
            config.user_agent.clone(),
            config.proxy_timeout_secs,
        )) as DynRelayService;

        info!("scraping {} ({:?} extraction)", config.source_base_url, config.extraction_mode);

        Self {
            matches,
            relay,
            config,
        }
    }
}
