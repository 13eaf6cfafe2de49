use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use mockall::automock;
use tracing::{info, warn};

use crate::{
    metrics::DIRECTORY_FETCH_SECONDS,
    server::{
        dtos::ChannelDto,
        error::ScrapeResult,
        utils::{html_utils::parse_directory, http_utils::fetch_html},
    },
};

pub type DynDirectoryService = Arc<dyn DirectoryServiceTrait + Send + Sync>;

#[automock]
#[async_trait]
pub trait DirectoryServiceTrait {
    /// channel stubs in document order, any failure aborts the whole fetch
    async fn fetch_channels(&self) -> ScrapeResult<Vec<ChannelDto>>;
}

pub struct DirectoryService {
    http_client: reqwest::Client,
    base_url: String,
}

impl DirectoryService {
    pub fn new(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl DirectoryServiceTrait for DirectoryService {
    async fn fetch_channels(&self) -> ScrapeResult<Vec<ChannelDto>> {
        info!("fetching channel directory from {}", self.base_url);
        let started = Instant::now();

        let result = fetch_html(&self.http_client, &self.base_url, None).await;
        metrics::histogram!(DIRECTORY_FETCH_SECONDS).record(started.elapsed().as_secs_f64());

        let html = result.inspect_err(|e| warn!("directory fetch failed: {}", e))?;
        let channels = parse_directory(&html, &self.base_url);

        info!(
            "directory had {} channels ({} bytes of html)",
            channels.len(),
            html.len()
        );
        Ok(channels)
    }
}
