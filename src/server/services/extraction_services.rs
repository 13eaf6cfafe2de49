use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::{debug, info};

use crate::server::{
    dtos::{StreamKind, StreamMatch},
    error::ScrapeResult,
    utils::{
        fid_utils::{candidate_stream_urls, derive_fid},
        html_utils::extract_stream,
        http_utils::fetch_html,
    },
};

pub type DynExtractionService = Arc<dyn ExtractionServiceTrait + Send + Sync>;

#[automock]
#[async_trait]
pub trait ExtractionServiceTrait {
    /// fetches a channel page and runs the heuristics over it, `Ok(None)` when nothing matched
    async fn extract(&self, channel_url: &str) -> ScrapeResult<Option<StreamMatch>>;

    /// guesses a url from the channel id, never checked against anything
    fn generate(&self, channel_url: &str, title: &str) -> Option<StreamMatch>;
}

pub struct ExtractionService {
    http_client: reqwest::Client,
    referer: String,
}

impl ExtractionService {
    /// `referer` is sent with every page request, normally the directory url
    pub fn new(http_client: reqwest::Client, referer: impl Into<String>) -> Self {
        Self {
            http_client,
            referer: referer.into(),
        }
    }
}

#[async_trait]
impl ExtractionServiceTrait for ExtractionService {
    async fn extract(&self, channel_url: &str) -> ScrapeResult<Option<StreamMatch>> {
        debug!("fetching channel page {}", channel_url);

        let html = fetch_html(&self.http_client, channel_url, Some(&self.referer)).await?;
        let found = extract_stream(&html, channel_url);

        match &found {
            Some(m) => info!("{} -> {} ({:?})", channel_url, m.url, m.kind),
            None => info!("no stream found on {}", channel_url),
        }

        Ok(found)
    }

    fn generate(&self, channel_url: &str, title: &str) -> Option<StreamMatch> {
        let fid = derive_fid(channel_url, title)?;
        let url = candidate_stream_urls(&fid).into_iter().next()?;
        debug!("generated {} for '{}' (fid {})", url, title, fid);
        Some(StreamMatch::new(url, StreamKind::Generated))
    }
}
