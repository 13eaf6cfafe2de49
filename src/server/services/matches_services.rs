use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::{StreamExt, stream};
use mockall::automock;
use tracing::{Instrument, info, info_span, warn};

use crate::{
    config::{AppConfig, ExtractionMode},
    metrics::{CHANNELS_EXTRACTED, FALLBACK_SERVED, MATCHES_REQUESTS},
    server::{
        dtos::{ChannelDto, ChannelStatus, MatchesResponse, StreamMatch},
        error::ScrapeError,
        utils::{category_utils::categorize, fallback_utils::fallback_channels},
    },
};

use super::{directory_services::DynDirectoryService, extraction_services::DynExtractionService};

pub type DynMatchesService = Arc<dyn MatchesServiceTrait + Send + Sync>;

#[automock]
#[async_trait]
pub trait MatchesServiceTrait {
    /// never fails, anything that goes wrong ends up as the fallback list with `error` set
    async fn get_matches(&self) -> MatchesResponse;
}

pub struct MatchesService {
    directory: DynDirectoryService,
    extraction: DynExtractionService,
    config: Arc<AppConfig>,
}

/// the saved channel list wrapped up as a response
pub fn fallback_response(error: Option<String>) -> MatchesResponse {
    metrics::counter!(FALLBACK_SERVED).increment(1);
    metrics::counter!(MATCHES_REQUESTS, "source" => "fallback").increment(1);
    MatchesResponse::fallback(fallback_channels(), error)
}

/// keeps the first channel for every id, order is preserved
pub fn dedupe_channels(channels: Vec<ChannelDto>) -> Vec<ChannelDto> {
    let mut seen = HashSet::new();
    channels
        .into_iter()
        .filter(|c| seen.insert(c.id.clone()))
        .collect()
}

fn status_label(status: ChannelStatus) -> &'static str {
    match status {
        ChannelStatus::Pending => "pending",
        ChannelStatus::Success => "success",
        ChannelStatus::NoStream => "no_stream",
        ChannelStatus::Error => "error",
        ChannelStatus::Generated => "generated",
    }
}

impl MatchesService {
    pub fn new(
        directory: DynDirectoryService,
        extraction: DynExtractionService,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            directory,
            extraction,
            config,
        }
    }

    fn prepare(&self, channels: Vec<ChannelDto>) -> Vec<ChannelDto> {
        let channels = if self.config.dedupe_channels {
            dedupe_channels(channels)
        } else {
            channels
        };

        channels
            .into_iter()
            .take(self.config.max_channels)
            .map(|mut channel| {
                channel.category = categorize(&channel.title).to_string();
                channel
            })
            .collect()
    }

    /// runs extraction for one channel, errors are recorded on the channel and never bubble up
    async fn process_channel(&self, mut channel: ChannelDto) -> ChannelDto {
        match self.extraction.extract(&channel.url).await {
            Ok(Some(found)) => channel.apply_stream(Some(found)),
            Ok(None) => {
                let guessed = self.guess(&channel);
                channel.apply_stream(guessed);
            }
            Err(e) => {
                warn!("extraction failed for '{}': {}", channel.title, e);
                channel.apply_error(e.to_string());
            }
        }

        metrics::counter!(CHANNELS_EXTRACTED, "status" => status_label(channel.status))
            .increment(1);
        channel
    }

    fn guess(&self, channel: &ChannelDto) -> Option<StreamMatch> {
        if !self.config.guess_stream_urls {
            return None;
        }
        self.extraction.generate(&channel.url, &channel.title)
    }

    async fn extract_sequential(&self, channels: Vec<ChannelDto>) -> Vec<ChannelDto> {
        let delay = Duration::from_millis(self.config.page_delay_ms);
        let mut processed = Vec::with_capacity(channels.len());

        for (index, channel) in channels.into_iter().enumerate() {
            // be nice to the source site
            if index > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            processed.push(self.process_channel(channel).await);
        }

        processed
    }

    async fn extract_concurrent(&self, channels: Vec<ChannelDto>) -> Vec<ChannelDto> {
        stream::iter(channels)
            .map(|channel| self.process_channel(channel))
            .buffered(self.config.max_concurrency.max(1))
            .collect::<Vec<_>>()
            .await
    }

    fn skip_extraction(&self, channels: Vec<ChannelDto>) -> Vec<ChannelDto> {
        channels
            .into_iter()
            .map(|mut channel| {
                if let Some(guessed) = self.guess(&channel) {
                    channel.apply_stream(Some(guessed));
                }
                channel
            })
            .collect()
    }
}

#[async_trait]
impl MatchesServiceTrait for MatchesService {
    async fn get_matches(&self) -> MatchesResponse {
        let request_id = nanoid::nanoid!(8);
        let span = info_span!("matches", request_id = %request_id);

        async move {
            let channels = match self.directory.fetch_channels().await {
                Ok(channels) if channels.is_empty() => {
                    let e = ScrapeError::EmptyDirectory(self.config.source_base_url.clone());
                    warn!("{}, serving fallback", e);
                    return fallback_response(Some(e.to_string()));
                }
                Ok(channels) => channels,
                Err(e) => {
                    warn!("directory unavailable, serving fallback: {}", e);
                    return fallback_response(Some(e.to_string()));
                }
            };

            let channels = self.prepare(channels);
            info!(
                "processing {} channels ({:?} mode)",
                channels.len(),
                self.config.extraction_mode
            );

            let channels = match self.config.extraction_mode {
                ExtractionMode::Sequential => self.extract_sequential(channels).await,
                ExtractionMode::Concurrent => self.extract_concurrent(channels).await,
                ExtractionMode::Skip => self.skip_extraction(channels),
            };

            metrics::counter!(MATCHES_REQUESTS, "source" => "live").increment(1);
            let response = MatchesResponse::live(channels);
            info!("{}", response.message);
            response
        }
        .instrument(span)
        .await
    }
}
