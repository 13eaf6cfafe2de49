use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use futures::{StreamExt, TryStreamExt, stream::BoxStream};
use mockall::automock;
use reqwest::header;
use tracing::{debug, error};

use crate::{
    metrics::PROXY_REQUESTS,
    server::error::{AppResult, Error},
};

pub const DEFAULT_STREAM_CONTENT_TYPE: &str = "application/vnd.apple.mpegurl";

pub type DynRelayService = Arc<dyn RelayServiceTrait + Send + Sync>;

/// upstream response that's ready to be piped to the client
pub struct RelayedStream {
    pub content_type: String,
    pub body: BoxStream<'static, Result<Bytes, std::io::Error>>,
}

#[automock]
#[async_trait]
pub trait RelayServiceTrait {
    /// opens the upstream url with the spoofed headers, the body isn't read yet
    async fn open(&self, target_url: &str) -> AppResult<RelayedStream>;
}

pub struct RelayService {
    http_client: reqwest::Client,
    origin: String,
    user_agent: String,
}

impl RelayService {
    /// `origin` is the site the upstream expects requests from, e.g. `https://profamouslife.com`
    pub fn new(origin: impl Into<String>, user_agent: impl Into<String>, timeout_secs: u64) -> Self {
        // a total timeout would cut long running streams, so only bound connecting and stalls
        let timeout = Duration::from_secs(timeout_secs);
        let http_client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                error!("failed to build relay client, using defaults: {}", e);
                reqwest::Client::new()
            });

        Self {
            http_client,
            origin: origin.into(),
            user_agent: user_agent.into(),
        }
    }
}

#[async_trait]
impl RelayServiceTrait for RelayService {
    async fn open(&self, target_url: &str) -> AppResult<RelayedStream> {
        let response = self
            .http_client
            .get(target_url)
            .header(header::ORIGIN, &self.origin)
            .header(header::REFERER, format!("{}/", self.origin))
            .header(header::USER_AGENT, &self.user_agent)
            .header(header::ACCEPT, "*/*")
            .send()
            .await
            .map_err(|e| {
                error!("proxy request to {} failed: {}", target_url, e);
                metrics::counter!(PROXY_REQUESTS, "outcome" => "request_failed").increment(1);
                Error::ProxyFailed {
                    details: e.to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("upstream {} answered with {}", target_url, status);
            metrics::counter!(PROXY_REQUESTS, "outcome" => "upstream_error").increment(1);
            return Err(Error::ProxyFailed {
                details: format!("upstream returned status {}", status.as_u16()),
            });
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_STREAM_CONTENT_TYPE)
            .to_string();

        debug!("relaying {} as {}", target_url, content_type);
        metrics::counter!(PROXY_REQUESTS, "outcome" => "ok").increment(1);

        let body = response
            .bytes_stream()
            .map_err(std::io::Error::other)
            .boxed();

        Ok(RelayedStream { content_type, body })
    }
}
