//! Prometheus recorder for the portal.
//!
//! The handle is process-wide so the `/metrics` route can render it without threading extra state
//! through the services container.

use std::sync::OnceLock;

use anyhow::{Context, anyhow};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub const MATCHES_REQUESTS: &str = "portal_matches_requests_total";
pub const CHANNELS_EXTRACTED: &str = "portal_channels_extracted_total";
pub const FALLBACK_SERVED: &str = "portal_fallback_total";
pub const PROXY_REQUESTS: &str = "portal_proxy_requests_total";
pub const DIRECTORY_FETCH_SECONDS: &str = "portal_directory_fetch_seconds";

pub struct Metrics;

impl Metrics {
    /// installs the global recorder, only call this once from main
    pub fn init() -> anyhow::Result<()> {
        let recorder = PrometheusBuilder::new()
            .install_recorder()
            .context("failed to install Prometheus recorder")?;

        PROMETHEUS_HANDLE
            .set(recorder)
            .map_err(|_| anyhow!("Prometheus recorder has already been initialized"))?;

        metrics::describe_counter!(
            MATCHES_REQUESTS,
            "Total number of /api/matches responses grouped by data source."
        );
        metrics::describe_counter!(
            CHANNELS_EXTRACTED,
            "Channel pages processed grouped by extraction status."
        );
        metrics::describe_counter!(
            FALLBACK_SERVED,
            "Times the hardcoded channel list was served instead of live data."
        );
        metrics::describe_counter!(
            PROXY_REQUESTS,
            "Relayed stream requests grouped by outcome."
        );
        metrics::describe_histogram!(
            DIRECTORY_FETCH_SECONDS,
            "Latency (in seconds) of the channel directory fetch."
        );

        Ok(())
    }

    /// text exposition format, `None` when the recorder was never installed (tests)
    pub fn render() -> Option<String> {
        PROMETHEUS_HANDLE.get().map(|handle| handle.render())
    }
}
