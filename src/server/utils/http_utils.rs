use std::io::Read;
use std::time::Duration;

use flate2::read::GzDecoder;
use reqwest::header;
use tracing::{debug, error};

use crate::server::error::{ScrapeError, ScrapeResult};

/// shared client for the directory and channel pages, made to look like a desktop browser
pub fn build_scrape_client(user_agent: &str, timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|e| {
            error!("failed to build scrape client, using defaults: {}", e);
            reqwest::Client::new()
        })
}

/// GETs a page and hands back the html as text
///
/// the referer is set to whatever linked to the page, some of the channel pages refuse to render
/// the player without it
pub async fn fetch_html(
    client: &reqwest::Client,
    url: &str,
    referer: Option<&str>,
) -> ScrapeResult<String> {
    let mut request = client
        .get(url)
        .header(
            header::ACCEPT,
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .header(header::ACCEPT_ENCODING, "gzip");

    if let Some(referer) = referer {
        request = request.header(header::REFERER, referer);
    }

    let response = request.send().await.map_err(|source| ScrapeError::Http {
        url: url.to_string(),
        source,
    })?;

    let status = response.status();
    debug!("{} answered with {}", url, status);

    if !status.is_success() {
        return Err(ScrapeError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response.bytes().await.map_err(|source| ScrapeError::Body {
        url: url.to_string(),
        source,
    })?;

    decode_body(url, &bytes)
}

/// reqwest is built without its gzip feature so anything that comes back compressed gets
/// inflated here, the rest is read as lossy utf8 because these sites don't care about encodings
pub fn decode_body(url: &str, bytes: &[u8]) -> ScrapeResult<String> {
    if bytes.len() > 2 && bytes[0] == 0x1f && bytes[1] == 0x8b {
        let mut decoder = GzDecoder::new(bytes);
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .map_err(|e| ScrapeError::Decode {
                url: url.to_string(),
                reason: format!("gzip: {}", e),
            })?;
        return Ok(String::from_utf8_lossy(&decompressed).into_owned());
    }

    Ok(String::from_utf8_lossy(bytes).into_owned())
}
