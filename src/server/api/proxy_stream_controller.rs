// relays whatever url it's given with the directory site's headers so the player doesn't get
// bounced by referer/origin checks. any http(s) url is relayed, there's no host allow-list
use axum::{
    Extension, Router,
    body::Body,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::Deserialize;
use tracing::{error, info};
use validator::Validate;

use crate::server::{
    api::method_not_allowed,
    error::{AppResult, Error},
    extractors::ValidatedQuery,
    services::{PortalServices, relay_services::DEFAULT_STREAM_CONTENT_TYPE},
    utils::url_utils::is_http_url,
};

#[derive(Deserialize, Validate)]
pub struct ProxyStreamQuery {
    #[validate(
        required(message = "URL parameter required"),
        length(min = 1, message = "URL parameter required")
    )]
    pub url: Option<String>,
}

pub struct ProxyStreamController;

impl ProxyStreamController {
    pub fn app() -> Router {
        Router::new().route(
            "/api/proxy-stream",
            get(Self::proxy_get)
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        )
    }

    async fn proxy_get(
        Extension(services): Extension<PortalServices>,
        ValidatedQuery(params): ValidatedQuery<ProxyStreamQuery>,
    ) -> AppResult<Response> {
        let raw = params.url.unwrap_or_default();
        let target_url = Self::decode_url(raw.trim())?;

        if !is_http_url(&target_url) {
            return Err(Error::BadRequest("Invalid URL format".to_string()));
        }

        info!("proxying stream: {}", target_url);

        let relayed = services.relay.open(&target_url).await?;

        let mut response_headers = HeaderMap::new();
        response_headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_str(&relayed.content_type)
                .unwrap_or(HeaderValue::from_static(DEFAULT_STREAM_CONTENT_TYPE)),
        );
        response_headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        Ok((
            StatusCode::OK,
            response_headers,
            Body::from_stream(relayed.body),
        )
            .into_response())
    }

    /// the player sends plain urls, but urls with their own query strings survive a round trip
    /// better as unpadded url-safe base64 so both are accepted. a url that got percent-encoded
    /// twice is decoded once more
    pub fn decode_url(url_param: &str) -> AppResult<String> {
        let lower = url_param.to_ascii_lowercase();

        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Ok(url_param.to_string());
        }

        if lower.starts_with("http%3a") || lower.starts_with("https%3a") {
            return urlencoding::decode(url_param)
                .map(|s| s.into_owned())
                .map_err(|e| {
                    error!("Failed to decode URL: {}", e);
                    Error::BadRequest("Invalid URL format".to_string())
                });
        }

        URL_SAFE_NO_PAD
            .decode(url_param.trim_end_matches('='))
            .map_err(|e| {
                error!("Failed to decode base64: {}", e);
                Error::BadRequest("Invalid URL format".to_string())
            })
            .and_then(|bytes| {
                String::from_utf8(bytes).map_err(|e| {
                    error!("Failed to parse UTF-8: {}", e);
                    Error::BadRequest("Invalid URL format".to_string())
                })
            })
    }
}
