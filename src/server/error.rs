use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

pub type AppResult<T> = Result<T, Error>;

/// everything a handler can fail with, each variant maps to exactly one status code
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    BadRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Failed to proxy stream")]
    ProxyFailed { details: String },

    #[error("Internal server error")]
    InternalServerError,

    #[error("{0}")]
    InternalServerErrorWithContext(String),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::ProxyFailed { .. }
            | Self::InternalServerError
            | Self::InternalServerErrorWithContext(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            Self::ProxyFailed { details } => ErrorBody {
                error: "Failed to proxy stream".to_string(),
                details: Some(details),
            },
            // context is for the logs, the caller just gets the generic message
            Self::InternalServerErrorWithContext(context) => {
                error!("internal error: {}", context);
                ErrorBody {
                    error: Self::InternalServerError.to_string(),
                    details: None,
                }
            }
            other => ErrorBody {
                error: other.to_string(),
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// failures while talking to the scraped site, these never reach the http layer directly. the
/// matches service turns them into per-channel `error` records or a fallback response
#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode body from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("no channels found at {0}")]
    EmptyDirectory(String),
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;
