use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ChannelDto, DataSource};

/// body of `GET /api/matches`, `success` is true even when the data is the fallback list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchesResponse {
    pub success: bool,
    pub data: Vec<ChannelDto>,
    pub total: usize,
    pub last_updated: DateTime<Utc>,
    pub message: String,
    pub source: DataSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MatchesResponse {
    pub fn live(data: Vec<ChannelDto>) -> Self {
        let with_stream = data.iter().filter(|c| c.has_stream).count();
        Self {
            success: true,
            total: data.len(),
            message: format!(
                "found {} channels, {} with a stream",
                data.len(),
                with_stream
            ),
            data,
            last_updated: Utc::now(),
            source: DataSource::Live,
            error: None,
        }
    }

    pub fn fallback(data: Vec<ChannelDto>, error: Option<String>) -> Self {
        Self {
            success: true,
            total: data.len(),
            message: "live data unavailable, serving saved channel list".to_string(),
            data,
            last_updated: Utc::now(),
            source: DataSource::Fallback,
            error,
        }
    }
}
