use serde::{Deserialize, Serialize};

/// which heuristic produced the stream url
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    Iframe,
    Video,
    Script,
    Meta,
    Pattern,
    Generated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelStatus {
    /// page was never visited
    Pending,
    Success,
    NoStream,
    Error,
    /// url was guessed from the channel id and never checked
    Generated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Live,
    Fallback,
}

/// a stream url plus the heuristic that found it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamMatch {
    pub url: String,
    pub kind: StreamKind,
}

impl StreamMatch {
    pub fn new(url: impl Into<String>, kind: StreamKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }

    pub fn is_hls(&self) -> bool {
        self.url.to_ascii_lowercase().contains(".m3u8")
    }
}

/// one row of the directory as handed to the client
///
/// built fresh for every request, nothing here outlives the response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelDto {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub url: String,
    pub stream_url: Option<String>,
    pub m3u8_url: Option<String>,
    pub stream_type: Option<StreamKind>,
    pub category: String,
    pub has_stream: bool,
    pub status: ChannelStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub source: DataSource,
}

impl ChannelDto {
    /// fresh directory entry, nothing extracted yet
    pub fn pending(
        title: impl Into<String>,
        icon: impl Into<String>,
        url: impl Into<String>,
        source: DataSource,
    ) -> Self {
        let title = title.into();
        let url = url.into();
        let id = match channel_key(&title) {
            key if key.is_empty() => url.clone(),
            key => key,
        };
        Self {
            id,
            title,
            icon: icon.into(),
            url,
            stream_url: None,
            m3u8_url: None,
            stream_type: None,
            category: String::new(),
            has_stream: false,
            status: ChannelStatus::Pending,
            error: None,
            source,
        }
    }

    /// records the result of extraction, keeps `has_stream`/`status`/`m3u8_url` consistent
    pub fn apply_stream(&mut self, found: Option<StreamMatch>) {
        match found {
            Some(found) => {
                self.status = match found.kind {
                    StreamKind::Generated => ChannelStatus::Generated,
                    _ => ChannelStatus::Success,
                };
                self.m3u8_url = found.is_hls().then(|| found.url.clone());
                self.stream_type = Some(found.kind);
                self.stream_url = Some(found.url);
                self.has_stream = true;
                self.error = None;
            }
            None => {
                self.stream_url = None;
                self.m3u8_url = None;
                self.stream_type = None;
                self.has_stream = false;
                self.status = ChannelStatus::NoStream;
            }
        }
    }

    pub fn apply_error(&mut self, message: impl Into<String>) {
        self.stream_url = None;
        self.m3u8_url = None;
        self.stream_type = None;
        self.has_stream = false;
        self.status = ChannelStatus::Error;
        self.error = Some(message.into());
    }
}

/// lowercase alphanumeric words joined by '-', "Star Sports 1 HD" -> "star-sports-1-hd"
///
/// titles without a single alphanumeric ("★ ★") keep their own whitespace-collapsed text, so they
/// don't all end up sharing one empty key
pub fn channel_key(title: &str) -> String {
    let key = title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("-");

    if key.is_empty() {
        title.split_whitespace().collect::<Vec<_>>().join(" ")
    } else {
        key
    }
}
