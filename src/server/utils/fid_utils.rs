use url::Url;

/// places a guessed channel id gets substituted into, in the order they're tried
pub const STREAM_TEMPLATES: &[&str] = &[
    "https://streamcrichd.com/update/{fid}.php",
    "https://crichd.vip/embed/{fid}.php",
    "https://profamouslife.com/player/{fid}.php",
    "https://cdn.crichdplays.ru/embed2/{fid}.php",
];

/// best guess at the id the embed hosts use for a channel
///
/// `?fid=` or `?id=` on the channel url, else the last path segment without its extension, else
/// the title squashed to lowercase alphanumerics
pub fn derive_fid(channel_url: &str, title: &str) -> Option<String> {
    if let Ok(url) = Url::parse(channel_url) {
        let from_query = url
            .query_pairs()
            .find(|(k, _)| k == "fid" || k == "id")
            .map(|(_, v)| v.trim().to_string())
            .filter(|v| !v.is_empty());
        if from_query.is_some() {
            return from_query;
        }

        let from_path = url
            .path_segments()
            .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
            .map(|segment| match segment.rsplit_once('.') {
                Some((stem, _ext)) => stem.to_string(),
                None => segment.to_string(),
            })
            .map(|s| s.to_lowercase())
            .filter(|s| !s.is_empty() && !matches!(s.as_str(), "index" | "channel" | "channels"));
        if from_path.is_some() {
            return from_path;
        }
    }

    let squashed: String = title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    (!squashed.is_empty()).then_some(squashed)
}

/// every template with the fid substituted, nothing here checks that they resolve
pub fn candidate_stream_urls(fid: &str) -> Vec<String> {
    let encoded = urlencoding::encode(fid);
    STREAM_TEMPLATES
        .iter()
        .map(|template| template.replace("{fid}", &encoded))
        .collect()
}
