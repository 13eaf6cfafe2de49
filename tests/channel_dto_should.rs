use portal::server::dtos::{
    ChannelDto, ChannelStatus, DataSource, StreamKind, StreamMatch, channel_key,
};
use portal::server::services::matches_services::dedupe_channels;
use portal::server::utils::fallback_utils::fallback_channels;

fn star() -> ChannelDto {
    ChannelDto::pending(
        "Star Sports 1 HD",
        "https://profamouslife.com/star.png",
        "https://profamouslife.com/star.php",
        DataSource::Live,
    )
}

#[test]
fn test_channel_key_from_title() {
    assert_eq!(channel_key("Star Sports 1 HD"), "star-sports-1-hd");
    assert_eq!(channel_key("  Sky Sports: Cricket!! "), "sky-sports-cricket");
    assert_eq!(channel_key("A Sports HD"), "a-sports-hd");
}

#[test]
fn test_symbol_only_titles_keep_distinct_ids() {
    assert_eq!(channel_key("  ★   ★ "), "★ ★");

    let stars = ChannelDto::pending("★ ★", "", "https://profamouslife.com/1.php", DataSource::Live);
    let bangs = ChannelDto::pending("!!!", "", "https://profamouslife.com/2.php", DataSource::Live);
    assert_ne!(stars.id, bangs.id);
    assert!(!stars.id.is_empty() && !bangs.id.is_empty());

    let deduped = dedupe_channels(vec![stars, bangs]);
    assert_eq!(deduped.len(), 2);
}

#[test]
fn test_blank_title_falls_back_to_the_url() {
    let channel = ChannelDto::pending("   ", "", "https://profamouslife.com/3.php", DataSource::Live);
    assert_eq!(channel.id, "https://profamouslife.com/3.php");
}

#[test]
fn test_pending_channel() {
    let channel = star();

    assert_eq!(channel.id, "star-sports-1-hd");
    assert_eq!(channel.status, ChannelStatus::Pending);
    assert!(!channel.has_stream);
    assert_eq!(channel.stream_url, None);
}

#[test]
fn test_hls_stream_sets_m3u8_url() {
    let mut channel = star();
    channel.apply_stream(Some(StreamMatch::new(
        "https://cdn.example/live/INDEX.M3U8?t=1",
        StreamKind::Pattern,
    )));

    assert_eq!(channel.status, ChannelStatus::Success);
    assert!(channel.has_stream);
    assert_eq!(channel.stream_type, Some(StreamKind::Pattern));
    assert_eq!(channel.m3u8_url, channel.stream_url);
}

#[test]
fn test_embed_stream_has_no_m3u8_url() {
    let mut channel = star();
    channel.apply_stream(Some(StreamMatch::new(
        "https://player.example/embed/1",
        StreamKind::Iframe,
    )));

    assert!(channel.has_stream);
    assert_eq!(channel.m3u8_url, None);
}

#[test]
fn test_generated_stream_is_marked() {
    let mut channel = star();
    channel.apply_stream(Some(StreamMatch::new(
        "https://streamcrichd.com/update/star.php",
        StreamKind::Generated,
    )));

    assert_eq!(channel.status, ChannelStatus::Generated);
    assert!(channel.has_stream);
}

#[test]
fn test_error_clears_the_stream() {
    let mut channel = star();
    channel.apply_stream(Some(StreamMatch::new(
        "https://cdn.example/a.m3u8",
        StreamKind::Video,
    )));
    channel.apply_error("timed out");

    assert_eq!(channel.status, ChannelStatus::Error);
    assert!(!channel.has_stream);
    assert_eq!(channel.stream_url, None);
    assert_eq!(channel.m3u8_url, None);
    assert_eq!(channel.error.as_deref(), Some("timed out"));
}

#[test]
fn test_error_field_only_serialized_when_set() {
    let mut channel = star();
    let json = serde_json::to_value(&channel).unwrap();
    assert!(json.get("error").is_none());
    assert_eq!(json["hasStream"], false);
    assert_eq!(json["source"], "live");

    channel.apply_error("boom");
    let json = serde_json::to_value(&channel).unwrap();
    assert_eq!(json["error"], "boom");
    assert_eq!(json["status"], "error");
}

#[test]
fn test_fallback_rows_are_consistent() {
    let channels = fallback_channels();

    assert!(!channels.is_empty());
    for channel in &channels {
        assert_eq!(channel.source, DataSource::Fallback);
        assert!(!channel.title.is_empty());
        assert!(!channel.category.is_empty());
        assert_eq!(channel.has_stream, channel.stream_url.is_some());
        if channel.has_stream {
            assert_eq!(channel.status, ChannelStatus::Success);
        } else {
            assert_eq!(channel.status, ChannelStatus::NoStream);
        }
    }
    assert!(channels.iter().any(|c| !c.has_stream));
}
