use std::sync::Arc;

use portal::server::dtos::{ChannelDto, ChannelStatus, DataSource, StreamKind, StreamMatch};
use portal::server::error::ScrapeError;
use portal::server::services::directory_services::MockDirectoryServiceTrait;
use portal::server::services::extraction_services::{
    ExtractionService, ExtractionServiceTrait, MockExtractionServiceTrait,
};
use portal::server::services::matches_services::{
    MatchesService, MatchesServiceTrait, dedupe_channels,
};
use portal::server::utils::fid_utils::STREAM_TEMPLATES;
use portal::server::utils::http_utils::build_scrape_client;
use portal::{AppConfig, ExtractionMode};
use tokio::time::{Duration, Instant};

fn config() -> AppConfig {
    AppConfig {
        page_delay_ms: 0,
        ..Default::default()
    }
}

fn channel(title: &str, path: &str) -> ChannelDto {
    ChannelDto::pending(
        title,
        "",
        format!("https://profamouslife.com/{}", path),
        DataSource::Live,
    )
}

fn directory_with(channels: Vec<ChannelDto>) -> MockDirectoryServiceTrait {
    let mut directory = MockDirectoryServiceTrait::new();
    directory
        .expect_fetch_channels()
        .returning(move || Ok(channels.clone()));
    directory
}

fn service(
    directory: MockDirectoryServiceTrait,
    extraction: MockExtractionServiceTrait,
    config: AppConfig,
) -> MatchesService {
    MatchesService::new(Arc::new(directory), Arc::new(extraction), Arc::new(config))
}

// a -> stream, b -> nothing, c -> page error
fn mixed_extraction() -> MockExtractionServiceTrait {
    let mut extraction = MockExtractionServiceTrait::new();
    extraction.expect_extract().returning(|url| {
        if url.ends_with("a.php") {
            Ok(Some(StreamMatch::new(
                "https://cdn.example/a/index.m3u8",
                StreamKind::Video,
            )))
        } else if url.ends_with("b.php") {
            Ok(None)
        } else {
            Err(ScrapeError::Status {
                url: url.to_string(),
                status: 500,
            })
        }
    });
    extraction.expect_generate().returning(|_, title| {
        Some(StreamMatch::new(
            format!("https://guess.example/{}.php", title.to_lowercase()),
            StreamKind::Generated,
        ))
    });
    extraction
}

fn three_channels() -> Vec<ChannelDto> {
    vec![
        channel("Star Sports 1", "a.php"),
        channel("Willow Cricket", "b.php"),
        channel("PTV Sports", "c.php"),
    ]
}

#[tokio::test]
async fn test_directory_failure_serves_fallback() {
    let mut directory = MockDirectoryServiceTrait::new();
    directory.expect_fetch_channels().returning(|| {
        Err(ScrapeError::Status {
            url: "https://profamouslife.com".to_string(),
            status: 503,
        })
    });
    let mut extraction = MockExtractionServiceTrait::new();
    extraction.expect_extract().never();

    let response = service(directory, extraction, config()).get_matches().await;

    assert!(response.success);
    assert_eq!(response.source, DataSource::Fallback);
    assert_eq!(response.total, response.data.len());
    assert!(!response.data.is_empty());
    assert!(response.error.as_deref().unwrap_or_default().contains("503"));
    assert!(response.data.iter().all(|c| c.source == DataSource::Fallback));
}

#[tokio::test]
async fn test_empty_directory_serves_fallback() {
    let mut extraction = MockExtractionServiceTrait::new();
    extraction.expect_extract().never();

    let response = service(directory_with(vec![]), extraction, config())
        .get_matches()
        .await;

    assert_eq!(response.source, DataSource::Fallback);
    assert!(
        response
            .error
            .as_deref()
            .unwrap_or_default()
            .contains("no channels found")
    );
}

#[tokio::test]
async fn test_sequential_records_every_outcome() {
    let response = service(directory_with(three_channels()), mixed_extraction(), config())
        .get_matches()
        .await;

    assert!(response.success);
    assert_eq!(response.source, DataSource::Live);
    assert_eq!(response.error, None);
    assert_eq!(response.total, 3);

    let star = &response.data[0];
    assert_eq!(star.title, "Star Sports 1");
    assert_eq!(star.status, ChannelStatus::Success);
    assert!(star.has_stream);
    assert_eq!(star.stream_type, Some(StreamKind::Video));
    assert_eq!(
        star.m3u8_url.as_deref(),
        Some("https://cdn.example/a/index.m3u8")
    );
    assert_eq!(star.category, "India");

    let willow = &response.data[1];
    assert_eq!(willow.status, ChannelStatus::NoStream);
    assert!(!willow.has_stream);
    assert_eq!(willow.stream_url, None);

    let ptv = &response.data[2];
    assert_eq!(ptv.status, ChannelStatus::Error);
    assert!(!ptv.has_stream);
    assert!(ptv.error.as_deref().unwrap_or_default().contains("500"));
    assert_eq!(ptv.category, "Pakistan");

    assert_eq!(response.message, "found 3 channels, 1 with a stream");
}

#[tokio::test]
async fn test_concurrent_keeps_directory_order() {
    let config = AppConfig {
        extraction_mode: ExtractionMode::Concurrent,
        max_concurrency: 2,
        ..config()
    };

    let response = service(directory_with(three_channels()), mixed_extraction(), config)
        .get_matches()
        .await;

    let statuses: Vec<ChannelStatus> = response.data.iter().map(|c| c.status).collect();
    assert_eq!(
        statuses,
        vec![
            ChannelStatus::Success,
            ChannelStatus::NoStream,
            ChannelStatus::Error
        ]
    );
}

#[tokio::test]
async fn test_guessing_only_fills_pages_without_a_stream() {
    let config = AppConfig {
        guess_stream_urls: true,
        ..config()
    };

    let response = service(directory_with(three_channels()), mixed_extraction(), config)
        .get_matches()
        .await;

    assert_eq!(response.data[0].status, ChannelStatus::Success);

    let willow = &response.data[1];
    assert_eq!(willow.status, ChannelStatus::Generated);
    assert_eq!(willow.stream_type, Some(StreamKind::Generated));
    assert!(willow.has_stream);

    // a page that errored keeps its error
    assert_eq!(response.data[2].status, ChannelStatus::Error);
}

#[tokio::test]
async fn test_skip_mode_never_visits_pages() {
    let config = AppConfig {
        extraction_mode: ExtractionMode::Skip,
        ..config()
    };
    let mut extraction = MockExtractionServiceTrait::new();
    extraction.expect_extract().never();
    extraction.expect_generate().never();

    let response = service(directory_with(three_channels()), extraction, config)
        .get_matches()
        .await;

    assert_eq!(response.total, 3);
    assert!(
        response
            .data
            .iter()
            .all(|c| c.status == ChannelStatus::Pending && !c.has_stream)
    );
}

#[tokio::test]
async fn test_channel_limit_and_dedupe() {
    let mut channels = three_channels();
    channels.insert(1, channel("Star  Sports 1", "a-mirror.php"));

    let config = AppConfig {
        max_channels: 2,
        extraction_mode: ExtractionMode::Skip,
        ..config()
    };

    let response = service(
        directory_with(channels),
        MockExtractionServiceTrait::new(),
        config,
    )
    .get_matches()
    .await;

    let titles: Vec<&str> = response.data.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Star Sports 1", "Willow Cricket"]);
}

#[tokio::test]
async fn test_duplicates_kept_when_dedupe_is_off() {
    let mut channels = three_channels();
    channels.push(channel("Star Sports 1", "a-mirror.php"));

    let config = AppConfig {
        dedupe_channels: false,
        extraction_mode: ExtractionMode::Skip,
        ..config()
    };

    let response = service(
        directory_with(channels),
        MockExtractionServiceTrait::new(),
        config,
    )
    .get_matches()
    .await;

    assert_eq!(response.total, 4);
}

#[test]
fn test_dedupe_keeps_first_occurrence() {
    let deduped = dedupe_channels(vec![
        channel("Sky Sports Cricket", "first.php"),
        channel("sky sports cricket", "second.php"),
        channel("Fox Cricket", "fox.php"),
    ]);

    assert_eq!(deduped.len(), 2);
    assert_eq!(deduped[0].url, "https://profamouslife.com/first.php");
}

fn real_extraction() -> ExtractionService {
    ExtractionService::new(
        build_scrape_client("portal-tests", 5),
        "https://profamouslife.com",
    )
}

#[test]
fn test_generated_url_uses_the_first_template() {
    let extraction = real_extraction();

    let guessed = extraction
        .generate("https://profamouslife.com/channel.php?fid=willow", "Willow Cricket")
        .expect("fid should be derived");

    assert_eq!(guessed.kind, StreamKind::Generated);
    assert_eq!(guessed.url, STREAM_TEMPLATES[0].replace("{fid}", "willow"));
}

#[tokio::test]
async fn test_skip_mode_with_guessing_marks_channels_generated() {
    let config = AppConfig {
        extraction_mode: ExtractionMode::Skip,
        guess_stream_urls: true,
        ..config()
    };

    let matches = MatchesService::new(
        Arc::new(directory_with(three_channels())),
        Arc::new(real_extraction()),
        Arc::new(config),
    );
    let response = matches.get_matches().await;

    assert_eq!(response.total, 3);
    for channel in &response.data {
        assert_eq!(channel.status, ChannelStatus::Generated);
        assert_eq!(channel.stream_type, Some(StreamKind::Generated));
        assert!(channel.has_stream);
    }
    assert_eq!(
        response.data[0].stream_url.as_deref(),
        Some("https://streamcrichd.com/update/a.php")
    );
}

#[tokio::test(start_paused = true)]
async fn test_sequential_mode_waits_between_pages() {
    let config = AppConfig {
        page_delay_ms: 1500,
        ..config()
    };
    let mut extraction = MockExtractionServiceTrait::new();
    extraction.expect_extract().times(3).returning(|_| Ok(None));

    let started = Instant::now();
    let response = service(directory_with(three_channels()), extraction, config)
        .get_matches()
        .await;

    assert_eq!(response.total, 3);
    // no wait before the first page
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(3000), "{:?}", elapsed);
    assert!(elapsed < Duration::from_millis(4500), "{:?}", elapsed);
}
