// all the html digging lives here so the services only deal with fetching. everything in here is
// sync on purpose, `scraper::Html` isn't Send so it can't be held across an await anyways
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::server::dtos::{ChannelDto, DataSource, StreamKind, StreamMatch};
use crate::server::utils::url_utils::absolutize;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("Static selector should parse")
}

/// tried in order, the first one that matches anything is the one used
static DIRECTORY_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    [
        ".channel-list .channel a",
        ".channel a",
        "a.channel",
        ".channels a",
    ]
    .into_iter()
    .map(selector)
    .collect()
});

static NAME_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    [".channel-name", ".name", "h3", "h4", "span", "p"]
        .into_iter()
        .map(selector)
        .collect()
});

static IMG: Lazy<Selector> = Lazy::new(|| selector("img"));
static IFRAME: Lazy<Selector> = Lazy::new(|| selector("iframe"));
static VIDEO_SOURCES: Lazy<Selector> = Lazy::new(|| selector("video, source"));
static SCRIPT: Lazy<Selector> = Lazy::new(|| selector("script"));
static META: Lazy<Selector> = Lazy::new(|| selector("meta[http-equiv]"));

/// an iframe src has to contain one of these to count as a player
pub const IFRAME_KEYWORDS: &[&str] = &[
    "stream", "crichd", "player", "embed", "live", "channel", "tv",
];

static M3U8_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"https?://[^\s"'<>\\]+?\.m3u8[^\s"'<>\\]*"#).expect("Static regex should parse")
});

/// `file: "..."`, `source = '...'`, `src:"..."` style player configs
static PLAYER_SOURCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\b(?:file|source|src)\s*[:=]\s*["']([^"']+)["']"#)
        .expect("Static regex should parse")
});

static CRICHD_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"https?://[^\s"'<>\\]*streamcrichd[^\s"'<>\\]*"#)
        .expect("Static regex should parse")
});

static PHP_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"https?://[^\s"'<>\\]+?\.php[^\s"'<>\\]*"#).expect("Static regex should parse")
});

type Heuristic = fn(&Html, &str, &str) -> Option<StreamMatch>;

/// evaluated in order, first hit wins and the rest are never consulted
const HEURISTICS: &[(&str, Heuristic)] = &[
    ("iframe", find_iframe_stream),
    ("video", find_video_stream),
    ("script", find_script_stream),
    ("meta", find_meta_refresh),
    ("pattern", find_pattern_stream),
];

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_text(element: &ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

// js likes escaping slashes in string literals
fn unescape_js(text: &str) -> String {
    text.replace("\\/", "/")
}

/// pulls channel stubs out of the directory page in document order
///
/// entries without a usable title or href are skipped, duplicates are kept (deduping is up to
/// the caller)
pub fn parse_directory(html: &str, base_url: &str) -> Vec<ChannelDto> {
    let document = Html::parse_document(html);

    let Some((selector_index, anchors)) = DIRECTORY_SELECTORS
        .iter()
        .enumerate()
        .map(|(i, sel)| (i, document.select(sel).collect::<Vec<_>>()))
        .find(|(_, anchors)| !anchors.is_empty())
    else {
        debug!("no directory selector matched");
        return Vec::new();
    };

    debug!(
        "directory selector #{} matched {} anchors",
        selector_index,
        anchors.len()
    );

    anchors
        .into_iter()
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            let url = absolutize(base_url, href)?;
            let title = anchor_title(&anchor)?;

            let icon = anchor
                .select(&IMG)
                .next()
                .and_then(|img| img.value().attr("src").or(img.value().attr("data-src")))
                .and_then(|src| absolutize(base_url, src))
                .unwrap_or_default();

            Some(ChannelDto::pending(title, icon, url, DataSource::Live))
        })
        .collect()
}

fn anchor_title(anchor: &ElementRef) -> Option<String> {
    NAME_SELECTORS
        .iter()
        .find_map(|sel| {
            anchor
                .select(sel)
                .map(|el| element_text(&el))
                .find(|text| !text.is_empty())
        })
        .or_else(|| {
            anchor
                .value()
                .attr("title")
                .map(collapse_whitespace)
                .filter(|t| !t.is_empty())
        })
        .or_else(|| Some(element_text(anchor)).filter(|t| !t.is_empty()))
        .or_else(|| {
            anchor
                .select(&IMG)
                .next()
                .and_then(|img| img.value().attr("alt"))
                .map(collapse_whitespace)
                .filter(|t| !t.is_empty())
        })
}

/// runs every heuristic against a channel page and returns the first match
pub fn extract_stream(html: &str, page_url: &str) -> Option<StreamMatch> {
    let document = Html::parse_document(html);

    HEURISTICS.iter().find_map(|(name, heuristic)| {
        let found = heuristic(&document, html, page_url);
        match &found {
            Some(m) => debug!("{} heuristic matched {} on {}", name, m.url, page_url),
            None => debug!("{} heuristic found nothing on {}", name, page_url),
        }
        found
    })
}

pub fn find_iframe_stream(document: &Html, _html: &str, page_url: &str) -> Option<StreamMatch> {
    document.select(&IFRAME).find_map(|iframe| {
        let src = iframe
            .value()
            .attr("src")
            .or(iframe.value().attr("data-src"))?;
        let lower = src.to_ascii_lowercase();

        if !IFRAME_KEYWORDS.iter().any(|k| lower.contains(k)) {
            return None;
        }

        absolutize(page_url, src).map(|url| StreamMatch::new(url, StreamKind::Iframe))
    })
}

pub fn find_video_stream(document: &Html, _html: &str, page_url: &str) -> Option<StreamMatch> {
    document.select(&VIDEO_SOURCES).find_map(|el| {
        let src = el.value().attr("src")?;
        let lower = src.to_ascii_lowercase();

        if !(lower.contains(".m3u8") || lower.contains(".mp4")) {
            return None;
        }

        absolutize(page_url, src).map(|url| StreamMatch::new(url, StreamKind::Video))
    })
}

pub fn find_script_stream(document: &Html, _html: &str, page_url: &str) -> Option<StreamMatch> {
    let inline = document
        .select(&SCRIPT)
        .filter(|script| script.value().attr("src").is_none())
        .map(|script| script.text().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n");

    if inline.trim().is_empty() {
        return None;
    }

    let inline = unescape_js(&inline);

    let candidate = M3U8_URL
        .find(&inline)
        .map(|m| m.as_str().to_string())
        .or_else(|| {
            PLAYER_SOURCE
                .captures_iter(&inline)
                .filter_map(|c| c.get(1))
                .map(|m| m.as_str().trim())
                .find(|src| is_player_source(src))
                .map(str::to_string)
        })
        .or_else(|| CRICHD_URL.find(&inline).map(|m| m.as_str().to_string()))
        .or_else(|| PHP_URL.find(&inline).map(|m| m.as_str().to_string()))?;

    absolutize(page_url, &candidate).map(|url| StreamMatch::new(url, StreamKind::Script))
}

// player configs also point at scripts and stylesheets, those aren't streams
fn is_player_source(src: &str) -> bool {
    let lower = src.to_ascii_lowercase();
    let path = lower.split(['?', '#']).next().unwrap_or("");

    !src.is_empty()
        && (lower.starts_with("http") || lower.starts_with('/') || lower.starts_with("./"))
        && !path.ends_with(".js")
        && !path.ends_with(".css")
        && !path.ends_with(".png")
        && !path.ends_with(".jpg")
}

pub fn find_meta_refresh(document: &Html, _html: &str, page_url: &str) -> Option<StreamMatch> {
    document
        .select(&META)
        .filter(|meta| {
            meta.value()
                .attr("http-equiv")
                .is_some_and(|v| v.eq_ignore_ascii_case("refresh"))
        })
        .find_map(|meta| {
            let content = meta.value().attr("content")?;
            let target = refresh_target(content)?;
            absolutize(page_url, target).map(|url| StreamMatch::new(url, StreamKind::Meta))
        })
}

/// `"5; url=https://x"` -> `https://x`
pub fn refresh_target(content: &str) -> Option<&str> {
    content.split(';').find_map(|part| {
        let part = part.trim();
        let (key, value) = part.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("url") {
            return None;
        }
        let value = value.trim().trim_matches(|c: char| c == '\'' || c == '"').trim();
        (!value.is_empty()).then_some(value)
    })
}

pub fn find_pattern_stream(_document: &Html, html: &str, page_url: &str) -> Option<StreamMatch> {
    let unescaped = unescape_js(html);
    let found = M3U8_URL.find(&unescaped)?;
    absolutize(page_url, found.as_str()).map(|url| StreamMatch::new(url, StreamKind::Pattern))
}
