use url::Url;

/// turns whatever the page had in an href/src into an absolute url
///
/// handles `./x`, `/x`, bare `x`, `//host/x` and already absolute urls. returns `None` for
/// empty values, fragments and `javascript:`/`data:` pseudo urls
pub fn absolutize(base: &str, raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("javascript:") || lower.starts_with("data:") || lower.starts_with("about:")
    {
        return None;
    }

    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Url::parse(trimmed).ok().map(String::from);
    }

    // same rules a browser uses, including `//host/x` picking up the base scheme
    Url::parse(base)
        .and_then(|base| base.join(trimmed))
        .ok()
        .map(String::from)
}

/// `https://host` for any url, used as the spoofed origin
pub fn origin_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .map(|u| u.origin().ascii_serialization())
        .filter(|o| o != "null")
}

pub fn is_http_url(url: &str) -> bool {
    Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}
