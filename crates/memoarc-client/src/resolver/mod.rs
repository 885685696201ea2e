//! Link resolution: turns whatever the user pasted into an absolute URL,
//! decides which content category it belongs to, and derives the URLs a card
//! needs to show it.
//!
//! Every function here fails closed. Input that does not parse as a URL
//! yields the original string, `None` or an empty string, never an error.

use url::Url;

use crate::models::ContentType;

pub mod document;
pub mod youtube;

pub use document::to_doc_embed;
pub use youtube::{to_youtube_embed, with_autoplay, youtube_id, youtube_thumbnail};

const FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons";

/// Prefix `https://` unless the input already has an http(s) scheme.
///
/// Empty input is returned as-is.
pub fn normalize_url(raw: &str) -> String {
    if raw.is_empty() || has_http_scheme(raw) {
        return raw.to_string();
    }
    format!("https://{raw}")
}

fn has_http_scheme(raw: &str) -> bool {
    let head = raw.get(..8).unwrap_or(raw).to_ascii_lowercase();
    head.starts_with("http://") || head.starts_with("https://")
}

pub(crate) fn parse(url: &str) -> Option<Url> {
    Url::parse(url).ok()
}

/// Classify a normalized URL by host and path.
///
/// Returns `None` for plain links and for input that does not parse.
pub fn detect_type_from_link(url: &str) -> Option<ContentType> {
    let parsed = parse(url)?;
    let host = parsed.host_str().unwrap_or_default().to_lowercase();

    if host.contains("youtube.com") || host.contains("youtu.be") {
        return Some(ContentType::Youtube);
    }
    if host.contains("twitter.com") || host.contains("x.com") {
        return Some(ContentType::Twitter);
    }

    let path = parsed.path().to_lowercase();
    if path.ends_with(".pdf") || host.contains("docs.google.com") {
        return Some(ContentType::Document);
    }

    None
}

/// Category used for display, defaulting to [`ContentType::Link`].
pub fn effective_type(url: &str) -> ContentType {
    detect_type_from_link(url).unwrap_or(ContentType::Link)
}

/// Hostname without a leading `www.`.
pub fn domain_of(url: &str) -> String {
    match parse(url) {
        Some(parsed) => {
            let host = parsed.host_str().unwrap_or_default();
            host.strip_prefix("www.").unwrap_or(host).to_string()
        }
        None => url.to_string(),
    }
}

pub fn favicon_for(url: &str) -> String {
    match parse(url) {
        Some(parsed) => format!(
            "{FAVICON_SERVICE}?domain={}&sz=64",
            parsed.host_str().unwrap_or_default()
        ),
        None => String::new(),
    }
}

/// Rewrite an `x.com` host to `twitter.com`, which the tweet widget expects.
pub fn normalize_twitter_url(url: &str) -> String {
    let Some(mut parsed) = parse(url) else {
        return url.to_string();
    };

    if !parsed.host_str().unwrap_or_default().contains("x.com") {
        return url.to_string();
    }

    match parsed.set_host(Some("twitter.com")) {
        Ok(()) => parsed.to_string(),
        Err(_) => url.to_string(),
    }
}
