use super::parse;

const EMBED_BASE: &str = "https://www.youtube.com/embed/";
const THUMBNAIL_BASE: &str = "https://img.youtube.com/vi/";

/// Embeddable player URL for a YouTube link.
///
/// Handles `youtu.be/<id>`, `/shorts/<id>`, `/embed/<id>` (returned as-is)
/// and `watch?v=<id>`. Anything else gets its first `/watch` swapped for
/// `/embed`.
pub fn to_youtube_embed(url: &str) -> String {
    let Some(parsed) = parse(url) else {
        return url.to_string();
    };

    let path = parsed.path();
    if parsed.host_str().unwrap_or_default().contains("youtu.be") {
        let id = path.replacen('/', "", 1);
        return format!("{EMBED_BASE}{id}");
    }

    if let Some(id) = shorts_id(path) {
        return format!("{EMBED_BASE}{id}");
    }

    if path.starts_with("/embed/") {
        return url.to_string();
    }

    if let Some(id) = watch_id(&parsed) {
        return format!("{EMBED_BASE}{id}");
    }

    url.replacen("/watch", "/embed", 1)
}

/// Video id for the same URL shapes [`to_youtube_embed`] understands.
pub fn youtube_id(url: &str) -> Option<String> {
    let parsed = parse(url)?;
    let path = parsed.path();

    if parsed.host_str().unwrap_or_default().contains("youtu.be") {
        let id = path.replacen('/', "", 1);
        return (!id.is_empty()).then_some(id);
    }
    if path.starts_with("/shorts/") {
        return shorts_id(path).map(str::to_string);
    }
    if let Some(rest) = path.strip_prefix("/embed/") {
        return first_segment(rest).map(str::to_string);
    }

    watch_id(&parsed)
}

/// Thumbnail image URL, or an empty string when no id can be extracted.
pub fn youtube_thumbnail(url: &str) -> String {
    match youtube_id(url) {
        Some(id) => format!("{THUMBNAIL_BASE}{id}/hqdefault.jpg"),
        None => String::new(),
    }
}

/// Append `autoplay=1` to an embed URL.
pub fn with_autoplay(embed: &str) -> String {
    let separator = if embed.contains('?') { '&' } else { '?' };
    format!("{embed}{separator}autoplay=1")
}

fn shorts_id(path: &str) -> Option<&str> {
    path.strip_prefix("/shorts/").and_then(first_segment)
}

fn first_segment(rest: &str) -> Option<&str> {
    rest.split('/').next().filter(|segment| !segment.is_empty())
}

fn watch_id(parsed: &url::Url) -> Option<String> {
    parsed
        .query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.into_owned())
        .filter(|id| !id.is_empty())
}
