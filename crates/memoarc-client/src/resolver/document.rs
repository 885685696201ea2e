use super::parse;

const GOOGLE_DOCS_HOST: &str = "docs.google.com";
const VIEWER_BASE: &str = "https://docs.google.com/gview?embedded=1&url=";

/// Marks `urlencoding` escapes but a URI component leaves as-is.
const COMPONENT_MARKS: [(&str, &str); 5] = [
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

/// Frame-able URL for a document link.
///
/// PDFs are framed directly, Google Docs are switched to their `/preview`
/// view, and everything else goes through the hosted document viewer.
pub fn to_doc_embed(url: &str) -> String {
    let Some(parsed) = parse(url) else {
        return url.to_string();
    };

    let path = parsed.path();
    if path.to_lowercase().ends_with(".pdf") {
        return url.to_string();
    }

    if parsed.host_str().unwrap_or_default().contains(GOOGLE_DOCS_HOST) {
        if path.contains("/edit") {
            return url.replacen("/edit", "/preview", 1);
        }
        if !path.contains("/preview") {
            return if url.ends_with('/') {
                format!("{url}preview")
            } else {
                format!("{url}/preview")
            };
        }
        return url.to_string();
    }

    format!("{VIEWER_BASE}{}", encode_component(url))
}

fn encode_component(value: &str) -> String {
    COMPONENT_MARKS
        .iter()
        .fold(urlencoding::encode(value).into_owned(), |encoded, (escaped, mark)| {
            encoded.replace(escaped, mark)
        })
}
