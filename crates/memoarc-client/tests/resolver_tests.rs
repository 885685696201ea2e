use memoarc_client::ContentType;
use memoarc_client::resolver::{
    detect_type_from_link, effective_type, normalize_twitter_url, normalize_url, to_doc_embed,
    to_youtube_embed, youtube_thumbnail,
};

#[test]
fn test_youtube_shapes_resolve_to_the_same_player() {
    let expected = "https://www.youtube.com/embed/dQw4w9WgXcQ";
    let shapes = [
        "https://youtu.be/dQw4w9WgXcQ",
        "https://www.youtube.com/shorts/dQw4w9WgXcQ",
        "https://www.youtube.com/embed/dQw4w9WgXcQ",
        "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
    ];

    for shape in shapes {
        assert_eq!(to_youtube_embed(shape), expected, "shape: {shape}");
        assert_eq!(
            youtube_thumbnail(shape),
            "https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg",
            "shape: {shape}"
        );
    }
}

#[test]
fn test_unrecognised_youtube_path_swaps_watch_segment() {
    assert_eq!(
        to_youtube_embed("https://www.youtube.com/watch"),
        "https://www.youtube.com/embed"
    );
    assert_eq!(youtube_thumbnail("https://www.youtube.com/channel/abc"), "");
}

#[test]
fn test_unparseable_links_pass_through() {
    assert_eq!(to_youtube_embed("not a url"), "not a url");
    assert_eq!(youtube_thumbnail("not a url"), "");
    assert_eq!(normalize_twitter_url("not a url"), "not a url");
    assert_eq!(detect_type_from_link("not a url"), None);
    assert_eq!(effective_type("not a url"), ContentType::Link);
}

#[test]
fn test_bare_hosts_are_classified_after_normalizing() {
    let cases = [
        ("youtu.be/abc", ContentType::Youtube),
        ("x.com/jack/status/20", ContentType::Twitter),
        ("docs.google.com/document/d/1", ContentType::Document),
        ("example.com/Report.PDF", ContentType::Document),
        ("example.com/blog", ContentType::Link),
    ];

    for (raw, kind) in cases {
        assert_eq!(effective_type(&normalize_url(raw)), kind, "link: {raw}");
    }
}

#[test]
fn test_host_substring_matching_is_loose() {
    assert_eq!(
        detect_type_from_link("https://notyoutube.com.evil.io/x"),
        Some(ContentType::Youtube)
    );
    assert_eq!(
        detect_type_from_link("https://netflix.com/title/1"),
        Some(ContentType::Twitter)
    );
}

#[test]
fn test_pdf_on_video_host_is_a_video() {
    assert_eq!(
        detect_type_from_link("https://youtube.com/manual.pdf"),
        Some(ContentType::Youtube)
    );
}

#[test]
fn test_x_links_are_rewritten_for_embedding() {
    assert_eq!(
        normalize_twitter_url("https://x.com/jack/status/20"),
        "https://twitter.com/jack/status/20"
    );
    assert_eq!(
        normalize_twitter_url("https://twitter.com/jack/status/20"),
        "https://twitter.com/jack/status/20"
    );
}

#[test]
fn test_doc_embed_encodes_the_source() {
    assert_eq!(
        to_doc_embed("https://example.com/a b.docx?x=1&y=2"),
        "https://docs.google.com/gview?embedded=1&url=https%3A%2F%2Fexample.com%2Fa%20b.docx%3Fx%3D1%26y%3D2"
    );
    assert_eq!(
        to_doc_embed("https://example.com/paper.pdf"),
        "https://example.com/paper.pdf"
    );
}
