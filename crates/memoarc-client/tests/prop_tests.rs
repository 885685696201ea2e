use memoarc_client::ContentType;
use memoarc_client::render::{CardBody, LinkStatus, PreviewState, RenderContext, TweetStatus, renderer_for};
use memoarc_client::resolver::{
    detect_type_from_link, domain_of, effective_type, normalize_url, to_doc_embed,
    to_youtube_embed, youtube_id, youtube_thumbnail,
};
use proptest::prelude::*;

// Hosts that never match any of the video, tweet or document rules
prop_compose! {
    fn arb_plain_host()(
        name in "[a-z0-9]{3,10}",
        tld in prop::sample::select(vec!["org", "net", "io", "dev"]),
    ) -> String {
        format!("{name}.{tld}")
    }
}

prop_compose! {
    fn arb_video_id()(id in "[A-Za-z0-9_-]{6,11}") -> String {
        id
    }
}

prop_compose! {
    fn arb_youtube_link()(
        id in arb_video_id(),
        shape in 0..4usize,
        extra in prop::option::of("[a-z]{2,5}=[a-z0-9]{1,5}"),
    ) -> (String, String) {
        let link = match shape {
            0 => format!("https://youtu.be/{id}"),
            1 => format!("https://www.youtube.com/shorts/{id}"),
            2 => format!("https://www.youtube.com/embed/{id}"),
            _ => match &extra {
                Some(extra) => format!("https://www.youtube.com/watch?{extra}&v={id}"),
                None => format!("https://www.youtube.com/watch?v={id}"),
            },
        };
        (link, id)
    }
}

proptest! {
    #[test]
    fn youtube_shapes_share_one_embed((link, id) in arb_youtube_link()) {
        prop_assert_eq!(to_youtube_embed(&link), format!("https://www.youtube.com/embed/{id}"));
        prop_assert_eq!(youtube_id(&link), Some(id.clone()));
        prop_assert_eq!(
            youtube_thumbnail(&link),
            format!("https://img.youtube.com/vi/{id}/hqdefault.jpg")
        );
        prop_assert_eq!(effective_type(&link), ContentType::Youtube);
    }

    #[test]
    fn normalize_is_idempotent(raw in "[a-zA-Z0-9./:?=&-]{0,40}") {
        let once = normalize_url(&raw);
        prop_assert_eq!(normalize_url(&once), once.clone());
        if !raw.is_empty() {
            let lower = once.to_ascii_lowercase();
            prop_assert!(lower.starts_with("http://") || lower.starts_with("https://"));
        }
    }

    #[test]
    fn pdf_paths_are_documents(
        host in arb_plain_host(),
        path in "[a-z0-9]{1,12}",
        upper in prop::bool::ANY,
    ) {
        let ext = if upper { "PDF" } else { "pdf" };
        let link = normalize_url(&format!("{host}/{path}.{ext}"));
        prop_assert_eq!(detect_type_from_link(&link), Some(ContentType::Document));
        prop_assert_eq!(to_doc_embed(&link), link.clone());
    }

    #[test]
    fn plain_hosts_are_links(host in arb_plain_host(), path in "[a-z0-9/]{0,20}") {
        let link = normalize_url(&format!("www.{host}/{path}"));
        prop_assert_eq!(detect_type_from_link(&link), None);
        prop_assert_eq!(domain_of(&link), host);
    }

    #[test]
    fn arbitrary_input_never_panics(raw in any::<String>()) {
        let url = normalize_url(&raw);
        let kind = effective_type(&url);

        let thumbnail = youtube_thumbnail(&url);
        prop_assert!(thumbnail.is_empty() || thumbnail.starts_with("https://img.youtube.com/vi/"));
        let _ = to_youtube_embed(&url);
        let _ = to_doc_embed(&url);

        let preview = PreviewState::Idle;
        let ctx = RenderContext {
            title: "",
            url: &url,
            preview: &preview,
            tweet: TweetStatus::Pending,
            playing: false,
        };
        let body = renderer_for(kind).render(&ctx);
        if let CardBody::PlainLink { status, .. } = body {
            prop_assert_eq!(status, LinkStatus::Idle);
        }
    }
}
