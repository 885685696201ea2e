//! Card rendering, one [`ContentRenderer`] per content category.

use std::fmt;

use serde::Serialize;

use crate::models::{ContentType, LinkPreviewMetadata};
use crate::resolver::{
    domain_of, favicon_for, normalize_twitter_url, to_doc_embed, to_youtube_embed, with_autoplay,
    youtube_thumbnail,
};

/// Preview fetch state of a single card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PreviewState {
    #[default]
    Idle,
    Loading,
    Loaded(LinkPreviewMetadata),
    Failed(String),
}

impl PreviewState {
    pub fn metadata(&self) -> Option<&LinkPreviewMetadata> {
        match self {
            PreviewState::Loaded(metadata) => Some(metadata),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TweetStatus {
    /// Widget not probed yet. The fallback link is already visible.
    #[default]
    Pending,
    Embedded,
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    Idle,
    Loading,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewLink {
    pub href: String,
    pub favicon: String,
    pub title: String,
    pub site: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "body", rename_all = "snake_case")]
pub enum CardBody {
    Video {
        thumbnail: Option<String>,
        player: Option<String>,
    },
    Tweet {
        href: String,
        status: TweetStatus,
    },
    Document {
        frame: String,
        preview: Option<PreviewLink>,
    },
    RichLink {
        link: PreviewLink,
        image: Option<String>,
        description: Option<String>,
    },
    PlainLink {
        href: String,
        favicon: String,
        title: String,
        domain: String,
        status: LinkStatus,
    },
}

/// Fully resolved card, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub key: String,
    pub title: String,
    pub href: String,
    pub kind: ContentType,
    pub stored_kind: ContentType,
    #[serde(flatten)]
    pub body: CardBody,
}

pub struct RenderContext<'a> {
    pub title: &'a str,
    /// Normalized link.
    pub url: &'a str,
    pub preview: &'a PreviewState,
    pub tweet: TweetStatus,
    pub playing: bool,
}

pub trait ContentRenderer: Send + Sync {
    fn kind(&self) -> ContentType;

    /// URL suitable for an inline frame, if the category has one.
    fn resolve_embed(&self, url: &str) -> Option<String>;

    fn resolve_thumbnail(&self, ctx: &RenderContext<'_>) -> Option<String>;

    fn render(&self, ctx: &RenderContext<'_>) -> CardBody;
}

pub fn renderer_for(kind: ContentType) -> &'static dyn ContentRenderer {
    match kind {
        ContentType::Youtube => &YouTubeRenderer,
        ContentType::Twitter => &TweetRenderer,
        ContentType::Document => &DocumentRenderer,
        ContentType::Link => &LinkRenderer,
    }
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

fn preview_link(preview: &LinkPreviewMetadata, fallback_title: &str) -> PreviewLink {
    PreviewLink {
        href: preview.url.clone(),
        favicon: non_empty(&preview.favicon)
            .map(str::to_string)
            .unwrap_or_else(|| favicon_for(&preview.url)),
        title: non_empty(&preview.title)
            .unwrap_or(fallback_title)
            .to_string(),
        site: non_empty(&preview.site_name)
            .unwrap_or(preview.domain.as_str())
            .to_string(),
    }
}

pub struct YouTubeRenderer;

impl ContentRenderer for YouTubeRenderer {
    fn kind(&self) -> ContentType {
        ContentType::Youtube
    }

    fn resolve_embed(&self, url: &str) -> Option<String> {
        Some(to_youtube_embed(url))
    }

    fn resolve_thumbnail(&self, ctx: &RenderContext<'_>) -> Option<String> {
        non_empty(&youtube_thumbnail(ctx.url)).map(str::to_string)
    }

    fn render(&self, ctx: &RenderContext<'_>) -> CardBody {
        let player = if ctx.playing {
            self.resolve_embed(ctx.url).map(|embed| with_autoplay(&embed))
        } else {
            None
        };

        CardBody::Video {
            thumbnail: self.resolve_thumbnail(ctx),
            player,
        }
    }
}

pub struct TweetRenderer;

impl ContentRenderer for TweetRenderer {
    fn kind(&self) -> ContentType {
        ContentType::Twitter
    }

    fn resolve_embed(&self, url: &str) -> Option<String> {
        Some(normalize_twitter_url(url))
    }

    fn resolve_thumbnail(&self, _ctx: &RenderContext<'_>) -> Option<String> {
        None
    }

    fn render(&self, ctx: &RenderContext<'_>) -> CardBody {
        CardBody::Tweet {
            href: normalize_twitter_url(ctx.url),
            status: ctx.tweet,
        }
    }
}

pub struct DocumentRenderer;

impl ContentRenderer for DocumentRenderer {
    fn kind(&self) -> ContentType {
        ContentType::Document
    }

    fn resolve_embed(&self, url: &str) -> Option<String> {
        Some(to_doc_embed(url))
    }

    fn resolve_thumbnail(&self, ctx: &RenderContext<'_>) -> Option<String> {
        ctx.preview
            .metadata()
            .and_then(|preview| non_empty(&preview.image))
            .map(str::to_string)
    }

    fn render(&self, ctx: &RenderContext<'_>) -> CardBody {
        CardBody::Document {
            frame: to_doc_embed(ctx.url),
            preview: ctx
                .preview
                .metadata()
                .map(|preview| preview_link(preview, ctx.title)),
        }
    }
}

pub struct LinkRenderer;

impl ContentRenderer for LinkRenderer {
    fn kind(&self) -> ContentType {
        ContentType::Link
    }

    fn resolve_embed(&self, _url: &str) -> Option<String> {
        None
    }

    fn resolve_thumbnail(&self, ctx: &RenderContext<'_>) -> Option<String> {
        ctx.preview
            .metadata()
            .and_then(|preview| non_empty(&preview.image))
            .map(str::to_string)
    }

    fn render(&self, ctx: &RenderContext<'_>) -> CardBody {
        if let Some(preview) = ctx.preview.metadata() {
            return CardBody::RichLink {
                link: preview_link(preview, ctx.title),
                image: self.resolve_thumbnail(ctx),
                description: non_empty(&preview.description).map(str::to_string),
            };
        }

        let status = match ctx.preview {
            PreviewState::Loading => LinkStatus::Loading,
            PreviewState::Failed(_) => LinkStatus::Failed,
            _ => LinkStatus::Idle,
        };

        CardBody::PlainLink {
            href: ctx.url.to_string(),
            favicon: favicon_for(ctx.url),
            title: ctx.title.to_string(),
            domain: domain_of(ctx.url),
            status,
        }
    }
}

fn icon(kind: ContentType) -> &'static str {
    match kind {
        ContentType::Youtube => "[video]",
        ContentType::Twitter => "[tweet]",
        ContentType::Document => "[doc]",
        ContentType::Link => "[link]",
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", icon(self.kind), self.title)?;
        writeln!(f, "  {}", self.href)?;

        match &self.body {
            CardBody::Video { thumbnail, player } => match (player, thumbnail) {
                (Some(player), _) => writeln!(f, "  player: {player}"),
                (None, Some(thumbnail)) => writeln!(f, "  thumbnail: {thumbnail}"),
                (None, None) => writeln!(f, "  Thumbnail unavailable"),
            },
            CardBody::Tweet { href, status } => match status {
                TweetStatus::Embedded => writeln!(f, "  tweet: {href}"),
                TweetStatus::Pending => {
                    writeln!(f, "  Loading tweet…")?;
                    writeln!(f, "  Embed may be blocked. View on X: {href}")
                }
                TweetStatus::Blocked => writeln!(f, "  Embed may be blocked. View on X: {href}"),
            },
            CardBody::Document { frame, preview } => {
                writeln!(f, "  frame: {frame}")?;
                if let Some(preview) = preview {
                    writeln!(f, "  {} ({})", preview.title, preview.site)?;
                }
                Ok(())
            }
            CardBody::RichLink {
                link,
                image,
                description,
            } => {
                writeln!(f, "  {}", link.site)?;
                writeln!(f, "  {}", link.title)?;
                if let Some(description) = description {
                    writeln!(f, "  {description}")?;
                }
                if let Some(image) = image {
                    writeln!(f, "  image: {image}")?;
                }
                Ok(())
            }
            CardBody::PlainLink { domain, status, .. } => match status {
                LinkStatus::Loading => writeln!(f, "  {domain}  Loading…"),
                LinkStatus::Failed => writeln!(f, "  {domain}  Preview failed"),
                LinkStatus::Idle => writeln!(f, "  {domain}"),
            },
        }?;

        if self.kind != self.stored_kind {
            writeln!(f, "  (saved as {})", self.stored_kind)?;
        }
        Ok(())
    }
}
