use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api::PreviewSource;
use crate::models::{ContentItem, ContentType};
use crate::render::{Card, PreviewState, RenderContext, TweetStatus, renderer_for};
use crate::resolver::{effective_type, normalize_twitter_url, normalize_url};
use crate::social::{SocialEmbedLoader, TweetMount, WidgetHost};

/// Marks a card as mounted. Dropping it cancels every pending update the
/// card's background tasks would make.
#[derive(Debug)]
pub struct MountGuard {
    cancelled: Arc<AtomicBool>,
}

impl MountGuard {
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn handle(&self) -> MountHandle {
        MountHandle {
            cancelled: self.cancelled.clone(),
        }
    }
}

impl Default for MountGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MountGuard {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
pub struct MountHandle {
    cancelled: Arc<AtomicBool>,
}

impl MountHandle {
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Shared collaborators cards use for their background effects.
pub struct CardEffects<P, H> {
    pub previews: Arc<P>,
    pub social: Arc<SocialEmbedLoader<H>>,
}

impl<P, H> Clone for CardEffects<P, H> {
    fn clone(&self) -> Self {
        Self {
            previews: self.previews.clone(),
            social: self.social.clone(),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// One saved item on screen, owning its own preview and embed state.
pub struct CardView {
    item: ContentItem,
    normalized: String,
    effective: ContentType,
    preview: Arc<Mutex<PreviewState>>,
    tweet: Arc<Mutex<TweetStatus>>,
    playing: bool,
    tasks: Vec<JoinHandle<()>>,
    mount: MountGuard,
}

impl CardView {
    /// A card with no background effects running.
    pub fn new(item: ContentItem) -> Self {
        let normalized = normalize_url(&item.link);
        let effective = effective_type(&normalized);

        if effective != item.kind {
            debug!(
                link = %item.link,
                stored = %item.kind,
                effective = %effective,
                "Stored content type differs from link shape"
            );
        }

        Self {
            item,
            normalized,
            effective,
            preview: Arc::new(Mutex::new(PreviewState::Idle)),
            tweet: Arc::new(Mutex::new(TweetStatus::Pending)),
            playing: false,
            tasks: Vec::new(),
            mount: MountGuard::new(),
        }
    }

    /// Create the card and start the effects its effective type needs:
    /// a preview fetch for links and documents, the widget embed for tweets.
    pub fn mount<P, H>(item: ContentItem, effects: &CardEffects<P, H>) -> Self
    where
        P: PreviewSource,
        H: WidgetHost,
    {
        let mut card = Self::new(item);
        match card.effective {
            ContentType::Link | ContentType::Document => card.spawn_preview(effects.previews.clone()),
            ContentType::Twitter => card.spawn_tweet_embed(effects.social.clone()),
            ContentType::Youtube => {}
        }
        card
    }

    fn spawn_preview<P: PreviewSource>(&mut self, previews: Arc<P>) {
        *lock(&self.preview) = PreviewState::Loading;

        let state = self.preview.clone();
        let handle = self.mount.handle();
        let url = self.normalized.clone();

        self.tasks.push(tokio::spawn(async move {
            let result = previews.fetch_preview(&url).await;
            if handle.is_cancelled() {
                debug!(%url, "Discarding preview for unmounted card");
                return;
            }

            *lock(&state) = match result {
                Ok(metadata) => PreviewState::Loaded(metadata),
                Err(err) => {
                    warn!(%url, error = %err, "Preview fetch failed");
                    PreviewState::Failed(err.to_string())
                }
            };
        }));
    }

    fn spawn_tweet_embed<H: WidgetHost>(&mut self, social: Arc<SocialEmbedLoader<H>>) {
        let state = self.tweet.clone();
        let handle = self.mount.handle();
        let mount = TweetMount::new(normalize_twitter_url(&self.normalized));

        self.tasks.push(tokio::spawn(async move {
            if let Some(status) = social.embed(&mount, &handle).await {
                *lock(&state) = status;
            }
        }));
    }

    pub fn item(&self) -> &ContentItem {
        &self.item
    }

    pub fn normalized_url(&self) -> &str {
        &self.normalized
    }

    pub fn effective_kind(&self) -> ContentType {
        self.effective
    }

    pub fn stored_kind(&self) -> ContentType {
        self.item.kind
    }

    /// Whether the submitter's type disagrees with the one derived from the
    /// link. Rendering always follows the derived type.
    pub fn kind_mismatch(&self) -> bool {
        self.effective != self.item.kind
    }

    pub fn preview_state(&self) -> PreviewState {
        lock(&self.preview).clone()
    }

    pub fn tweet_status(&self) -> TweetStatus {
        *lock(&self.tweet)
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Wait for every background effect to finish.
    pub async fn settled(&mut self) {
        for task in self.tasks.drain(..) {
            if let Err(err) = task.await {
                warn!(error = %err, "Card task failed");
            }
        }
    }

    pub fn render(&self) -> Card {
        let title = self.item.title.clone().unwrap_or_default();
        let preview = self.preview_state();
        let ctx = RenderContext {
            title: &title,
            url: &self.normalized,
            preview: &preview,
            tweet: self.tweet_status(),
            playing: self.playing,
        };

        Card {
            key: self.item.key(),
            body: renderer_for(self.effective).render(&ctx),
            title,
            href: self.normalized.clone(),
            kind: self.effective,
            stored_kind: self.item.kind,
        }
    }
}
