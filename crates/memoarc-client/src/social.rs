//! Tweet embedding.
//!
//! A widget host is prepared once per process, then asked to fill each
//! tweet card's mount point. Whether an embed actually materialized is only
//! checked after a fixed delay; a card without one keeps showing its
//! "View on X" fallback.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::card::MountHandle;
use crate::errors::ClientError;
use crate::render::TweetStatus;

pub const EMBED_PROBE_DELAY: Duration = Duration::from_millis(3500);

const OEMBED_ENDPOINT: &str = "https://publish.twitter.com/oembed";

/// Mount point for one tweet card.
#[derive(Debug)]
pub struct TweetMount {
    href: String,
    html: Mutex<Option<String>>,
}

impl TweetMount {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            html: Mutex::new(None),
        }
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn attach(&self, html: String) {
        *self.html.lock().unwrap_or_else(|p| p.into_inner()) = Some(html);
    }

    pub fn html(&self) -> Option<String> {
        self.html.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn has_frame(&self) -> bool {
        self.html().is_some_and(|html| !html.trim().is_empty())
    }
}

#[async_trait]
pub trait WidgetHost: Send + Sync + 'static {
    /// One-time setup before any tweet is loaded.
    async fn load_script(&self) -> Result<(), ClientError>;

    /// Render the tweet behind `mount.href()` into the mount point.
    async fn load(&self, mount: &TweetMount);
}

pub struct SocialEmbedLoader<H> {
    host: H,
    script: OnceCell<bool>,
    probe_delay: Duration,
}

impl<H: WidgetHost> SocialEmbedLoader<H> {
    pub fn new(host: H) -> Self {
        Self::with_probe_delay(host, EMBED_PROBE_DELAY)
    }

    pub fn with_probe_delay(host: H, probe_delay: Duration) -> Self {
        Self {
            host,
            script: OnceCell::new(),
            probe_delay,
        }
    }

    async fn script_ready(&self) -> bool {
        *self
            .script
            .get_or_init(|| async {
                match self.host.load_script().await {
                    Ok(()) => true,
                    Err(err) => {
                        warn!(error = %err, "Widget script failed to load");
                        false
                    }
                }
            })
            .await
    }

    /// Embed the tweet and report whether a frame showed up.
    ///
    /// Returns `None` when the card was unmounted before the result was
    /// known.
    pub async fn embed(&self, mount: &TweetMount, handle: &MountHandle) -> Option<TweetStatus> {
        if !self.script_ready().await {
            return (!handle.is_cancelled()).then_some(TweetStatus::Blocked);
        }
        if handle.is_cancelled() {
            return None;
        }

        self.host.load(mount).await;
        tokio::time::sleep(self.probe_delay).await;

        if handle.is_cancelled() {
            debug!(href = %mount.href(), "Card unmounted before embed probe");
            return None;
        }

        Some(if mount.has_frame() {
            TweetStatus::Embedded
        } else {
            TweetStatus::Blocked
        })
    }
}

#[derive(Debug, Deserialize)]
struct OEmbedResponse {
    #[serde(default)]
    html: String,
}

/// Widget host backed by the public oEmbed endpoint.
#[derive(Clone, Debug)]
pub struct OEmbedHost {
    http: Client,
    endpoint: String,
}

impl OEmbedHost {
    pub fn new() -> Self {
        Self::with_endpoint(Client::new(), OEMBED_ENDPOINT)
    }

    pub fn with_endpoint(http: Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }
}

impl Default for OEmbedHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WidgetHost for OEmbedHost {
    async fn load_script(&self) -> Result<(), ClientError> {
        debug!(endpoint = %self.endpoint, "oEmbed host needs no script");
        Ok(())
    }

    async fn load(&self, mount: &TweetMount) {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("url", mount.href()), ("dnt", "true"), ("theme", "dark")])
            .send()
            .await
            .and_then(|response| response.error_for_status());

        let body = match response {
            Ok(response) => response.json::<OEmbedResponse>().await,
            Err(err) => Err(err),
        };

        match body {
            Ok(body) => mount.attach(body.html),
            Err(err) => warn!(href = %mount.href(), error = %err, "Tweet embed failed"),
        }
    }
}
