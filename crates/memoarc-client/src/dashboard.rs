use tracing::{debug, info, instrument, warn};

use crate::api::BackendClient;
use crate::errors::{ClientError, Operation};
use crate::models::{ContentItem, ContentType, NewContent};
use crate::repositories::StorageRepository;
use crate::resolver::{effective_type, normalize_url};
use crate::session::SessionContext;

pub const EMPTY_MESSAGE: &str = "No content yet. Run \"memoarc add\" to get started.";

/// Shown when a category filter leaves nothing to list.
pub fn empty_category_message(kind: ContentType) -> String {
    format!("No {} saved yet.", kind.section().to_lowercase())
}

/// Content type preselected on the submit form.
pub const DEFAULT_SUBMIT_TYPE: ContentType = ContentType::Youtube;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Loaded(Vec<ContentItem>),
    /// Nothing saved at all.
    Empty,
    /// Content exists, but none of it in the selected category.
    EmptyCategory(ContentType),
    Failed { message: String, detail: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub welcome: String,
    pub listing: Listing,
}

/// Greeting for the signed-in user.
///
/// When only a token is known the email is looked up once and remembered.
/// Lookup failures fall back to a plain greeting.
pub async fn welcome_line<R: StorageRepository>(
    session: &SessionContext<R>,
    client: &BackendClient,
) -> String {
    if let Some(email) = session.email() {
        return format!("Welcome, {email}");
    }

    let Some(token) = session.token() else {
        return "Welcome".to_string();
    };

    match client.me(Some(&token)).await {
        Ok(Some(email)) => {
            if let Err(err) = session.remember_email(&email).await {
                warn!(error = %err, "Could not persist email");
            }
            format!("Welcome, {email}")
        }
        Ok(None) => "Welcome".to_string(),
        Err(err) => {
            debug!(error = %err, "Email lookup failed");
            "Welcome".to_string()
        }
    }
}

/// Keep only items whose link classifies as `kind`.
pub fn filter_by_kind(items: Vec<ContentItem>, kind: ContentType) -> Vec<ContentItem> {
    items
        .into_iter()
        .filter(|item| effective_type(&normalize_url(&item.link)) == kind)
        .collect()
}

#[instrument(skip_all, fields(filter = ?filter))]
pub async fn load_dashboard<R: StorageRepository>(
    session: &SessionContext<R>,
    client: &BackendClient,
    filter: Option<ContentType>,
) -> Dashboard {
    let token = session.token();
    let (welcome, content) = tokio::join!(
        welcome_line(session, client),
        client.list_content(token.as_deref())
    );

    let listing = match content {
        Ok(items) if items.is_empty() => Listing::Empty,
        Ok(items) => {
            let items = match filter {
                Some(kind) => filter_by_kind(items, kind),
                None => items,
            };
            match filter {
                Some(kind) if items.is_empty() => Listing::EmptyCategory(kind),
                _ => Listing::Loaded(items),
            }
        }
        Err(err) => {
            let detail = err
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| err.to_string());
            warn!(%detail, "Failed to load content");
            Listing::Failed {
                message: err.user_message(Operation::LoadContent),
                detail,
            }
        }
    };

    Dashboard { welcome, listing }
}

/// Submit a new link under the chosen type.
///
/// The title is accepted for parity with the submit form but the backend
/// does not store it.
#[instrument(skip_all, fields(kind = %kind, has_title = title.is_some()))]
pub async fn submit_content<R: StorageRepository>(
    session: &SessionContext<R>,
    client: &BackendClient,
    link: &str,
    kind: ContentType,
    title: Option<&str>,
) -> Result<(), ClientError> {
    let link = link.trim();
    if link.is_empty() {
        return Err(ClientError::EmptyLink);
    }

    let token = session.token();
    client
        .create_content(
            token.as_deref(),
            &NewContent {
                link: link.to_string(),
                kind,
            },
        )
        .await?;

    info!(%link, "Submitted content");
    Ok(())
}
