use std::fmt;
use std::str::FromStr;

use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Content category a saved link is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Twitter,
    Youtube,
    Document,
    Link,
}

impl ContentType {
    pub const ALL: [ContentType; 4] = [
        ContentType::Twitter,
        ContentType::Youtube,
        ContentType::Document,
        ContentType::Link,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Twitter => "twitter",
            ContentType::Youtube => "youtube",
            ContentType::Document => "document",
            ContentType::Link => "link",
        }
    }

    /// Sidebar section name for the category.
    pub fn section(&self) -> &'static str {
        match self {
            ContentType::Twitter => "Tweets",
            ContentType::Youtube => "Videos",
            ContentType::Document => "Documents",
            ContentType::Link => "Links",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown content type: {0} (expected twitter, youtube, document or link)")]
pub struct ParseContentTypeError(String);

impl FromStr for ContentType {
    type Err = ParseContentTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "twitter" | "tweet" => Ok(ContentType::Twitter),
            "youtube" | "video" => Ok(ContentType::Youtube),
            "document" | "doc" => Ok(ContentType::Document),
            "link" => Ok(ContentType::Link),
            _ => Err(ParseContentTypeError(s.to_string())),
        }
    }
}

/// A saved link as the backend lists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    pub link: String,
    #[serde(rename = "type")]
    pub kind: ContentType,
}

impl ContentItem {
    /// Stable key for the item, falling back to `<type>:<link>` when the
    /// backend sent no identifier.
    pub fn key(&self) -> String {
        match &self.id {
            Some(id) if !id.is_empty() => id.clone(),
            _ => format!("{}:{}", self.kind, self.link),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ContentListResponse {
    #[serde(default)]
    pub content: Vec<ContentItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewContent {
    pub link: String,
    #[serde(rename = "type")]
    pub kind: ContentType,
}

/// Page metadata scraped by the backend's preview endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinkPreviewMetadata {
    pub url: String,
    pub domain: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub site_name: String,
    pub favicon: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct MeResponse {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SignInResponse {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignUpRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SignUpResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Error payload the backend attaches to non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::local_storage)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StoredEntry {
    pub key: String,
    pub value: String,
    pub updated_at: chrono::NaiveDateTime,
}

impl StoredEntry {
    pub fn new(key: &str, value: &str) -> Self {
        StoredEntry {
            key: key.to_string(),
            value: value.to_string(),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}
