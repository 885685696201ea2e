pub mod api;
pub mod card;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod events;
pub mod models;
pub mod render;
pub mod repositories;
pub mod resolver;
pub mod schema;
pub mod session;
pub mod social;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use api::BackendClient;
pub use errors::{ClientError, Operation};
pub use models::{ContentItem, ContentType, LinkPreviewMetadata};
pub use session::SessionContext;
