use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::errors::ClientError;
use crate::models::{
    ContentItem, ContentListResponse, ErrorBody, LinkPreviewMetadata, MeResponse, NewContent,
    SignInRequest, SignInResponse, SignUpRequest, SignUpResponse,
};

/// HTTP client for the notes backend.
///
/// Holds no credentials; authenticated calls take the bearer token from the
/// caller's session.
#[derive(Clone, Debug)]
pub struct BackendClient {
    http: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorize(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    #[instrument(skip_all)]
    pub async fn me(&self, token: Option<&str>) -> Result<Option<String>, ClientError> {
        let request = Self::authorize(self.http.get(self.endpoint("/me")), token);
        let response = check(request.send().await?).await?;
        let me: MeResponse = response.json().await?;
        Ok(me.email.filter(|email| !email.is_empty()))
    }

    #[instrument(skip_all, fields(authenticated = token.is_some()))]
    pub async fn list_content(&self, token: Option<&str>) -> Result<Vec<ContentItem>, ClientError> {
        debug!("Fetching content list");
        let request = Self::authorize(self.http.get(self.endpoint("/content/view")), token);
        let response = check(request.send().await?).await?;
        let listing: ContentListResponse = response.json().await?;

        info!(count = listing.content.len(), "Retrieved content list");
        Ok(listing.content)
    }

    #[instrument(skip_all, fields(link = %content.link, kind = %content.kind))]
    pub async fn create_content(
        &self,
        token: Option<&str>,
        content: &NewContent,
    ) -> Result<(), ClientError> {
        let request = Self::authorize(self.http.post(self.endpoint("/content/create")), token);
        check(request.json(content).send().await?).await?;

        info!("Created content item");
        Ok(())
    }

    #[instrument(skip_all, fields(url = %url))]
    pub async fn preview(&self, url: &str) -> Result<LinkPreviewMetadata, ClientError> {
        let request = self.http.get(self.endpoint("/preview")).query(&[("url", url)]);
        let response = check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    #[instrument(skip_all, fields(email = %request.email))]
    pub async fn sign_in(&self, request: &SignInRequest) -> Result<SignInResponse, ClientError> {
        let response = self
            .http
            .post(self.endpoint("/signin"))
            .json(request)
            .send()
            .await?;
        auth_body(check(response).await?).await
    }

    #[instrument(skip_all, fields(email = %request.email, username = %request.username))]
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<SignUpResponse, ClientError> {
        let response = self
            .http
            .post(self.endpoint("/signup"))
            .json(request)
            .send()
            .await?;
        auth_body(check(response).await?).await
    }
}

/// Turn non-2xx responses into [`ClientError::Rejected`], keeping whatever
/// `message`/`field` the backend sent.
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body: ErrorBody = response.json().await.unwrap_or_default();
    warn!(status = status.as_u16(), message = ?body.message, "Backend rejected request");

    Err(ClientError::Rejected {
        status: status.as_u16(),
        message: body.message,
        field: body.field,
    })
}

/// Sign-in and sign-up only count as answered with a readable 200 body.
/// Other 2xx statuses and unreadable bodies are unexpected responses.
async fn auth_body<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status != StatusCode::OK {
        warn!(status = status.as_u16(), "Unexpected success status");
        return Err(ClientError::UnexpectedResponse);
    }

    response.json().await.map_err(|err| {
        if err.is_decode() {
            warn!(error = %err, "Unreadable response body");
            ClientError::UnexpectedResponse
        } else {
            ClientError::Network(err)
        }
    })
}

/// Where cards get link preview metadata from.
#[async_trait]
pub trait PreviewSource: Send + Sync + 'static {
    async fn fetch_preview(&self, url: &str) -> Result<LinkPreviewMetadata, ClientError>;
}

#[async_trait]
impl PreviewSource for BackendClient {
    async fn fetch_preview(&self, url: &str) -> Result<LinkPreviewMetadata, ClientError> {
        self.preview(url).await
    }
}
