use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, instrument, warn};

use crate::api::BackendClient;
use crate::errors::ClientError;
use crate::events::{AuthEvent, AuthEvents};
use crate::models::{SignInRequest, SignUpRequest};
use crate::repositories::StorageRepository;

pub const TOKEN_KEY: &str = "token";
pub const EMAIL_KEY: &str = "email";

pub const SIGN_UP_SUCCESS: &str = "Signup successful! You can now sign in.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub token: Option<String>,
    pub email: Option<String>,
}

/// Process-wide authentication state.
///
/// Built from persistent storage at startup, updated on sign-in and cleared
/// on sign-out. Transitions are published on [`AuthEvents`].
pub struct SessionContext<R: StorageRepository> {
    storage: R,
    credentials: RwLock<Credentials>,
    events: AuthEvents,
}

impl<R: StorageRepository> SessionContext<R> {
    pub async fn init(storage: R, events: AuthEvents) -> Result<Self, ClientError> {
        let credentials = load_credentials(&storage).await?;
        debug!(
            authenticated = credentials.token.is_some(),
            has_email = credentials.email.is_some(),
            "Session initialised from storage"
        );

        Ok(Self {
            storage,
            credentials: RwLock::new(credentials),
            events,
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, Credentials> {
        self.credentials
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Credentials> {
        self.credentials
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn email(&self) -> Option<String> {
        self.read().email.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().token.is_some()
    }

    pub fn events(&self) -> &AuthEvents {
        &self.events
    }

    pub fn storage(&self) -> &R {
        &self.storage
    }

    /// Exchange credentials for a token and persist it together with the
    /// email.
    #[instrument(skip_all)]
    pub async fn sign_in(
        &self,
        client: &BackendClient,
        email: &str,
        password: &str,
    ) -> Result<(), ClientError> {
        let email = email.trim();
        let password = password.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ClientError::MissingFields);
        }

        let response = client
            .sign_in(&SignInRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

        let Some(token) = response.token.filter(|token| !token.is_empty()) else {
            warn!("Sign-in succeeded without a token");
            return Err(ClientError::UnexpectedResponse);
        };

        self.storage.set(TOKEN_KEY, &token).await?;
        self.storage.set(EMAIL_KEY, email).await?;
        *self.write() = Credentials {
            token: Some(token),
            email: Some(email.to_string()),
        };

        info!("Signed in");
        self.events.publish(AuthEvent::SignedIn {
            email: email.to_string(),
        });
        Ok(())
    }

    /// Register a new account. Does not sign in.
    #[instrument(skip_all)]
    pub async fn sign_up(
        client: &BackendClient,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<String, ClientError> {
        let username = username.trim();
        let email = email.trim();
        let password = password.trim();
        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(ClientError::MissingFields);
        }

        let response = client
            .sign_up(&SignUpRequest {
                username: username.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

        match response.message {
            Some(message) if !message.is_empty() => {
                info!(%message, "Signed up");
                Ok(SIGN_UP_SUCCESS.to_string())
            }
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    pub async fn remember_email(&self, email: &str) -> Result<(), ClientError> {
        self.storage.set(EMAIL_KEY, email).await?;
        self.write().email = Some(email.to_string());
        Ok(())
    }

    /// Clear stored credentials. In-memory state is cleared even when the
    /// store fails.
    #[instrument(skip_all)]
    pub async fn sign_out(&self) -> Result<(), ClientError> {
        *self.write() = Credentials::default();

        let token_removed = self.storage.remove(TOKEN_KEY).await;
        let email_removed = self.storage.remove(EMAIL_KEY).await;

        self.events.publish(AuthEvent::SignedOut);
        info!("Signed out");

        token_removed.and(email_removed)
    }

    /// Reload credentials another process may have written to the shared
    /// store. Returns whether the authenticated state changed.
    pub async fn sync(&self) -> Result<bool, ClientError> {
        let stored = load_credentials(&self.storage).await?;
        let was_authenticated = self.is_authenticated();
        let authenticated = stored.token.is_some();
        *self.write() = stored;

        if was_authenticated == authenticated {
            return Ok(false);
        }

        debug!(authenticated, "Authentication state changed in storage");
        self.events
            .publish(AuthEvent::StorageChanged { authenticated });
        Ok(true)
    }
}

async fn load_credentials<R: StorageRepository>(storage: &R) -> Result<Credentials, ClientError> {
    let token = storage.get(TOKEN_KEY).await?.filter(|t| !t.is_empty());
    let email = storage.get(EMAIL_KEY).await?.filter(|e| !e.is_empty());
    Ok(Credentials { token, email })
}
