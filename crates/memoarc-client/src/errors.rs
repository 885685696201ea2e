use thiserror::Error;

pub const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";
pub const NETWORK_MESSAGE: &str =
    "Network error. Please check your internet connection and try again.";
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred. Please try again.";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("required fields are missing")]
    MissingFields,

    #[error("link cannot be empty")]
    EmptyLink,

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("backend rejected request with status {status}")]
    Rejected {
        status: u16,
        message: Option<String>,
        field: Option<String>,
    },

    #[error("unexpected response from backend")]
    UnexpectedResponse,

    #[error("storage error: {0}")]
    Storage(#[from] diesel::result::Error),

    #[error("could not open storage: {0}")]
    StorageConnection(#[from] diesel::ConnectionError),

    #[error("storage migration failed: {0}")]
    Migration(String),

    #[error("storage lock poisoned")]
    StoragePoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// User-facing action an error surfaced from. Each maps status codes to its
/// own fixed messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SignIn,
    SignUp,
    CreateContent,
    LoadContent,
    Preview,
    Session,
}

impl ClientError {
    /// Message the backend attached to a rejected request, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Rejected {
                message: Some(message),
                ..
            } if !message.is_empty() => Some(message),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Rejected { status, .. } => Some(*status),
            ClientError::Network(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(err) if !err.is_decode())
    }

    pub fn user_message(&self, operation: Operation) -> String {
        match operation {
            Operation::SignIn => self.sign_in_message(),
            Operation::SignUp => self.sign_up_message(),
            Operation::CreateContent => match self {
                ClientError::EmptyLink => "Please enter a valid link".to_string(),
                _ => self
                    .server_message()
                    .unwrap_or("Failed to add content")
                    .to_string(),
            },
            Operation::LoadContent => "Failed to load content".to_string(),
            Operation::Preview => "Preview failed".to_string(),
            Operation::Session => UNEXPECTED_MESSAGE.to_string(),
        }
    }

    fn sign_in_message(&self) -> String {
        match self {
            ClientError::MissingFields => "Please fill in all fields".to_string(),
            ClientError::Rejected { status: 400, .. } => self
                .server_message()
                .unwrap_or("Invalid request. Please check your inputs.")
                .to_string(),
            ClientError::Rejected { status: 403, .. } => "Invalid email or password".to_string(),
            ClientError::Rejected { .. } => {
                self.server_message().unwrap_or(GENERIC_MESSAGE).to_string()
            }
            _ => self.fallback_message(),
        }
    }

    fn sign_up_message(&self) -> String {
        match self {
            ClientError::MissingFields => "Please fill in all fields".to_string(),
            ClientError::Rejected {
                status: 409, field, ..
            } => match field.as_deref() {
                Some("email") => "This email is already registered! Please use a different email address or sign in with your existing account.".to_string(),
                Some("username") => "This username is already taken! Please choose a different username.".to_string(),
                _ => "User already exists! Please try with different credentials.".to_string(),
            },
            ClientError::Rejected { status: 400, .. } => {
                "Invalid input data. Please check your entries and try again.".to_string()
            }
            ClientError::Rejected { .. } => {
                self.server_message().unwrap_or(GENERIC_MESSAGE).to_string()
            }
            _ => self.fallback_message(),
        }
    }

    fn fallback_message(&self) -> String {
        if self.is_network() {
            NETWORK_MESSAGE.to_string()
        } else if matches!(self, ClientError::UnexpectedResponse) {
            GENERIC_MESSAGE.to_string()
        } else {
            UNEXPECTED_MESSAGE.to_string()
        }
    }
}
