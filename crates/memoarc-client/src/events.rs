use tokio::sync::broadcast;

/// Authentication state transitions published to anything tracking the
/// session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn { email: String },
    SignedOut,
    /// Another process changed the shared store.
    StorageChanged { authenticated: bool },
}

pub type AuthReceiver = broadcast::Receiver<AuthEvent>;

#[derive(Clone, Debug)]
pub struct AuthEvents {
    sender: broadcast::Sender<AuthEvent>,
}

impl AuthEvents {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribers only see events published after they subscribe.
    pub fn subscribe(&self) -> AuthReceiver {
        self.sender.subscribe()
    }

    /// Returns how many subscribers received the event.
    pub fn publish(&self, event: AuthEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new(16)
    }
}
