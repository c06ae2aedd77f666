use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

/// Name of the browser cookie carrying the session token.
pub const SESSION_COOKIE: &str = "inventory_session";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Danger,
}

impl FlashLevel {
    pub fn css_class(self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Danger => "danger",
        }
    }
}

/// One-shot status banner, consumed on the next page render.
#[derive(Debug, Clone)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: FlashLevel::Success, message: message.into() }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self { level: FlashLevel::Danger, message: message.into() }
    }
}

#[derive(Debug)]
struct Session {
    batch_number: String,
    flashes: Vec<Flash>,
}

/// In-process session store: token -> authenticated batch number.
///
/// Entries live from login until logout or server restart; there is no
/// expiry sweep.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session for the authenticated officer, returning its token.
    pub async fn create(&self, batch_number: &str) -> String {
        let token = Uuid::new_v4().to_string();
        let session = Session {
            batch_number: batch_number.to_string(),
            flashes: Vec::new(),
        };

        self.sessions.write().await.insert(token.clone(), session);
        token
    }

    /// Resolve a token to its batch number, if the session is live.
    pub async fn batch_number(&self, token: &str) -> Option<String> {
        self.sessions
            .read()
            .await
            .get(token)
            .map(|s| s.batch_number.clone())
    }

    pub async fn remove(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }

    /// Queue a flash message on the owning session.
    pub async fn push_flash(&self, token: &str, flash: Flash) {
        if let Some(session) = self.sessions.write().await.get_mut(token) {
            session.flashes.push(flash);
        }
    }

    /// Drain all queued flash messages for the session.
    pub async fn take_flashes(&self, token: &str) -> Vec<Flash> {
        match self.sessions.write().await.get_mut(token) {
            Some(session) => std::mem::take(&mut session.flashes),
            None => Vec::new(),
        }
    }
}
