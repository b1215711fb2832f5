//! Session event observers.
//!
//! The API client raises exactly one session-level event: the server
//! rejected the current token. Handling lives in one registered policy
//! instead of being duplicated across views.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::session::SessionStore;

/// Observer for session-level events raised by the API client.
#[async_trait]
pub trait SessionObserver: Send + Sync {
    /// Called when the server rejects the current token (401/403).
    async fn on_auth_rejected(&self);

    /// Observer name for logging purposes.
    fn name(&self) -> &'static str;
}

/// Registry of session observers.
#[derive(Clone)]
pub struct ObserverRegistry {
    observers: Arc<RwLock<Vec<Arc<dyn SessionObserver>>>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self {
            observers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn register(&self, observer: Arc<dyn SessionObserver>) {
        let mut observers = self.observers.write().await;
        tracing::info!("Registering session observer: {}", observer.name());
        observers.push(observer);
    }

    pub async fn notify_auth_rejected(&self) {
        let observers = self.observers.read().await;
        for observer in observers.iter() {
            observer.on_auth_rejected().await;
        }
    }
}

impl Default for ObserverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Top-level auth policy: drop the stored token so the route guard sends
/// the user back to the login view on the next navigation.
pub struct ClearSessionOnReject {
    session: SessionStore,
}

impl ClearSessionOnReject {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }
}

#[async_trait]
impl SessionObserver for ClearSessionOnReject {
    async fn on_auth_rejected(&self) {
        match self.session.clear().await {
            Ok(()) => tracing::info!("Session token cleared after auth rejection"),
            Err(e) => tracing::warn!("Failed to clear rejected session token: {}", e),
        }
    }

    fn name(&self) -> &'static str {
        "clear_session_on_reject"
    }
}
