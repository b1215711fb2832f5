//! Persisted session token.
//!
//! One token at a time, stored in the local database under a fixed key so
//! it survives restarts. Presence of a token is what the client treats as
//! an authenticated session; the server is the one that actually rejects
//! stale credentials.

use std::sync::Arc;

use anyhow::Result;

use crate::storage::Database;

/// Storage key the token lives under.
pub const TOKEN_KEY: &str = "token";

/// Cloneable handle over the persisted session token.
///
/// Passed explicitly to the API client and the route guard; nothing in the
/// crate reaches for it through global state.
#[derive(Clone)]
pub struct SessionStore {
    db: Arc<Database>,
}

impl SessionStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn set(&self, token: &str) -> Result<()> {
        self.db.set_config(TOKEN_KEY, token).await
    }

    /// Current token, or `None` when logged out. Storage read failures are
    /// logged and treated as an absent session.
    pub async fn get(&self) -> Option<String> {
        match self.db.get_config(TOKEN_KEY).await {
            Ok(value) => value.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read session token: {}", e);
                None
            }
        }
    }

    pub async fn clear(&self) -> Result<()> {
        self.db.delete_config(TOKEN_KEY).await
    }

    pub async fn is_authenticated(&self) -> bool {
        self.get().await.is_some()
    }
}
