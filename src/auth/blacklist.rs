use chrono::Utc;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Revoked access tokens, each kept until its own expiry.
///
/// Entries are keyed by the SHA-256 of the token so raw credentials are not
/// held in memory after logout.
#[derive(Clone, Default)]
pub struct TokenBlacklist {
    entries: Arc<RwLock<HashMap<String, i64>>>,
}

impl TokenBlacklist {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(token: &str) -> String {
        format!("blacklist:{:x}", Sha256::digest(token.as_bytes()))
    }

    /// Revoke `token` until `expires_at` (unix seconds)
    pub async fn revoke(&self, token: &str, expires_at: i64) {
        let now = Utc::now().timestamp();
        let mut entries = self.entries.write().await;
        entries.retain(|_, exp| *exp > now);
        if expires_at > now {
            entries.insert(Self::key(token), expires_at);
        }
        debug!(revoked = entries.len(), "Token revoked");
    }

    pub async fn is_revoked(&self, token: &str) -> bool {
        let now = Utc::now().timestamp();
        let entries = self.entries.read().await;
        matches!(entries.get(&Self::key(token)), Some(exp) if *exp > now)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
