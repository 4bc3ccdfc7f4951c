//! Revocation list for access tokens invalidated by logout.
//!
//! Revoked tokens are kept in memory until their own expiry. Only a SHA-256
//! digest of each token is stored.

use dashmap::DashMap;
use log::{debug, info};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

const CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// Thread-safe token blacklist shared by all workers.
#[derive(Clone)]
pub struct TokenBlacklist {
    /// Token digest -> instant after which the entry can be dropped
    tokens: Arc<DashMap<String, Instant>>,
    last_cleanup: Arc<RwLock<Instant>>,
}

impl TokenBlacklist {
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(DashMap::new()),
            last_cleanup: Arc::new(RwLock::new(Instant::now())),
        }
    }

    /// Revoke `token` until `exp` (Unix epoch seconds).
    ///
    /// Tokens that have already expired are not stored.
    pub async fn revoke(&self, token: &str, exp: i64) {
        let remaining = exp - chrono::Utc::now().timestamp();
        if remaining > 0 {
            let ttl = Duration::from_secs(remaining as u64);
            self.tokens.insert(digest(token), Instant::now() + ttl);
            debug!("Token revoked, entry expires in {:?}", ttl);
        }

        self.maybe_cleanup().await;
    }

    /// Returns `true` if the token was revoked and is still within its lifetime.
    pub fn is_revoked(&self, token: &str) -> bool {
        let key = digest(token);

        if let Some(expires_at) = self.tokens.get(&key).map(|entry| *entry.value()) {
            if expires_at > Instant::now() {
                return true;
            }
            self.tokens.remove(&key);
        }

        false
    }

    async fn maybe_cleanup(&self) {
        let due = self.last_cleanup.read().await.elapsed() >= CLEANUP_INTERVAL;
        if !due {
            return;
        }

        let mut last = self.last_cleanup.write().await;
        // Another task may have cleaned up while we waited for the lock.
        if last.elapsed() >= CLEANUP_INTERVAL {
            let now = Instant::now();
            let before = self.tokens.len();
            self.tokens.retain(|_, expires_at| *expires_at > now);

            let removed = before - self.tokens.len();
            if removed > 0 {
                info!(
                    "Token blacklist cleanup: removed {} expired entries, {} remaining",
                    removed,
                    self.tokens.len()
                );
            }
            *last = now;
        }
    }
}

impl Default for TokenBlacklist {
    fn default() -> Self {
        Self::new()
    }
}

fn digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
