//! Short-lived cache of authenticated users, keyed by email.
//!
//! Cache failures are logged and treated as misses: a broken cache slows
//! requests down but never fails them.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use log::{debug, warn};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::models::User;
use crate::utils::mask_email;

/// Cache key for a user's record.
pub fn cache_key(email: &str) -> String {
    format!("user:{}", email.to_lowercase())
}

#[async_trait]
pub trait UserCache: Send + Sync {
    async fn get(&self, email: &str) -> Option<User>;
    async fn set(&self, user: &User);
    async fn invalidate(&self, email: &str);
}

/// Redis-backed cache storing JSON-encoded users with an expiry.
pub struct RedisUserCache {
    conn: ConnectionManager,
    ttl_secs: u64,
}

impl RedisUserCache {
    pub async fn connect(url: &str, ttl_secs: u64) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn, ttl_secs })
    }
}

#[async_trait]
impl UserCache for RedisUserCache {
    async fn get(&self, email: &str) -> Option<User> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = match conn.get(cache_key(email)).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("User cache read failed: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw?) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Discarding undecodable cached user: {}", e);
                None
            }
        }
    }

    async fn set(&self, user: &User) {
        let payload = match serde_json::to_string(user) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to encode user for cache: {}", e);
                return;
            }
        };

        let mut conn = self.conn.clone();
        if let Err(e) = conn
            .set_ex::<_, _, ()>(cache_key(&user.email), payload, self.ttl_secs)
            .await
        {
            warn!("User cache write failed: {}", e);
        }
    }

    async fn invalidate(&self, email: &str) {
        let mut conn = self.conn.clone();
        if let Err(e) = conn.del::<_, ()>(cache_key(email)).await {
            warn!("User cache invalidation failed: {}", e);
        }
    }
}

/// Process-local cache used when no Redis URL is configured.
#[derive(Clone)]
pub struct MemoryUserCache {
    entries: Arc<DashMap<String, (User, Instant)>>,
    ttl: Duration,
}

impl MemoryUserCache {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl: Duration::from_secs(ttl_secs),
        }
    }
}

#[async_trait]
impl UserCache for MemoryUserCache {
    async fn get(&self, email: &str) -> Option<User> {
        let key = cache_key(email);
        let hit = self.entries.get(&key).and_then(|entry| {
            let (user, expires_at) = entry.value();
            (*expires_at > Instant::now()).then(|| user.clone())
        });

        if hit.is_none() {
            self.entries.remove(&key);
        } else {
            debug!("User cache hit for {}", mask_email(email));
        }
        hit
    }

    async fn set(&self, user: &User) {
        self.entries.insert(
            cache_key(&user.email),
            (user.clone(), Instant::now() + self.ttl),
        );
    }

    async fn invalidate(&self, email: &str) {
        self.entries.remove(&cache_key(email));
    }
}
