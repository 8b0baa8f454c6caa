use std::collections::HashMap;
use std::time::{Duration, Instant};

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Body, Response, StatusCode};
use tokio::sync::RwLock;

use crate::models::CacheEntry;

pub mod upstream;
pub mod usage;
pub mod xml;


/// Whole-response cache keyed by request path.
///
/// Entries are never evicted; the key space is the handful of routes, so an
/// expired entry just sits there until the next write to the same key.
pub struct ResponseCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub async fn get(&self, key: &str) -> Option<CacheEntry> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.is_fresh(Instant::now()))
            .cloned()
    }

    pub async fn put(&self, key: &str, status: StatusCode, body: Bytes) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            CacheEntry {
                status,
                body,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    #[cfg(test)]
    pub(crate) async fn insert_raw(&self, key: &str, entry: CacheEntry) {
        self.entries.write().await.insert(key.to_string(), entry);
    }
}

pub fn json_response(status: StatusCode, body: Bytes) -> Response<Body> {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

pub async fn get_cached_response(cache: &ResponseCache, cache_key: &str) -> Option<Response<Body>> {
    cache
        .get(cache_key)
        .await
        .map(|entry| json_response(entry.status, entry.body))
}

pub async fn cache_response(cache: &ResponseCache, cache_key: &str, status: StatusCode, body: Bytes) {
    cache.put(cache_key, status, body).await;
}
