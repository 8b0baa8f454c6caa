use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use hyper::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::errors::UpstreamError;
use crate::services::{upstream::UpstreamClient, ResponseCache};

/// Usage of one resource (bandwidth, memory or disk) as reported by the VPS panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub used: String,
    pub total: String,
    pub free: String,
    pub used_bytes: i64,
    pub total_bytes: i64,
    pub free_bytes: i64,
    pub usage_percent: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RackNerdStats {
    pub bandwidth: UsageRecord,
    pub memory: UsageRecord,
    pub disk: UsageRecord,
    pub ip_address: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManyfoldStats {
    pub models: u64,
    pub creators: u64,
    pub collections: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookStackStats {
    pub total_books: u64,
    pub total_pages: u64,
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub status: StatusCode,
    pub body: Bytes,
    pub expires_at: Instant,
}

impl CacheEntry {
    pub fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Shared by every route; built once in `main`.
pub struct AppState {
    pub settings: Settings,
    pub client: UpstreamClient,
    pub cache: ResponseCache,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self, UpstreamError> {
        let client = UpstreamClient::new(settings.request_timeout)?;
        let cache = ResponseCache::new(settings.cache_ttl);
        Ok(Self {
            settings,
            client,
            cache,
        })
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}
