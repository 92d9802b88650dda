//! Rendered page cache and its invalidation port.
//!
//! Read endpoints cache their JSON payload under the page path; writes call
//! `revalidate(path)` so the next read renders fresh data. A page whose render
//! overlapped a revalidation is served once but not kept.

use std::sync::atomic::{AtomicU64, Ordering};
use std::{future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;
use moka::future::Cache;
use serde_json::Value;
use tracing::debug;

/// Path-based revalidation signal.
#[async_trait]
pub trait CacheInvalidator: Send + Sync {
    async fn revalidate(&self, path: &str);
}

#[derive(Clone)]
pub struct PageCache {
    inner: Cache<String, Arc<Value>>,
    /// Bumped by every revalidation.
    epoch: Arc<AtomicU64>,
}

impl PageCache {
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        let inner = Cache::builder().max_capacity(max_entries).time_to_live(ttl).build();
        Self { inner, epoch: Arc::new(AtomicU64::new(0)) }
    }

    pub fn from_config(cfg: &configs::CacheConfig) -> Self {
        Self::new(cfg.max_entries, Duration::from_secs(cfg.ttl_secs))
    }

    pub async fn get(&self, path: &str) -> Option<Arc<Value>> {
        self.inner.get(path).await
    }

    pub async fn insert(&self, path: &str, page: Value) -> Arc<Value> {
        let page = Arc::new(page);
        self.inner.insert(path.to_string(), Arc::clone(&page)).await;
        page
    }

    /// Cached page for `path`, rendering and storing it on a miss. Render
    /// errors are returned as-is and nothing is cached.
    pub async fn get_or_render<F, Fut, E>(&self, path: &str, render: F) -> Result<Arc<Value>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<Value>, E>>,
    {
        if let Some(hit) = self.get(path).await {
            debug!(%path, "page_cache_hit");
            return Ok(hit);
        }
        let epoch = self.epoch.load(Ordering::SeqCst);
        match render().await? {
            Some(page) => {
                let page = self.insert(path, page).await;
                if self.epoch.load(Ordering::SeqCst) != epoch {
                    // may predate a write that revalidated while it rendered
                    self.inner.invalidate(path).await;
                    debug!(%path, "page_cache_render_superseded");
                }
                Ok(page)
            }
            // nothing to cache, e.g. a 404 page
            None => Ok(Arc::new(Value::Null)),
        }
    }
}

#[async_trait]
impl CacheInvalidator for PageCache {
    async fn revalidate(&self, path: &str) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.inner.invalidate(path).await;
        debug!(%path, "cache_revalidated");
    }
}
