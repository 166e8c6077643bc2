//! Metrics hooks and the instrumenting backend decorator.

use crate::backend::{CacheBackend, FreezableBackend, IterableBackend, TaggableBackend};
use crate::error::Result;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Trait for recording cache metrics.
///
/// Every hook defaults to a no-op so implementations only override what
/// they export.
pub trait CacheMetrics: Send + Sync {
    fn record_hit(&self, _entry_identifier: &str, _duration: Duration) {}

    fn record_miss(&self, _entry_identifier: &str, _duration: Duration) {}

    fn record_write(&self, _entry_identifier: &str, _duration: Duration) {}

    /// `scope` is an entry identifier or a tag.
    fn record_invalidation(&self, _scope: &str, _count: u64) {}

    /// A whole cache was flushed. Flushes carry no entry count and are kept
    /// out of `record_invalidation`.
    fn record_flush(&self, _cache_identifier: &str) {}

    fn record_error(&self, _operation: &str, _error: &str) {}
}

/// Default no-op metrics implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpMetrics;

impl CacheMetrics for NoOpMetrics {}

/// Wraps a backend and reports every call to a [`CacheMetrics`] sink.
///
/// Implements each backend trait the wrapped backend implements, so it can
/// stand in wherever the inner backend is used.
///
/// # Example
///
/// ```
/// # use tagged_cache::backend::{BackendOptions, CacheBackend, InMemoryBackend};
/// # use tagged_cache::observability::{InstrumentedBackend, NoOpMetrics};
/// # async fn example() -> tagged_cache::Result<()> {
/// let backend = InstrumentedBackend::new(InMemoryBackend::new(BackendOptions::new("pages"))?)
///     .with_metrics(Box::new(NoOpMetrics));
/// backend.set("home", b"<html>".to_vec(), &[], None).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct InstrumentedBackend<B> {
    inner: B,
    metrics: Arc<dyn CacheMetrics>,
}

impl<B> InstrumentedBackend<B> {
    pub fn new(inner: B) -> Self {
        InstrumentedBackend {
            inner,
            metrics: Arc::new(NoOpMetrics),
        }
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Box<dyn CacheMetrics>) -> Self {
        self.metrics = Arc::from(metrics);
        self
    }

    /// Get the wrapped backend.
    pub fn inner(&self) -> &B {
        &self.inner
    }

    pub fn into_inner(self) -> B {
        self.inner
    }

    fn observe<T>(&self, operation: &str, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            self.metrics.record_error(operation, &e.to_string());
        }
        result
    }
}

impl<B: CacheBackend> CacheBackend for InstrumentedBackend<B> {
    fn cache_identifier(&self) -> &str {
        self.inner.cache_identifier()
    }

    async fn set(
        &self,
        entry_identifier: &str,
        data: Vec<u8>,
        tags: &[&str],
        lifetime: Option<Duration>,
    ) -> Result<()> {
        let timer = Instant::now();
        let result = self.inner.set(entry_identifier, data, tags, lifetime).await;
        if result.is_ok() {
            self.metrics.record_write(entry_identifier, timer.elapsed());
        }
        self.observe("set", result)
    }

    async fn get(&self, entry_identifier: &str) -> Result<Option<Vec<u8>>> {
        let timer = Instant::now();
        let result = self.inner.get(entry_identifier).await;
        match &result {
            Ok(Some(_)) => self.metrics.record_hit(entry_identifier, timer.elapsed()),
            Ok(None) => self.metrics.record_miss(entry_identifier, timer.elapsed()),
            Err(_) => {}
        }
        self.observe("get", result)
    }

    async fn has(&self, entry_identifier: &str) -> Result<bool> {
        let result = self.inner.has(entry_identifier).await;
        self.observe("has", result)
    }

    async fn remove(&self, entry_identifier: &str) -> Result<bool> {
        let result = self.inner.remove(entry_identifier).await;
        if result.is_ok() {
            self.metrics.record_invalidation(entry_identifier, 1);
        }
        self.observe("remove", result)
    }

    async fn flush(&self) -> Result<()> {
        let result = self.inner.flush().await;
        if result.is_ok() {
            self.metrics.record_flush(self.inner.cache_identifier());
        }
        self.observe("flush", result)
    }

    async fn collect_garbage(&self) -> Result<u64> {
        let result = self.inner.collect_garbage().await;
        self.observe("collect_garbage", result)
    }
}

impl<B: TaggableBackend> TaggableBackend for InstrumentedBackend<B> {
    async fn flush_by_tag(&self, tag: &str) -> Result<u64> {
        let result = self.inner.flush_by_tag(tag).await;
        if let Ok(count) = &result {
            self.metrics.record_invalidation(tag, *count);
        }
        self.observe("flush_by_tag", result)
    }

    async fn find_identifiers_by_tag(&self, tag: &str) -> Result<HashSet<String>> {
        let result = self.inner.find_identifiers_by_tag(tag).await;
        self.observe("find_identifiers_by_tag", result)
    }
}

impl<B: FreezableBackend> FreezableBackend for InstrumentedBackend<B> {
    async fn freeze(&self) -> Result<()> {
        let result = self.inner.freeze().await;
        self.observe("freeze", result)
    }

    async fn is_frozen(&self) -> Result<bool> {
        let result = self.inner.is_frozen().await;
        self.observe("is_frozen", result)
    }
}

impl<B: IterableBackend> IterableBackend for InstrumentedBackend<B> {
    fn rewind(&mut self) {
        self.inner.rewind();
    }

    fn next(&mut self) {
        self.inner.next();
    }

    async fn key(&self) -> Result<Option<String>> {
        let result = self.inner.key().await;
        self.observe("key", result)
    }

    async fn valid(&self) -> Result<bool> {
        let result = self.inner.valid().await;
        self.observe("valid", result)
    }

    async fn current(&self) -> Result<Option<Vec<u8>>> {
        let result = self.inner.current().await;
        self.observe("current", result)
    }
}
