//! In-memory cache backend.
//!
//! Keeps the same key layout and data model as the Redis backend (byte
//! strings with expiry, lists, sets) in a process-local keyspace. Every
//! mutation runs under one write lock, so multi-key updates are atomic and
//! the optimistic retry loops of the Redis backend are unnecessary. Reads
//! share the read lock and skip expired keys without evicting them;
//! writes and `collect_garbage` evict.

use super::{
    expiry_seconds, BackendOptions, CacheBackend, FreezableBackend, IterableBackend,
    TaggableBackend,
};
use crate::error::{Error, Result};
use crate::key::KeyBuilder;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

#[derive(Clone, Debug)]
enum Value {
    Bytes(Vec<u8>),
    List(Vec<String>),
    Set(HashSet<String>),
}

#[derive(Clone, Debug)]
struct Slot {
    value: Value,
    expires_at: Option<Instant>,
}

impl Slot {
    fn persistent(value: Value) -> Self {
        Slot {
            value,
            expires_at: None,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Redis-like keyspace shared by every backend handle created from it.
///
/// A key always holds one kind of value; the key layout never mixes kinds
/// under one key, so reads of a mismatched kind behave as absent.
#[derive(Debug, Default)]
pub struct Keyspace {
    slots: HashMap<String, Slot>,
}

impl Keyspace {
    /// Slot for `key` unless it has expired. Expired slots stay in place
    /// until a write replaces them or `evict_expired` drops them.
    fn peek(&self, key: &str) -> Option<&Slot> {
        let now = Instant::now();
        self.slots.get(key).filter(|slot| !slot.is_expired(now))
    }

    /// Live slot for `key`, evicting it first if it has expired.
    fn live(&mut self, key: &str) -> Option<&mut Slot> {
        let now = Instant::now();
        if self.slots.get(key).is_some_and(|slot| slot.is_expired(now)) {
            self.slots.remove(key);
        }
        self.slots.get_mut(key)
    }

    fn get_bytes(&self, key: &str) -> Option<Vec<u8>> {
        match self.peek(key).map(|slot| &slot.value) {
            Some(Value::Bytes(data)) => Some(data.clone()),
            _ => None,
        }
    }

    /// A lifetime too long to represent as an instant stores without expiry.
    fn set_bytes(&mut self, key: &str, data: Vec<u8>, expiry: Option<Duration>) {
        let expires_at = expiry.and_then(|ttl| {
            Instant::now().checked_add(Duration::from_secs(expiry_seconds(ttl)))
        });
        self.slots.insert(
            key.to_string(),
            Slot {
                value: Value::Bytes(data),
                expires_at,
            },
        );
    }

    fn exists(&self, key: &str) -> bool {
        self.peek(key).is_some()
    }

    fn del(&mut self, key: &str) {
        self.slots.remove(key);
    }

    fn persist(&mut self, key: &str) {
        if let Some(slot) = self.live(key) {
            slot.expires_at = None;
        }
    }

    fn rpush(&mut self, key: &str, member: &str) {
        match self.live(key).map(|slot| &mut slot.value) {
            Some(Value::List(list)) => list.push(member.to_string()),
            _ => {
                self.slots.insert(
                    key.to_string(),
                    Slot::persistent(Value::List(vec![member.to_string()])),
                );
            }
        }
    }

    /// Remove every occurrence of `member`, dropping the list once empty.
    fn lrem_all(&mut self, key: &str, member: &str) {
        if let Some(Value::List(list)) = self.live(key).map(|slot| &mut slot.value) {
            list.retain(|item| item != member);
            if list.is_empty() {
                self.slots.remove(key);
            }
        }
    }

    fn lrange_all(&self, key: &str) -> Vec<String> {
        match self.peek(key).map(|slot| &slot.value) {
            Some(Value::List(list)) => list.clone(),
            _ => Vec::new(),
        }
    }

    fn lindex(&self, key: &str, index: usize) -> Option<String> {
        match self.peek(key).map(|slot| &slot.value) {
            Some(Value::List(list)) => list.get(index).cloned(),
            _ => None,
        }
    }

    fn sadd(&mut self, key: &str, member: &str) {
        match self.live(key).map(|slot| &mut slot.value) {
            Some(Value::Set(set)) => {
                set.insert(member.to_string());
            }
            _ => {
                let set = HashSet::from([member.to_string()]);
                self.slots
                    .insert(key.to_string(), Slot::persistent(Value::Set(set)));
            }
        }
    }

    /// Remove `member`, dropping the set once empty.
    fn srem(&mut self, key: &str, member: &str) {
        if let Some(Value::Set(set)) = self.live(key).map(|slot| &mut slot.value) {
            set.remove(member);
            if set.is_empty() {
                self.slots.remove(key);
            }
        }
    }

    fn smembers(&self, key: &str) -> HashSet<String> {
        match self.peek(key).map(|slot| &slot.value) {
            Some(Value::Set(set)) => set.clone(),
            _ => HashSet::new(),
        }
    }

    fn evict_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.slots.len();
        self.slots.retain(|_, slot| !slot.is_expired(now));
        before - self.slots.len()
    }
}

/// In-memory backend for tests, single-process deployments and benchmarks.
///
/// Clones share the keyspace but each carries its own iteration cursor.
///
/// # Example
///
/// ```
/// # use tagged_cache::backend::{BackendOptions, CacheBackend, InMemoryBackend, TaggableBackend};
/// # use tagged_cache::error::Result;
/// # async fn example() -> Result<()> {
/// let backend = InMemoryBackend::new(BackendOptions::new("pages"))?;
/// backend.set("home", b"<html>".to_vec(), &["layout"], None).await?;
///
/// assert_eq!(backend.flush_by_tag("layout").await?, 1);
/// assert!(!backend.has("home").await?);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct InMemoryBackend {
    keyspace: Arc<RwLock<Keyspace>>,
    keys: KeyBuilder,
    options: BackendOptions,
    entry_cursor: usize,
}

impl InMemoryBackend {
    /// Create a backend over a fresh keyspace.
    ///
    /// # Errors
    /// `Error::ConfigError` if the options are invalid.
    pub fn new(options: BackendOptions) -> Result<Self> {
        Self::with_keyspace(Arc::new(RwLock::new(Keyspace::default())), options)
    }

    /// Create a backend over an existing keyspace, the way several caches
    /// share one Redis database.
    ///
    /// # Errors
    /// `Error::ConfigError` if the options are invalid.
    pub fn with_keyspace(
        keyspace: Arc<RwLock<Keyspace>>,
        options: BackendOptions,
    ) -> Result<Self> {
        options.validate()?;
        debug!(
            "✓ In-memory backend initialized for cache \"{}\"",
            options.cache_identifier
        );
        Ok(InMemoryBackend {
            keyspace,
            keys: KeyBuilder::new(&options.cache_identifier),
            options,
            entry_cursor: 0,
        })
    }

    /// Handle to the underlying keyspace.
    pub fn keyspace(&self) -> Arc<RwLock<Keyspace>> {
        Arc::clone(&self.keyspace)
    }

    pub fn options(&self) -> &BackendOptions {
        &self.options
    }

    /// Number of live keys in the shared keyspace, across all caches.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let keyspace = self.keyspace.read().await;
        keyspace
            .slots
            .values()
            .filter(|slot| !slot.is_expired(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn frozen_error(&self) -> Error {
        Error::Frozen {
            cache_identifier: self.options.cache_identifier.clone(),
        }
    }

    /// Drop `entry_identifier` from the tag sets listed in its reverse index
    /// and delete the reverse index.
    fn unlink_tags(&self, keyspace: &mut Keyspace, entry_identifier: &str) {
        let tags_key = self.keys.tags(entry_identifier);
        for tag in keyspace.smembers(&tags_key) {
            keyspace.srem(&self.keys.tag(&tag), entry_identifier);
        }
        keyspace.del(&tags_key);
    }
}

impl CacheBackend for InMemoryBackend {
    fn cache_identifier(&self) -> &str {
        &self.options.cache_identifier
    }

    async fn set(
        &self,
        entry_identifier: &str,
        data: Vec<u8>,
        tags: &[&str],
        lifetime: Option<Duration>,
    ) -> Result<()> {
        let mut keyspace = self.keyspace.write().await;
        if keyspace.exists(&self.keys.frozen()) {
            return Err(self.frozen_error());
        }

        let expiry = self.options.resolve_lifetime(lifetime);
        keyspace.set_bytes(&self.keys.entry(entry_identifier), data, expiry);
        keyspace.rpush(&self.keys.entries(), entry_identifier);
        self.unlink_tags(&mut keyspace, entry_identifier);
        for tag in tags {
            keyspace.sadd(&self.keys.tag(tag), entry_identifier);
            keyspace.sadd(&self.keys.tags(entry_identifier), tag);
        }

        debug!(
            "✓ InMemory SET {} ({} tags, expiry: {:?})",
            entry_identifier,
            tags.len(),
            expiry
        );
        Ok(())
    }

    async fn get(&self, entry_identifier: &str) -> Result<Option<Vec<u8>>> {
        let keyspace = self.keyspace.read().await;
        let data = keyspace.get_bytes(&self.keys.entry(entry_identifier));
        if data.is_some() {
            debug!("✓ InMemory GET {} -> HIT", entry_identifier);
        } else {
            debug!("✓ InMemory GET {} -> MISS", entry_identifier);
        }
        Ok(data)
    }

    async fn has(&self, entry_identifier: &str) -> Result<bool> {
        let keyspace = self.keyspace.read().await;
        Ok(keyspace.exists(&self.keys.entry(entry_identifier)))
    }

    async fn remove(&self, entry_identifier: &str) -> Result<bool> {
        let mut keyspace = self.keyspace.write().await;
        if keyspace.exists(&self.keys.frozen()) {
            return Err(self.frozen_error());
        }

        keyspace.del(&self.keys.entry(entry_identifier));
        self.unlink_tags(&mut keyspace, entry_identifier);
        keyspace.lrem_all(&self.keys.entries(), entry_identifier);

        debug!("✓ InMemory REMOVE {}", entry_identifier);
        Ok(true)
    }

    async fn flush(&self) -> Result<()> {
        let mut keyspace = self.keyspace.write().await;
        let entries_key = self.keys.entries();

        for entry_identifier in keyspace.lrange_all(&entries_key) {
            keyspace.del(&self.keys.entry(&entry_identifier));
            let tags_key = self.keys.tags(&entry_identifier);
            for tag in keyspace.smembers(&tags_key) {
                keyspace.del(&self.keys.tag(&tag));
            }
            keyspace.del(&tags_key);
        }
        keyspace.del(&entries_key);
        keyspace.del(&self.keys.frozen());

        warn!(
            "⚠ InMemory FLUSH executed - cache \"{}\" cleared",
            self.options.cache_identifier
        );
        Ok(())
    }

    async fn collect_garbage(&self) -> Result<u64> {
        let mut keyspace = self.keyspace.write().await;
        let evicted = keyspace.evict_expired();
        if keyspace.exists(&self.keys.frozen()) {
            return Ok(0);
        }

        let entries_key = self.keys.entries();
        let mut seen = HashSet::new();
        let mut pruned = 0;
        for entry_identifier in keyspace.lrange_all(&entries_key) {
            if !seen.insert(entry_identifier.clone()) {
                continue;
            }
            if keyspace.exists(&self.keys.entry(&entry_identifier)) {
                continue;
            }
            self.unlink_tags(&mut keyspace, &entry_identifier);
            keyspace.lrem_all(&entries_key, &entry_identifier);
            pruned += 1;
        }

        debug!(
            "✓ InMemory GC pruned {} identifiers ({} expired keys evicted)",
            pruned, evicted
        );
        Ok(pruned)
    }
}

impl TaggableBackend for InMemoryBackend {
    async fn flush_by_tag(&self, tag: &str) -> Result<u64> {
        let mut keyspace = self.keyspace.write().await;
        if keyspace.exists(&self.keys.frozen()) {
            return Err(self.frozen_error());
        }

        let affected = keyspace.smembers(&self.keys.tag(tag));
        for entry_identifier in &affected {
            keyspace.del(&self.keys.entry(entry_identifier));
            self.unlink_tags(&mut keyspace, entry_identifier);
        }

        debug!(
            "✓ InMemory FLUSH_BY_TAG {} ({} entries)",
            tag,
            affected.len()
        );
        Ok(affected.len() as u64)
    }

    async fn find_identifiers_by_tag(&self, tag: &str) -> Result<HashSet<String>> {
        let keyspace = self.keyspace.read().await;
        Ok(keyspace.smembers(&self.keys.tag(tag)))
    }
}

impl FreezableBackend for InMemoryBackend {
    async fn freeze(&self) -> Result<()> {
        let mut keyspace = self.keyspace.write().await;
        let frozen_key = self.keys.frozen();
        if keyspace.exists(&frozen_key) {
            return Err(self.frozen_error());
        }

        let entries = keyspace.lrange_all(&self.keys.entries());
        for entry_identifier in &entries {
            keyspace.persist(&self.keys.entry(entry_identifier));
        }
        keyspace.set_bytes(&frozen_key, b"1".to_vec(), None);

        info!(
            "✓ InMemory FREEZE cache \"{}\" ({} entries persisted)",
            self.options.cache_identifier,
            entries.len()
        );
        Ok(())
    }

    async fn is_frozen(&self) -> Result<bool> {
        let keyspace = self.keyspace.read().await;
        Ok(keyspace.exists(&self.keys.frozen()))
    }
}

impl IterableBackend for InMemoryBackend {
    fn rewind(&mut self) {
        self.entry_cursor = 0;
    }

    fn next(&mut self) {
        self.entry_cursor += 1;
    }

    async fn key(&self) -> Result<Option<String>> {
        let keyspace = self.keyspace.read().await;
        Ok(keyspace.lindex(&self.keys.entries(), self.entry_cursor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(cache_identifier: &str) -> InMemoryBackend {
        let options = BackendOptions::new(cache_identifier).with_default_lifetime(0);
        InMemoryBackend::new(options).expect("Failed to create backend")
    }

    #[tokio::test]
    async fn test_set_writes_redis_key_layout() {
        let backend = backend("pages");
        backend
            .set("home", b"v".to_vec(), &["red", "blue"], None)
            .await
            .expect("Failed to set");

        let keyspace = backend.keyspace();
        let keyspace = keyspace.read().await;
        assert_eq!(keyspace.get_bytes("pages:entry:home"), Some(b"v".to_vec()));
        assert_eq!(keyspace.lrange_all("pages:entries"), vec!["home"]);
        assert!(keyspace.smembers("pages:tag:red").contains("home"));
        assert!(keyspace.smembers("pages:tag:blue").contains("home"));
        assert_eq!(
            keyspace.smembers("pages:tags:home"),
            HashSet::from(["red".to_string(), "blue".to_string()])
        );
    }

    #[tokio::test]
    async fn test_set_appends_duplicates_to_entries_index() {
        let backend = backend("pages");
        backend
            .set("a", b"1".to_vec(), &[], None)
            .await
            .expect("Failed to set");
        backend
            .set("a", b"2".to_vec(), &[], None)
            .await
            .expect("Failed to set");

        let keyspace = backend.keyspace();
        assert_eq!(
            keyspace.read().await.lrange_all("pages:entries"),
            vec!["a", "a"]
        );
        assert_eq!(
            backend.get("a").await.expect("Failed to get"),
            Some(b"2".to_vec())
        );
    }

    #[tokio::test]
    async fn test_overwrite_replaces_tags() {
        let backend = backend("pages");
        backend
            .set("a", b"1".to_vec(), &["red", "blue"], None)
            .await
            .expect("Failed to set");
        backend
            .set("a", b"2".to_vec(), &["blue", "green"], None)
            .await
            .expect("Failed to set");

        assert!(backend
            .find_identifiers_by_tag("red")
            .await
            .expect("Failed to find")
            .is_empty());
        assert!(backend
            .find_identifiers_by_tag("green")
            .await
            .expect("Failed to find")
            .contains("a"));

        let keyspace = backend.keyspace();
        assert_eq!(
            keyspace.read().await.smembers("pages:tags:a"),
            HashSet::from(["blue".to_string(), "green".to_string()])
        );
    }

    #[tokio::test]
    async fn test_remove_cleans_all_occurrences_and_tags() {
        let backend = backend("pages");
        for (identifier, data) in [("a", "1"), ("a", "2"), ("b", "3")] {
            backend
                .set(identifier, data.as_bytes().to_vec(), &["red"], None)
                .await
                .expect("Failed to set");
        }

        assert!(backend.remove("a").await.expect("Failed to remove"));

        let keyspace = backend.keyspace();
        let keyspace = keyspace.read().await;
        assert_eq!(keyspace.lrange_all("pages:entries"), vec!["b"]);
        assert!(!keyspace.exists("pages:tags:a"));
        assert_eq!(
            keyspace.smembers("pages:tag:red"),
            HashSet::from(["b".to_string()])
        );
    }

    #[tokio::test]
    async fn test_remove_of_missing_entry_returns_true() {
        let backend = backend("pages");
        assert!(backend.remove("missing").await.expect("Failed to remove"));
    }

    #[tokio::test]
    async fn test_flush_by_tag_leaves_stale_index_entries() {
        let mut backend = backend("pages");
        backend
            .set("a", b"1".to_vec(), &["red"], None)
            .await
            .expect("Failed to set");
        backend
            .set("b", b"2".to_vec(), &["blue"], None)
            .await
            .expect("Failed to set");

        assert_eq!(
            backend.flush_by_tag("red").await.expect("Failed to flush"),
            1
        );

        backend.rewind();
        assert_eq!(
            backend.key().await.expect("Failed to key"),
            Some("a".to_string())
        );
        assert_eq!(backend.current().await.expect("Failed to current"), None);
        backend.next();
        assert_eq!(
            backend.current().await.expect("Failed to current"),
            Some(b"2".to_vec())
        );
    }

    #[tokio::test]
    async fn test_collect_garbage_prunes_stale_identifiers() {
        let mut backend = backend("pages");
        backend
            .set("a", b"1".to_vec(), &["red", "blue"], None)
            .await
            .expect("Failed to set");
        backend
            .set("a", b"1".to_vec(), &["red"], None)
            .await
            .expect("Failed to set");
        backend
            .set("b", b"2".to_vec(), &["blue"], None)
            .await
            .expect("Failed to set");
        backend.flush_by_tag("red").await.expect("Failed to flush");

        assert_eq!(backend.collect_garbage().await.expect("Failed to gc"), 1);

        backend.rewind();
        assert_eq!(
            backend.key().await.expect("Failed to key"),
            Some("b".to_string())
        );
        backend.next();
        assert!(!backend.valid().await.expect("Failed to check"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_collect_garbage_unlinks_expired_entries() {
        let backend = backend("pages");
        backend
            .set("short", b"1".to_vec(), &["red"], Some(Duration::from_secs(2)))
            .await
            .expect("Failed to set");

        tokio::time::advance(Duration::from_secs(3)).await;

        assert!(backend
            .find_identifiers_by_tag("red")
            .await
            .expect("Failed to find")
            .contains("short"));
        assert_eq!(backend.collect_garbage().await.expect("Failed to gc"), 1);
        assert!(backend
            .find_identifiers_by_tag("red")
            .await
            .expect("Failed to find")
            .is_empty());
        assert!(backend.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reads_skip_expired_keys_without_evicting() {
        let backend = backend("pages");
        backend
            .set("short", b"1".to_vec(), &[], Some(Duration::from_secs(2)))
            .await
            .expect("Failed to set");

        tokio::time::advance(Duration::from_secs(3)).await;

        assert_eq!(backend.get("short").await.expect("Failed to get"), None);
        assert!(!backend.has("short").await.expect("Failed to check"));

        // The expired slot is still stored until a write evicts it.
        let keyspace = backend.keyspace();
        let stored = keyspace.read().await.slots.contains_key("pages:entry:short");
        assert!(stored);

        backend.collect_garbage().await.expect("Failed to gc");
        let stored = keyspace.read().await.slots.contains_key("pages:entry:short");
        assert!(!stored);
    }

    #[tokio::test]
    async fn test_concurrent_readers_share_the_lock() {
        let backend = backend("pages");
        backend
            .set("a", b"1".to_vec(), &["red"], None)
            .await
            .expect("Failed to set");

        // Holding a read guard must not block other reads.
        let keyspace = backend.keyspace();
        let _guard = keyspace.read().await;
        assert_eq!(
            backend.get("a").await.expect("Failed to get"),
            Some(b"1".to_vec())
        );
        assert!(backend.has("a").await.expect("Failed to check"));
        assert!(!backend.is_frozen().await.expect("Failed to check frozen"));
        assert!(backend
            .find_identifiers_by_tag("red")
            .await
            .expect("Failed to find")
            .contains("a"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_oversized_lifetimes_store_without_expiry() {
        let backend = backend("pages");
        backend
            .set("max", b"1".to_vec(), &[], Some(Duration::MAX))
            .await
            .expect("Failed to set");
        backend
            .set("half", b"2".to_vec(), &[], Some(Duration::from_secs(u64::MAX / 2)))
            .await
            .expect("Failed to set");

        let huge_default = InMemoryBackend::with_keyspace(
            backend.keyspace(),
            BackendOptions::new("pages").with_default_lifetime(u64::MAX),
        )
        .expect("Failed to create backend");
        huge_default
            .set("default", b"3".to_vec(), &[], None)
            .await
            .expect("Failed to set");

        tokio::time::advance(Duration::from_secs(3600 * 24 * 365)).await;

        for identifier in ["max", "half", "default"] {
            assert!(backend.has(identifier).await.expect("Failed to check"));
        }
    }

    #[test]
    fn test_unrepresentable_expiry_is_dropped() {
        let mut keyspace = Keyspace::default();
        keyspace.set_bytes("k", b"v".to_vec(), Some(Duration::MAX));
        assert_eq!(
            keyspace.slots.get("k").map(|slot| slot.expires_at),
            Some(None)
        );
    }

    #[tokio::test]
    async fn test_collect_garbage_is_noop_when_frozen() {
        let backend = backend("pages");
        backend
            .set("a", b"1".to_vec(), &["red"], None)
            .await
            .expect("Failed to set");
        backend
            .set("b", b"2".to_vec(), &["blue"], None)
            .await
            .expect("Failed to set");
        backend.flush_by_tag("red").await.expect("Failed to flush");
        backend.freeze().await.expect("Failed to freeze");

        assert_eq!(backend.collect_garbage().await.expect("Failed to gc"), 0);

        let keyspace = backend.keyspace();
        assert_eq!(
            keyspace.read().await.lrange_all("pages:entries"),
            vec!["a", "b"]
        );
    }

    #[tokio::test]
    async fn test_caches_sharing_a_keyspace_are_isolated() {
        let pages = backend("pages");
        let users = InMemoryBackend::with_keyspace(pages.keyspace(), BackendOptions::new("users"))
            .expect("Failed to create backend");

        pages
            .set("1", b"page".to_vec(), &["t"], None)
            .await
            .expect("Failed to set");
        users
            .set("1", b"user".to_vec(), &["t"], None)
            .await
            .expect("Failed to set");

        pages.flush().await.expect("Failed to flush");

        assert!(!pages.has("1").await.expect("Failed to check"));
        assert_eq!(
            users.get("1").await.expect("Failed to get"),
            Some(b"user".to_vec())
        );
        assert!(users
            .find_identifiers_by_tag("t")
            .await
            .expect("Failed to find")
            .contains("1"));
    }

    #[tokio::test]
    async fn test_clones_keep_their_own_cursor() {
        let mut first = backend("pages");
        first
            .set("a", b"1".to_vec(), &[], None)
            .await
            .expect("Failed to set");
        first
            .set("b", b"2".to_vec(), &[], None)
            .await
            .expect("Failed to set");

        let second = first.clone();
        first.next();

        assert_eq!(
            first.key().await.expect("Failed to key"),
            Some("b".to_string())
        );
        assert_eq!(
            second.key().await.expect("Failed to key"),
            Some("a".to_string())
        );
    }

    #[test]
    fn test_invalid_options_are_rejected() {
        let result = InMemoryBackend::new(BackendOptions::new(""));
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }
}
