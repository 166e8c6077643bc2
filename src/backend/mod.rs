//! Cache backend traits and implementations.
//!
//! A backend is split into capability traits the way callers consume it:
//!
//! - [`CacheBackend`]: entry storage (`set`, `get`, `has`, `remove`, `flush`)
//! - [`TaggableBackend`]: bulk lookup and invalidation by tag
//! - [`FreezableBackend`]: read-only, non-expiring mode
//! - [`IterableBackend`]: cursor over the entries index
//!
//! Both [`InMemoryBackend`] and [`RedisBackend`] implement all four over the
//! same key layout (see [`crate::key`]).

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

#[cfg(feature = "inmemory")]
pub mod inmemory;
#[cfg(feature = "redis")]
pub mod redis;

#[cfg(feature = "inmemory")]
pub use self::inmemory::InMemoryBackend;
#[cfg(feature = "redis")]
pub use self::redis::{RedisBackend, RedisConfig};

/// Default entry lifetime in seconds when none is configured.
pub const DEFAULT_LIFETIME_SECS: u64 = 3600;

/// Default cap on WATCH/EXEC attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// Longest expiry handed to the store, in seconds. Longer lifetimes are
/// stored without expiry.
pub const MAX_EXPIRY_SECS: u64 = 1 << 40;

/// Upper bound for the pause between optimistic retries.
const MAX_BACKOFF_MS: u64 = 50;

/// Entry storage operations.
pub trait CacheBackend: Send + Sync {
    /// Identifier every key of this backend is namespaced under.
    fn cache_identifier(&self) -> &str;

    /// Store `data` under `entry_identifier`, replacing any previous value.
    ///
    /// `lifetime: None` uses the configured default; `Some(Duration::ZERO)`
    /// stores the entry without expiry.
    ///
    /// # Errors
    /// - `Error::Frozen` if the backend is frozen
    /// - `Error::BackendError` if the store rejects the transaction
    fn set(
        &self,
        entry_identifier: &str,
        data: Vec<u8>,
        tags: &[&str],
        lifetime: Option<Duration>,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Load an entry. `Ok(None)` when absent or expired.
    fn get(&self, entry_identifier: &str) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send;

    /// Whether an entry exists. Tag indexes are not consulted.
    fn has(&self, entry_identifier: &str) -> impl Future<Output = Result<bool>> + Send;

    /// Remove an entry together with its tag associations.
    ///
    /// Returns `true` once the removal committed, whether or not the entry
    /// existed beforehand.
    fn remove(&self, entry_identifier: &str) -> impl Future<Output = Result<bool>> + Send;

    /// Remove every entry and tag of this cache and leave the frozen state.
    ///
    /// This is the only mutating operation permitted on a frozen backend.
    fn flush(&self) -> impl Future<Output = Result<()>> + Send;

    /// Prune identifiers of entries that no longer exist from the entries
    /// index and tag sets. Returns the number of distinct identifiers pruned.
    ///
    /// Does nothing on a frozen backend.
    fn collect_garbage(&self) -> impl Future<Output = Result<u64>> + Send;
}

/// Tag index operations.
pub trait TaggableBackend: CacheBackend {
    /// Remove all entries carrying `tag`. Returns how many were affected.
    ///
    /// Identifiers stay in the entries index until `remove` or
    /// `collect_garbage` drops them.
    fn flush_by_tag(&self, tag: &str) -> impl Future<Output = Result<u64>> + Send;

    /// Identifiers currently recorded under `tag`.
    fn find_identifiers_by_tag(
        &self,
        tag: &str,
    ) -> impl Future<Output = Result<HashSet<String>>> + Send;
}

/// Frozen mode.
pub trait FreezableBackend: CacheBackend {
    /// Strip the expiry of every stored entry and mark the backend frozen.
    ///
    /// # Errors
    /// `Error::Frozen` if already frozen.
    fn freeze(&self) -> impl Future<Output = Result<()>> + Send;

    fn is_frozen(&self) -> impl Future<Output = Result<bool>> + Send;
}

/// Forward cursor over the positions of the entries index.
///
/// The cursor walks list positions, not live entries: `current` yields
/// `None` for identifiers whose entry was flushed by tag or expired.
pub trait IterableBackend: CacheBackend {
    /// Move the cursor back to the first position.
    fn rewind(&mut self);

    /// Advance the cursor by one position.
    fn next(&mut self);

    /// Identifier at the cursor, `None` past the end.
    fn key(&self) -> impl Future<Output = Result<Option<String>>> + Send;

    fn valid(&self) -> impl Future<Output = Result<bool>> + Send {
        async move { Ok(self.key().await?.is_some()) }
    }

    /// Data of the entry at the cursor.
    fn current(&self) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send {
        async move {
            match self.key().await? {
                Some(entry_identifier) => self.get(&entry_identifier).await,
                None => Ok(None),
            }
        }
    }
}

/// How often optimistic WATCH/EXEC loops may retry on conflict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryPolicy {
    /// Retry until the transaction commits.
    Unbounded,
    /// Give up with `Error::ConcurrentModification` after `max_attempts`.
    Bounded { max_attempts: u32 },
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::Bounded {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl RetryPolicy {
    /// Whether another attempt may follow `attempts` aborted ones.
    pub fn permits(&self, attempts: u32) -> bool {
        match self {
            RetryPolicy::Unbounded => true,
            RetryPolicy::Bounded { max_attempts } => attempts < *max_attempts,
        }
    }

    /// Pause before the next attempt after `attempts` aborted transactions
    /// on `key`, doubling from 1 ms up to 50 ms.
    ///
    /// # Errors
    /// `Error::ConcurrentModification` once the policy allows no further
    /// attempt.
    pub fn delay_after(&self, key: &str, attempts: u32) -> Result<Duration> {
        if !self.permits(attempts) {
            return Err(Error::ConcurrentModification {
                key: key.to_string(),
                attempts,
            });
        }
        let delay = 2_u64
            .saturating_pow(attempts.saturating_sub(1))
            .min(MAX_BACKOFF_MS);
        Ok(Duration::from_millis(delay))
    }
}

/// Settings shared by every backend implementation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BackendOptions {
    pub cache_identifier: String,
    /// Seconds; 0 stores entries without expiry.
    pub default_lifetime: u64,
    pub retry_policy: RetryPolicy,
}

impl Default for BackendOptions {
    fn default() -> Self {
        BackendOptions {
            cache_identifier: "default".to_string(),
            default_lifetime: DEFAULT_LIFETIME_SECS,
            retry_policy: RetryPolicy::default(),
        }
    }
}

impl BackendOptions {
    pub fn new(cache_identifier: impl Into<String>) -> Self {
        BackendOptions {
            cache_identifier: cache_identifier.into(),
            ..Default::default()
        }
    }

    pub fn with_default_lifetime(mut self, seconds: u64) -> Self {
        self.default_lifetime = seconds;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// # Errors
    /// `Error::ConfigError` for an empty cache identifier or a zero attempt cap.
    pub fn validate(&self) -> Result<()> {
        if self.cache_identifier.is_empty() {
            return Err(Error::ConfigError(
                "cache identifier must not be empty".to_string(),
            ));
        }
        if let RetryPolicy::Bounded { max_attempts: 0 } = self.retry_policy {
            return Err(Error::ConfigError(
                "retry policy must allow at least one attempt".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve a requested lifetime to the expiry to apply, `None` meaning
    /// no expiry.
    ///
    /// Zero and lifetimes beyond [`MAX_EXPIRY_SECS`] both store without
    /// expiry.
    pub fn resolve_lifetime(&self, lifetime: Option<Duration>) -> Option<Duration> {
        let lifetime = lifetime.unwrap_or(Duration::from_secs(self.default_lifetime));
        if lifetime.is_zero() || expiry_seconds(lifetime) > MAX_EXPIRY_SECS {
            None
        } else {
            Some(lifetime)
        }
    }
}

/// Whole seconds the store should keep an entry, rounding partial seconds up.
pub(crate) fn expiry_seconds(lifetime: Duration) -> u64 {
    lifetime
        .as_secs()
        .saturating_add(u64::from(lifetime.subsec_nanos() > 0))
}
