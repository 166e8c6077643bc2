//! Redis cache backend implementation.
//!
//! Multi-key writes go through MULTI/EXEC or Lua scripts so no client can
//! observe an entry without its tag index. `set`, `remove` and `freeze` read
//! before they write and use WATCH to retry when another client interferes.

use super::{
    expiry_seconds, BackendOptions, CacheBackend, FreezableBackend, IterableBackend,
    TaggableBackend,
};
use crate::error::{Error, Result};
use crate::key::KeyBuilder;
use deadpool_redis::{Config, Connection, Pool, PoolConfig, Runtime};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Default Redis connection pool size.
const DEFAULT_POOL_SIZE: usize = 16;

/// Oldest server version with Lua scripting.
const MIN_SERVER_VERSION: (u32, u32) = (2, 6);

/// Removes every entry and tag of a cache, then the index and frozen marker.
///
/// KEYS[1]: entries list, KEYS[2]: frozen marker, ARGV[1]: key prefix
const FLUSH_SCRIPT: &str = r"
local entries = redis.call('LRANGE', KEYS[1], 0, -1)
for _, entry_identifier in ipairs(entries) do
    redis.call('DEL', ARGV[1] .. 'entry:' .. entry_identifier)
    local tags_key = ARGV[1] .. 'tags:' .. entry_identifier
    for _, tag in ipairs(redis.call('SMEMBERS', tags_key)) do
        redis.call('DEL', ARGV[1] .. 'tag:' .. tag)
    end
    redis.call('DEL', tags_key)
end
redis.call('DEL', KEYS[1], KEYS[2])
return #entries
";

/// Removes every entry carrying a tag and unlinks it from its other tags.
/// The entries list is left alone.
///
/// KEYS[1]: tag set, KEYS[2]: frozen marker, ARGV[1]: key prefix
/// Returns the number of affected entries, or -1 when frozen.
const FLUSH_BY_TAG_SCRIPT: &str = r"
if redis.call('EXISTS', KEYS[2]) == 1 then
    return -1
end
local entries = redis.call('SMEMBERS', KEYS[1])
for _, entry_identifier in ipairs(entries) do
    redis.call('DEL', ARGV[1] .. 'entry:' .. entry_identifier)
    local tags_key = ARGV[1] .. 'tags:' .. entry_identifier
    for _, tag in ipairs(redis.call('SMEMBERS', tags_key)) do
        redis.call('SREM', ARGV[1] .. 'tag:' .. tag, entry_identifier)
    end
    redis.call('DEL', tags_key)
end
return #entries
";

/// Drops identifiers whose entry no longer exists from the entries list and
/// from the tag sets that still reference them.
///
/// KEYS[1]: entries list, KEYS[2]: frozen marker, ARGV[1]: key prefix
/// Returns the number of distinct identifiers pruned.
const COLLECT_GARBAGE_SCRIPT: &str = r"
if redis.call('EXISTS', KEYS[2]) == 1 then
    return 0
end
local pruned = 0
local seen = {}
for _, entry_identifier in ipairs(redis.call('LRANGE', KEYS[1], 0, -1)) do
    if not seen[entry_identifier] then
        seen[entry_identifier] = true
        if redis.call('EXISTS', ARGV[1] .. 'entry:' .. entry_identifier) == 0 then
            local tags_key = ARGV[1] .. 'tags:' .. entry_identifier
            for _, tag in ipairs(redis.call('SMEMBERS', tags_key)) do
                redis.call('SREM', ARGV[1] .. 'tag:' .. tag, entry_identifier)
            end
            redis.call('DEL', tags_key)
            redis.call('LREM', KEYS[1], 0, entry_identifier)
            pruned = pruned + 1
        end
    end
end
return pruned
";

/// Configuration for the Redis backend.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Host name, or an absolute unix socket path when it starts with `/`.
    pub hostname: String,
    pub port: u16,
    pub database: u32,
    pub password: Option<String>,
    pub pool_size: usize,
    pub connection_timeout_secs: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        RedisConfig {
            hostname: "127.0.0.1".to_string(),
            port: 6379,
            database: 0,
            password: None,
            pool_size: DEFAULT_POOL_SIZE,
            connection_timeout_secs: 5,
        }
    }
}

impl fmt::Debug for RedisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisConfig")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("pool_size", &self.pool_size)
            .field("connection_timeout_secs", &self.connection_timeout_secs)
            .finish()
    }
}

impl RedisConfig {
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }

    /// Render the connection URL understood by the `redis` crate.
    pub fn connection_url(&self) -> String {
        if self.hostname.starts_with('/') {
            let mut url = format!("redis+unix://{}?db={}", self.hostname, self.database);
            if let Some(password) = &self.password {
                url.push_str("&pass=");
                url.push_str(&percent_encode(password));
            }
            url
        } else {
            let credentials = self
                .password
                .as_ref()
                .map(|password| format!(":{}@", percent_encode(password)))
                .unwrap_or_default();
            format!(
                "redis://{}{}:{}/{}",
                credentials, self.hostname, self.port, self.database
            )
        }
    }
}

/// Everything outside the RFC 3986 unreserved set.
const URL_ESCAPED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn percent_encode(value: &str) -> String {
    utf8_percent_encode(value, URL_ESCAPED).to_string()
}

/// Redact credentials from a Redis URL for logging.
fn redact_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            return format!("{}***{}", &url[..=colon_pos], &url[at_pos..]);
        }
    }
    if let Some(pass_pos) = url.find("pass=") {
        let end = url[pass_pos..]
            .find('&')
            .map_or(url.len(), |offset| pass_pos + offset);
        return format!("{}***{}", &url[..pass_pos + 5], &url[end..]);
    }
    url.to_string()
}

/// Extract `major.minor` from the output of `INFO server`.
fn parse_server_version(info: &str) -> Option<(u32, u32)> {
    let version = info
        .lines()
        .find_map(|line| line.trim().strip_prefix("redis_version:"))?;
    let mut parts = version.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    Some((major, minor))
}

const FROZEN_UNKNOWN: u8 = 0;
const FROZEN_NO: u8 = 1;
const FROZEN_YES: u8 = 2;

/// Lazily resolved frozen state, shared by clones of one backend.
#[derive(Clone, Debug)]
struct FrozenFlag(Arc<AtomicU8>);

impl Default for FrozenFlag {
    fn default() -> Self {
        FrozenFlag(Arc::new(AtomicU8::new(FROZEN_UNKNOWN)))
    }
}

impl FrozenFlag {
    fn get(&self) -> Option<bool> {
        match self.0.load(Ordering::Acquire) {
            FROZEN_NO => Some(false),
            FROZEN_YES => Some(true),
            _ => None,
        }
    }

    fn store(&self, frozen: bool) {
        let state = if frozen { FROZEN_YES } else { FROZEN_NO };
        self.0.store(state, Ordering::Release);
    }
}

/// Redis backend with connection pooling and tag indexes.
///
/// Clones share the connection pool and the cached frozen state; each
/// clone carries its own iteration cursor.
///
/// # Example
///
/// ```no_run
/// # use tagged_cache::backend::{BackendOptions, CacheBackend, RedisBackend, RedisConfig};
/// # use tagged_cache::error::Result;
/// # async fn example() -> Result<()> {
/// let backend = RedisBackend::new(RedisConfig::default(), BackendOptions::new("pages")).await?;
/// backend.set("home", b"<html>".to_vec(), &["layout"], None).await?;
/// let value = backend.get("home").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RedisBackend {
    pool: Pool,
    keys: KeyBuilder,
    options: BackendOptions,
    frozen: FrozenFlag,
    entry_cursor: usize,
}

impl fmt::Debug for RedisBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisBackend")
            .field("pool", &"Pool")
            .field("keys", &self.keys)
            .field("options", &self.options)
            .field("frozen", &self.frozen.get())
            .field("entry_cursor", &self.entry_cursor)
            .finish()
    }
}

impl RedisBackend {
    /// Connect to the server described by `config`.
    ///
    /// # Errors
    /// - `Error::ConfigError` if the options or pool settings are invalid
    /// - `Error::ConnectionError` if the server cannot be reached, the
    ///   database cannot be selected, or the server lacks Lua scripting
    pub async fn new(config: RedisConfig, options: BackendOptions) -> Result<Self> {
        let mut pool_config = PoolConfig::new(config.pool_size);
        pool_config.timeouts.wait = Some(config.connection_timeout());
        pool_config.timeouts.create = Some(config.connection_timeout());

        let mut pool_settings = Config::from_url(config.connection_url());
        pool_settings.pool = Some(pool_config);

        Self::from_pool_settings(pool_settings, config.pool_size, options).await
    }

    /// Connect using a `redis://` or `redis+unix://` URL directly.
    ///
    /// # Errors
    /// Same as [`RedisBackend::new`].
    pub async fn from_url(url: &str, options: BackendOptions) -> Result<Self> {
        let mut pool_settings = Config::from_url(url);
        pool_settings.pool = Some(PoolConfig::new(DEFAULT_POOL_SIZE));
        Self::from_pool_settings(pool_settings, DEFAULT_POOL_SIZE, options).await
    }

    async fn from_pool_settings(
        pool_settings: Config,
        pool_size: usize,
        options: BackendOptions,
    ) -> Result<Self> {
        options.validate()?;

        let url = pool_settings
            .url
            .as_deref()
            .map(redact_url)
            .unwrap_or_default();

        let pool = pool_settings
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| Error::ConfigError(format!("Failed to create connection pool: {}", e)))?;

        let backend = RedisBackend {
            pool,
            keys: KeyBuilder::new(&options.cache_identifier),
            options,
            frozen: FrozenFlag::default(),
            entry_cursor: 0,
        };
        backend.verify_server().await?;

        info!(
            "✓ Redis backend initialized for cache \"{}\" at {} (pool size: {})",
            backend.options.cache_identifier,
            url,
            pool_size
        );
        Ok(backend)
    }

    /// Check the server answers and supports Lua scripting.
    async fn verify_server(&self) -> Result<()> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| Error::ConnectionError(format!("Failed to connect to Redis: {}", e)))?;

        let info: String = redis::cmd("INFO")
            .arg("server")
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::ConnectionError(format!("Redis INFO failed: {}", e)))?;

        match parse_server_version(&info) {
            Some(version) if version < MIN_SERVER_VERSION => Err(Error::ConnectionError(format!(
                "Redis {}.{} does not support Lua scripting, at least {}.{} is required",
                version.0, version.1, MIN_SERVER_VERSION.0, MIN_SERVER_VERSION.1
            ))),
            Some(_) => Ok(()),
            None => {
                warn!("⚠ Could not determine Redis server version, assuming scripting support");
                Ok(())
            }
        }
    }

    pub fn options(&self) -> &BackendOptions {
        &self.options
    }

    pub async fn health_check(&self) -> Result<bool> {
        match self.pool.get().await {
            Ok(mut conn) => {
                let pong: redis::RedisResult<String> =
                    redis::cmd("PING").query_async(&mut conn).await;
                Ok(matches!(pong, Ok(reply) if reply == "PONG"))
            }
            Err(_) => Ok(false),
        }
    }

    async fn connection(&self) -> Result<Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| Error::BackendError(format!("Failed to get Redis connection: {}", e)))
    }

    fn frozen_error(&self) -> Error {
        Error::Frozen {
            cache_identifier: self.options.cache_identifier.clone(),
        }
    }

    async fn ensure_not_frozen(&self) -> Result<()> {
        if self.is_frozen().await? {
            return Err(self.frozen_error());
        }
        Ok(())
    }

    /// Decide whether an aborted transaction on `key` may be retried, and
    /// pause briefly if so.
    async fn after_conflict(&self, key: &str, attempts: u32) -> Result<()> {
        let delay = self.options.retry_policy.delay_after(key, attempts)?;
        warn!("Concurrent modification of {} (attempt {}), retrying...", key, attempts);
        tokio::time::sleep(delay).await;
        Ok(())
    }

    /// One WATCH/MULTI/EXEC round of `set`. `None` when EXEC aborted.
    ///
    /// Tags the entry carried before and does not carry now are unlinked in
    /// the same transaction, so an overwrite replaces the tag set too.
    async fn try_set(
        &self,
        conn: &mut Connection,
        entry_identifier: &str,
        data: &[u8],
        tags: &[&str],
        expiry: Option<Duration>,
        tags_key: &str,
    ) -> redis::RedisResult<Option<()>> {
        redis::cmd("WATCH")
            .arg(tags_key)
            .query_async::<()>(&mut *conn)
            .await?;
        let previous_tags: Vec<String> = redis::cmd("SMEMBERS")
            .arg(tags_key)
            .query_async(&mut *conn)
            .await?;

        let mut set_entry = redis::cmd("SET");
        set_entry.arg(self.keys.entry(entry_identifier)).arg(data);
        if let Some(ttl) = expiry {
            set_entry.arg("EX").arg(expiry_seconds(ttl));
        }

        let mut pipe = redis::pipe();
        pipe.atomic().add_command(set_entry).ignore();
        pipe.cmd("RPUSH")
            .arg(self.keys.entries())
            .arg(entry_identifier)
            .ignore();
        for stale in previous_tags
            .iter()
            .filter(|tag| !tags.contains(&tag.as_str()))
        {
            pipe.cmd("SREM")
                .arg(self.keys.tag(stale))
                .arg(entry_identifier)
                .ignore();
            pipe.cmd("SREM").arg(tags_key).arg(stale).ignore();
        }
        for tag in tags {
            pipe.cmd("SADD")
                .arg(self.keys.tag(tag))
                .arg(entry_identifier)
                .ignore();
            pipe.cmd("SADD").arg(tags_key).arg(*tag).ignore();
        }

        pipe.query_async(&mut *conn).await
    }

    /// One WATCH/MULTI/EXEC round of `remove`. `None` when EXEC aborted.
    async fn try_remove(
        &self,
        conn: &mut Connection,
        entry_identifier: &str,
        tags_key: &str,
    ) -> redis::RedisResult<Option<()>> {
        redis::cmd("WATCH")
            .arg(tags_key)
            .query_async::<()>(&mut *conn)
            .await?;
        let tags: Vec<String> = redis::cmd("SMEMBERS")
            .arg(tags_key)
            .query_async(&mut *conn)
            .await?;

        let mut pipe = redis::pipe();
        pipe.atomic()
            .cmd("DEL")
            .arg(self.keys.entry(entry_identifier))
            .ignore();
        for tag in &tags {
            pipe.cmd("SREM")
                .arg(self.keys.tag(tag))
                .arg(entry_identifier)
                .ignore();
        }
        pipe.cmd("DEL").arg(tags_key).ignore();
        pipe.cmd("LREM")
            .arg(self.keys.entries())
            .arg(0)
            .arg(entry_identifier)
            .ignore();

        pipe.query_async(&mut *conn).await
    }

    /// One WATCH/MULTI/EXEC round of `freeze`. Returns the number of entries
    /// persisted, `None` when EXEC aborted.
    async fn try_freeze(
        &self,
        conn: &mut Connection,
        entries_key: &str,
    ) -> redis::RedisResult<Option<usize>> {
        redis::cmd("WATCH")
            .arg(entries_key)
            .query_async::<()>(&mut *conn)
            .await?;
        let entries: Vec<String> = redis::cmd("LRANGE")
            .arg(entries_key)
            .arg(0)
            .arg(-1)
            .query_async(&mut *conn)
            .await?;

        let mut pipe = redis::pipe();
        pipe.atomic();
        for entry_identifier in &entries {
            pipe.cmd("PERSIST")
                .arg(self.keys.entry(entry_identifier))
                .ignore();
        }
        pipe.cmd("SET").arg(self.keys.frozen()).arg(1).ignore();

        let committed: Option<()> = pipe.query_async(&mut *conn).await?;
        Ok(committed.map(|()| entries.len()))
    }

    /// Release a WATCH left behind by a failed round before the connection
    /// goes back to the pool.
    async fn unwatch(conn: &mut Connection) {
        if let Err(e) = redis::cmd("UNWATCH").query_async::<()>(&mut *conn).await {
            warn!("Redis UNWATCH failed: {}", e);
        }
    }
}

impl CacheBackend for RedisBackend {
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
        self.ensure_not_frozen().await?;

        let expiry = self.options.resolve_lifetime(lifetime);
        let tags_key = self.keys.tags(entry_identifier);
        let mut conn = self.connection().await?;
        let mut attempts = 0;

        loop {
            attempts += 1;
            match self
                .try_set(&mut conn, entry_identifier, &data, tags, expiry, &tags_key)
                .await
            {
                Ok(Some(())) => break,
                Ok(None) => self.after_conflict(&tags_key, attempts).await?,
                Err(e) => {
                    Self::unwatch(&mut conn).await;
                    return Err(Error::BackendError(format!(
                        "Redis SET failed for entry {}: {}",
                        entry_identifier, e
                    )));
                }
            }
        }

        if let Some(ttl) = expiry {
            debug!("✓ Redis SET {} (TTL: {:?}, {} tags)", entry_identifier, ttl, tags.len());
        } else {
            debug!("✓ Redis SET {} ({} tags)", entry_identifier, tags.len());
        }
        Ok(())
    }

    async fn get(&self, entry_identifier: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.connection().await?;

        let data: Option<Vec<u8>> = redis::cmd("GET")
            .arg(self.keys.entry(entry_identifier))
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                Error::BackendError(format!(
                    "Redis GET failed for entry {}: {}",
                    entry_identifier, e
                ))
            })?;

        if data.is_some() {
            debug!("✓ Redis GET {} -> HIT", entry_identifier);
        } else {
            debug!("✓ Redis GET {} -> MISS", entry_identifier);
        }
        Ok(data)
    }

    async fn has(&self, entry_identifier: &str) -> Result<bool> {
        let mut conn = self.connection().await?;

        redis::cmd("EXISTS")
            .arg(self.keys.entry(entry_identifier))
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                Error::BackendError(format!(
                    "Redis EXISTS check failed for entry {}: {}",
                    entry_identifier, e
                ))
            })
    }

    async fn remove(&self, entry_identifier: &str) -> Result<bool> {
        self.ensure_not_frozen().await?;

        let tags_key = self.keys.tags(entry_identifier);
        let mut conn = self.connection().await?;
        let mut attempts = 0;

        loop {
            attempts += 1;
            match self
                .try_remove(&mut conn, entry_identifier, &tags_key)
                .await
            {
                Ok(Some(())) => break,
                Ok(None) => self.after_conflict(&tags_key, attempts).await?,
                Err(e) => {
                    Self::unwatch(&mut conn).await;
                    return Err(Error::BackendError(format!(
                        "Redis REMOVE failed for entry {}: {}",
                        entry_identifier, e
                    )));
                }
            }
        }

        debug!("✓ Redis REMOVE {}", entry_identifier);
        Ok(true)
    }

    async fn flush(&self) -> Result<()> {
        let mut conn = self.connection().await?;

        let flushed: u64 = redis::Script::new(FLUSH_SCRIPT)
            .key(self.keys.entries())
            .key(self.keys.frozen())
            .arg(self.keys.prefix())
            .invoke_async(&mut conn)
            .await
            .map_err(|e| Error::BackendError(format!("Redis FLUSH script failed: {}", e)))?;
        self.frozen.store(false);

        warn!(
            "⚠ Redis FLUSH executed - cache \"{}\" cleared ({} index positions)",
            self.options.cache_identifier, flushed
        );
        Ok(())
    }

    async fn collect_garbage(&self) -> Result<u64> {
        let mut conn = self.connection().await?;

        let pruned: u64 = redis::Script::new(COLLECT_GARBAGE_SCRIPT)
            .key(self.keys.entries())
            .key(self.keys.frozen())
            .arg(self.keys.prefix())
            .invoke_async(&mut conn)
            .await
            .map_err(|e| {
                Error::BackendError(format!("Redis garbage collection script failed: {}", e))
            })?;

        debug!("✓ Redis GC pruned {} identifiers", pruned);
        Ok(pruned)
    }
}

impl TaggableBackend for RedisBackend {
    async fn flush_by_tag(&self, tag: &str) -> Result<u64> {
        self.ensure_not_frozen().await?;

        let mut conn = self.connection().await?;
        let affected: i64 = redis::Script::new(FLUSH_BY_TAG_SCRIPT)
            .key(self.keys.tag(tag))
            .key(self.keys.frozen())
            .arg(self.keys.prefix())
            .invoke_async(&mut conn)
            .await
            .map_err(|e| {
                Error::BackendError(format!("Redis FLUSH_BY_TAG failed for tag {}: {}", tag, e))
            })?;

        // Another client froze the cache after our cached check.
        if affected < 0 {
            self.frozen.store(true);
            return Err(self.frozen_error());
        }

        debug!("✓ Redis FLUSH_BY_TAG {} ({} entries)", tag, affected);
        Ok(affected as u64)
    }

    async fn find_identifiers_by_tag(&self, tag: &str) -> Result<HashSet<String>> {
        let mut conn = self.connection().await?;

        redis::cmd("SMEMBERS")
            .arg(self.keys.tag(tag))
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                Error::BackendError(format!("Redis SMEMBERS failed for tag {}: {}", tag, e))
            })
    }
}

impl FreezableBackend for RedisBackend {
    async fn freeze(&self) -> Result<()> {
        self.ensure_not_frozen().await?;

        let entries_key = self.keys.entries();
        let mut conn = self.connection().await?;
        let mut attempts = 0;

        let persisted = loop {
            attempts += 1;
            match self.try_freeze(&mut conn, &entries_key).await {
                Ok(Some(persisted)) => break persisted,
                Ok(None) => self.after_conflict(&entries_key, attempts).await?,
                Err(e) => {
                    Self::unwatch(&mut conn).await;
                    return Err(Error::BackendError(format!("Redis FREEZE failed: {}", e)));
                }
            }
        };
        self.frozen.store(true);

        info!(
            "✓ Redis FREEZE cache \"{}\" ({} index positions persisted)",
            self.options.cache_identifier, persisted
        );
        Ok(())
    }

    async fn is_frozen(&self) -> Result<bool> {
        if let Some(frozen) = self.frozen.get() {
            return Ok(frozen);
        }

        let mut conn = self.connection().await?;
        let frozen: bool = redis::cmd("EXISTS")
            .arg(self.keys.frozen())
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::BackendError(format!("Redis EXISTS check failed: {}", e)))?;

        self.frozen.store(frozen);
        Ok(frozen)
    }
}

impl IterableBackend for RedisBackend {
    fn rewind(&mut self) {
        self.entry_cursor = 0;
    }

    fn next(&mut self) {
        self.entry_cursor += 1;
    }

    async fn key(&self) -> Result<Option<String>> {
        let mut conn = self.connection().await?;

        redis::cmd("LINDEX")
            .arg(self.keys.entries())
            .arg(self.entry_cursor)
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                Error::BackendError(format!(
                    "Redis LINDEX failed at position {}: {}",
                    self.entry_cursor, e
                ))
            })
    }
}
