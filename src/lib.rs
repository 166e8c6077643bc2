//! # tagged-cache
//!
//! A tag-indexed cache backend over Redis.
//!
//! ## Features
//!
//! - **Tags:** Attach tags to entries and invalidate them in bulk with `flush_by_tag`
//! - **Atomic:** Multi-key writes run in MULTI/EXEC transactions or Lua scripts
//! - **Freezable:** Freeze a cache to make it read-only and non-expiring until flushed
//! - **Iterable:** Walk every stored identifier with a rewindable cursor
//! - **Backend Agnostic:** Redis for production, an in-memory keyspace for tests
//! - **Observable:** Built-in logging and a metrics decorator
//!
//! ## Quick Start
//!
//! ```ignore
//! use tagged_cache::backend::{BackendOptions, CacheBackend, RedisBackend, RedisConfig, TaggableBackend};
//!
//! let options = BackendOptions::new("pages").with_default_lifetime(600);
//! let backend = RedisBackend::new(RedisConfig::default(), options).await?;
//!
//! backend.set("home", html, &["layout", "nav"], None).await?;
//! backend.set("about", html, &["layout"], Some(Duration::ZERO)).await?;
//!
//! // Layout changed: drop every page rendered with it.
//! let flushed = backend.flush_by_tag("layout").await?;
//! ```

#[macro_use]
extern crate log;

pub mod backend;
pub mod error;
pub mod key;
pub mod observability;

// Re-exports for convenience
pub use backend::{
    BackendOptions, CacheBackend, FreezableBackend, IterableBackend, RetryPolicy, TaggableBackend,
};
pub use error::{Error, Result};
pub use key::KeyBuilder;
pub use observability::{CacheMetrics, InstrumentedBackend};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
