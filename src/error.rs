//! Error types for cache backend operations.

use thiserror::Error;

/// Errors that can occur during cache backend operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A mutating operation was attempted while the backend is frozen.
    #[error("Cannot modify cache entries because the backend of cache \"{cache_identifier}\" is frozen")]
    Frozen { cache_identifier: String },

    /// The store could not be reached or selected at construction time.
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    /// An optimistic WATCH/EXEC loop gave up after repeated conflicts.
    #[error("Concurrent modification of \"{key}\" persisted after {attempts} attempts")]
    ConcurrentModification { key: String, attempts: u32 },

    /// Store-level failure (network, script execution, protocol).
    #[error("Cache backend error: {0}")]
    BackendError(String),

    /// Invalid backend configuration.
    #[error("Cache configuration error: {0}")]
    ConfigError(String),
}

impl Error {
    /// Whether this error reports a frozen backend.
    pub fn is_frozen(&self) -> bool {
        matches!(self, Error::Frozen { .. })
    }
}

/// Result type for cache backend operations.
pub type Result<T> = std::result::Result<T, Error>;
