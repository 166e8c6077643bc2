//! Namespaced key construction.
//!
//! Every key a backend touches lives under its cache identifier:
//!
//! ```text
//! <cacheIdentifier>:entry:<entryIdentifier>   -> entry data
//! <cacheIdentifier>:entries                   -> list of entry identifiers
//! <cacheIdentifier>:tag:<tagName>             -> set of entry identifiers
//! <cacheIdentifier>:tags:<entryIdentifier>    -> set of tag names
//! <cacheIdentifier>:frozen                    -> frozen marker
//! ```

/// Builds store keys for one cache identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyBuilder {
    prefix: String,
}

impl KeyBuilder {
    pub fn new(cache_identifier: &str) -> Self {
        KeyBuilder {
            prefix: format!("{}:", cache_identifier),
        }
    }

    /// Namespace prefix including the trailing separator, e.g. `"pages:"`.
    ///
    /// Lua scripts receive this and build the per-entry keys server-side.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Prefix an arbitrary identifier.
    pub fn build(&self, identifier: &str) -> String {
        format!("{}{}", self.prefix, identifier)
    }

    pub fn entry(&self, entry_identifier: &str) -> String {
        format!("{}entry:{}", self.prefix, entry_identifier)
    }

    pub fn entries(&self) -> String {
        self.build("entries")
    }

    pub fn tag(&self, tag: &str) -> String {
        format!("{}tag:{}", self.prefix, tag)
    }

    pub fn tags(&self, entry_identifier: &str) -> String {
        format!("{}tags:{}", self.prefix, entry_identifier)
    }

    pub fn frozen(&self) -> String {
        self.build("frozen")
    }
}
