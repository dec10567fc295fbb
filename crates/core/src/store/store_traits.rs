//! Persistence trait.
//!
//! The engine treats persisted state as a plain key-value store of
//! serialized collections: load at startup, save after every successful
//! mutation. Implementations decide where the bytes live.

use crate::Result;

/// Key-value persistence boundary.
pub trait KeyValueStore: Send + Sync {
    /// Load the bytes stored under a key, or `None` if the key has
    /// never been written.
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Persist bytes under a key. Last successful write wins.
    fn save(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Persist several keys with all-or-nothing semantics: either every
    /// entry is visible afterwards or none of them changed.
    fn save_many(&self, entries: &[(&str, Vec<u8>)]) -> Result<()>;
}
