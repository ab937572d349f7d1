//! Local persistent storage.
//!
//! A small string key/value abstraction holding the bearer token and the
//! identity snapshot between runs. The trait is synchronous; every write is
//! durable by the time it returns.

mod error;
mod memory;
mod redb;

pub use error::StorageError;
pub use memory::MemoryStorage;

pub use self::redb::RedbStorage;

/// Key holding the raw bearer token.
pub const TOKEN_KEY: &str = "token";

/// Key holding the JSON identity snapshot.
pub const USER_KEY: &str = "user";

/// String key/value persistence.
///
/// Must be Clone (shared by the session service and the HTTP adapter), Send +
/// Sync, and synchronous. Implementations share internal state, so clones
/// observe each other's writes.
pub trait Storage: Clone + Send + Sync + 'static {
    /// Value stored under `key`. `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
