//! Persistence abstraction for the contact directory.
//!
//! The [`Storage`] trait is the only thing a
//! [`Directory`](crate::directory::Directory) knows about durability: it loads
//! the whole collection once at startup and writes the whole collection back
//! after every mutation. There is no incremental or append API.
//!
//! | Backend | Purpose |
//! |---------|---------|
//! | [`JsonStorage`] | Pretty-printed JSON array in a single file |
//! | [`InMemoryStorage`] | Tests and embedding; can simulate save failures |
//!
//! Implementations must be `Send + Sync` so a directory can live behind the
//! HTTP server's shared state.

pub mod json;
pub mod memory;

pub use json::JsonStorage;
pub use memory::InMemoryStorage;

use crate::error::StorageError;
use crate::models::Contact;

/// Load/save capability consumed by the directory.
pub trait Storage: Send + Sync {
    /// Return every persisted contact in stored order.
    ///
    /// A missing or empty backing resource yields an empty vector, not an
    /// error. A non-empty resource that cannot be decoded is
    /// [`StorageError::Decode`].
    fn load(&self) -> Result<Vec<Contact>, StorageError>;

    /// Replace the persisted collection with `contacts`, in order.
    fn save(&self, contacts: &[Contact]) -> Result<(), StorageError>;
}
