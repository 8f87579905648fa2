//! In-memory [`Storage`] implementation for tests and embedding.
//!
//! Holds the "persisted" collection in a `Vec` behind `std::sync::RwLock`.
//! Saves can be switched to fail so callers can exercise their error paths.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use super::Storage;
use crate::error::StorageError;
use crate::models::Contact;

/// Volatile store whose contents vanish with the process.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    contacts: RwLock<Vec<Contact>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `contacts` already "on disk".
    pub fn with_contacts(contacts: Vec<Contact>) -> Self {
        Self {
            contacts: RwLock::new(contacts),
            ..Self::default()
        }
    }

    /// Make every subsequent `save` fail (or succeed again).
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Snapshot of what is currently persisted.
    pub fn snapshot(&self) -> Vec<Contact> {
        self.contacts
            .read()
            .map(|c| c.clone())
            .unwrap_or_default()
    }
}

impl Storage for InMemoryStorage {
    fn load(&self) -> Result<Vec<Contact>, StorageError> {
        self.contacts
            .read()
            .map(|c| c.clone())
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))
    }

    fn save(&self, contacts: &[Contact]) -> Result<(), StorageError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("simulated write failure".to_string()));
        }
        let mut stored = self
            .contacts
            .write()
            .map_err(|_| StorageError::Unavailable("lock poisoned".to_string()))?;
        *stored = contacts.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
