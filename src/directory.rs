//! The contact directory service.
//!
//! A [`Directory`] owns the in-memory contact list and is the only place the
//! list is mutated. It is built from a single [`Storage::load`] and writes the
//! complete list back through [`Storage::save`] after every successful
//! mutation.
//!
//! # Matching rules
//!
//! - Every string argument is trimmed before use.
//! - Names are compared case-insensitively, both for uniqueness and for
//!   locating the contact to edit or delete.
//! - Search is a case-insensitive substring match on the name.
//! - Lookups scan the list in order; the first match wins.
//!
//! # Persistence failures
//!
//! If the save after a mutation fails, the mutation is undone in memory
//! before the error is returned, so the list always mirrors what was last
//! written successfully.
//!
//! The directory does no locking. Callers sharing one across tasks must wrap
//! it in a mutex, as [`server`](crate::server) does.

use tracing::{info, warn};

use crate::error::DirectoryError;
use crate::models::Contact;
use crate::storage::Storage;

/// In-memory contact list backed by a [`Storage`].
#[derive(Debug)]
pub struct Directory<S: Storage> {
    storage: S,
    contacts: Vec<Contact>,
}

/// Case-fold one character at a time. Final sigma folds to `σ`, so a name
/// matches itself in any casing regardless of word position.
fn fold(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c == 'ς' { 'σ' } else { c })
        .collect()
}

impl<S: Storage> Directory<S> {
    /// Load all contacts from `storage`.
    ///
    /// Fails with [`DirectoryError::Load`] if the storage cannot be read or
    /// decoded.
    pub fn new(storage: S) -> Result<Self, DirectoryError> {
        let contacts = storage.load().map_err(DirectoryError::Load)?;
        Ok(Self { storage, contacts })
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Append a new contact and persist.
    ///
    /// Fails with [`DirectoryError::Validation`] if either trimmed field is
    /// empty and [`DirectoryError::DuplicateName`] if the name is already
    /// taken, ignoring case.
    pub fn add_contact(&mut self, name: &str, phone: &str) -> Result<(), DirectoryError> {
        let name = name.trim();
        let phone = phone.trim();

        if name.is_empty() || phone.is_empty() {
            return Err(DirectoryError::validation("name and phone are required"));
        }
        if self.position(name).is_some() {
            return Err(DirectoryError::DuplicateName(name.to_string()));
        }

        self.contacts.push(Contact::new(name, phone));
        if let Err(e) = self.persist() {
            self.contacts.pop();
            return Err(e);
        }

        info!(name, "contact added");
        Ok(())
    }

    /// Remove the first contact whose name matches, ignoring case, and persist.
    pub fn delete_contact(&mut self, name: &str) -> Result<(), DirectoryError> {
        let name = name.trim();
        let index = self
            .position(name)
            .ok_or_else(|| DirectoryError::NotFound(name.to_string()))?;

        let removed = self.contacts.remove(index);
        if let Err(e) = self.persist() {
            self.contacts.insert(index, removed);
            return Err(e);
        }

        info!(name = %removed.name, "contact deleted");
        Ok(())
    }

    /// Replace the phone number of the first contact whose name matches,
    /// ignoring case, and persist. The stored name is left untouched.
    pub fn edit_contact(&mut self, name: &str, new_phone: &str) -> Result<(), DirectoryError> {
        let name = name.trim();
        let new_phone = new_phone.trim();

        if new_phone.is_empty() {
            return Err(DirectoryError::validation("phone is required"));
        }
        let index = self
            .position(name)
            .ok_or_else(|| DirectoryError::NotFound(name.to_string()))?;

        let previous = std::mem::replace(&mut self.contacts[index].phone, new_phone.to_string());
        if let Err(e) = self.persist() {
            self.contacts[index].phone = previous;
            return Err(e);
        }

        info!(name = %self.contacts[index].name, "contact updated");
        Ok(())
    }

    /// First contact whose name contains `query`, ignoring case.
    pub fn search_contact(&self, query: &str) -> Result<&Contact, DirectoryError> {
        let query = query.trim();
        let needle = fold(query);
        self.contacts
            .iter()
            .find(|c| fold(&c.name).contains(&needle))
            .ok_or_else(|| DirectoryError::NotFound(query.to_string()))
    }

    /// Every contact whose name contains `query`, ignoring case, in list
    /// order. Empty when nothing matches.
    pub fn search_contacts(&self, query: &str) -> Vec<&Contact> {
        let needle = fold(query.trim());
        self.contacts
            .iter()
            .filter(|c| fold(&c.name).contains(&needle))
            .collect()
    }

    /// The current list, in order.
    pub fn list_contacts(&self) -> &[Contact] {
        &self.contacts
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = fold(name);
        self.contacts.iter().position(|c| fold(&c.name) == name)
    }

    fn persist(&self) -> Result<(), DirectoryError> {
        self.storage.save(&self.contacts).map_err(|e| {
            warn!(error = %e, "save failed, rolling back in-memory change");
            DirectoryError::Storage(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::storage::{InMemoryStorage, JsonStorage};
    use tempfile::TempDir;

    fn empty() -> Directory<InMemoryStorage> {
        Directory::new(InMemoryStorage::new()).unwrap()
    }

    fn names(dir: &Directory<InMemoryStorage>) -> Vec<&str> {
        dir.list_contacts().iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_new_loads_existing_contacts() {
        let storage = InMemoryStorage::with_contacts(vec![Contact::new("Alice", "111")]);
        let dir = Directory::new(storage).unwrap();
        assert_eq!(dir.list_contacts(), &[Contact::new("Alice", "111")]);
    }

    #[test]
    fn test_new_propagates_load_failure() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("contacts.json");
        std::fs::write(&path, "not json").unwrap();

        let err = Directory::new(JsonStorage::new(&path)).unwrap_err();
        match err {
            DirectoryError::Load(inner) => assert!(inner.is_decode()),
            other => panic!("expected load error, got {:?}", other),
        }
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut dir = empty();
        dir.add_contact("Charlie", "3").unwrap();
        dir.add_contact("Alice", "1").unwrap();
        dir.add_contact("Bob", "2").unwrap();
        assert_eq!(names(&dir), vec!["Charlie", "Alice", "Bob"]);
        assert_eq!(dir.len(), 3);
    }

    #[test]
    fn test_add_trims_fields() {
        let mut dir = empty();
        dir.add_contact("  Alice  ", "\t111 ").unwrap();
        assert_eq!(dir.list_contacts(), &[Contact::new("Alice", "111")]);
    }

    #[test]
    fn test_add_persists_full_collection_once() {
        let mut dir = empty();
        dir.add_contact("Alice", "111").unwrap();
        dir.add_contact("Bob", "222").unwrap();
        assert_eq!(dir.storage().save_count(), 2);
        assert_eq!(dir.storage().snapshot(), dir.list_contacts());
    }

    #[test]
    fn test_add_duplicate_ignores_case() {
        let mut dir = empty();
        dir.add_contact("John Doe", "1").unwrap();
        let err = dir.add_contact("john doe", "2").unwrap_err();
        assert!(matches!(err, DirectoryError::DuplicateName(ref n) if n == "john doe"));
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.storage().save_count(), 1);
    }

    #[test]
    fn test_add_duplicate_after_trim() {
        let mut dir = empty();
        dir.add_contact("Alice", "1").unwrap();
        assert!(matches!(
            dir.add_contact(" ALICE ", "2"),
            Err(DirectoryError::DuplicateName(_))
        ));
    }

    #[test]
    fn test_greek_names_match_in_any_case() {
        let mut dir = empty();
        dir.add_contact("ΟΔΟΣ", "1").unwrap();
        for other in ["οδοσ", "οδος", "Οδος"] {
            assert!(matches!(
                dir.add_contact(other, "2"),
                Err(DirectoryError::DuplicateName(_))
            ));
        }
        // Accented omicron is a different letter.
        dir.add_contact("Οδός", "3").unwrap();

        assert_eq!(dir.search_contact("δοσ").unwrap().name, "ΟΔΟΣ");
        assert_eq!(dir.search_contacts("ΔΟς").len(), 1);
        dir.edit_contact("οδος", "9").unwrap();
        assert_eq!(dir.list_contacts()[0].phone, "9");
    }

    #[test]
    fn test_add_rejects_blank_fields() {
        let mut dir = empty();
        assert!(matches!(
            dir.add_contact("   ", "1"),
            Err(DirectoryError::Validation(_))
        ));
        assert!(matches!(
            dir.add_contact("Alice", " "),
            Err(DirectoryError::Validation(_))
        ));
        assert!(dir.is_empty());
        assert_eq!(dir.storage().save_count(), 0);
    }

    #[test]
    fn test_delete_removes_in_place() {
        let mut dir = empty();
        dir.add_contact("A", "1").unwrap();
        dir.add_contact("B", "2").unwrap();
        dir.add_contact("C", "3").unwrap();
        dir.delete_contact("b").unwrap();
        assert_eq!(names(&dir), vec!["A", "C"]);
        assert_eq!(dir.storage().snapshot().len(), 2);
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let mut dir = empty();
        dir.add_contact("Alice", "1").unwrap();
        let err = dir.delete_contact("Bob").unwrap_err();
        assert!(matches!(err, DirectoryError::NotFound(ref n) if n == "Bob"));
        assert_eq!(names(&dir), vec!["Alice"]);
        assert_eq!(dir.storage().save_count(), 1);
    }

    #[test]
    fn test_delete_removes_only_first_match() {
        // Duplicates can only come from a hand-edited file.
        let storage = InMemoryStorage::with_contacts(vec![
            Contact::new("Sam", "1"),
            Contact::new("SAM", "2"),
        ]);
        let mut dir = Directory::new(storage).unwrap();
        dir.delete_contact("sam").unwrap();
        assert_eq!(dir.list_contacts(), &[Contact::new("SAM", "2")]);
    }

    #[test]
    fn test_edit_changes_only_phone() {
        let mut dir = empty();
        dir.add_contact("Alice", "111").unwrap();
        dir.add_contact("Bob", "222").unwrap();
        dir.edit_contact("ALICE", " 333 ").unwrap();
        assert_eq!(
            dir.list_contacts(),
            &[Contact::new("Alice", "333"), Contact::new("Bob", "222")]
        );
        assert_eq!(dir.storage().snapshot(), dir.list_contacts());
    }

    #[test]
    fn test_edit_missing_is_not_found() {
        let mut dir = empty();
        assert!(matches!(
            dir.edit_contact("Nobody", "1"),
            Err(DirectoryError::NotFound(_))
        ));
    }

    #[test]
    fn test_edit_rejects_blank_phone() {
        let mut dir = empty();
        dir.add_contact("Alice", "111").unwrap();
        assert!(matches!(
            dir.edit_contact("Alice", "  "),
            Err(DirectoryError::Validation(_))
        ));
        assert_eq!(dir.list_contacts()[0].phone, "111");
    }

    #[test]
    fn test_search_contacts_substring() {
        let mut dir = empty();
        dir.add_contact("John Doe", "1").unwrap();
        dir.add_contact("Jane Smith", "2").unwrap();

        let found: Vec<&str> = dir
            .search_contacts("doe")
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(found, vec!["John Doe"]);
        assert!(dir.search_contacts("xyz").is_empty());
    }

    #[test]
    fn test_search_contacts_keeps_order() {
        let mut dir = empty();
        dir.add_contact("Anna", "1").unwrap();
        dir.add_contact("Bob", "2").unwrap();
        dir.add_contact("Hannah", "3").unwrap();
        let found: Vec<&str> = dir
            .search_contacts(" ANN ")
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(found, vec!["Anna", "Hannah"]);
    }

    #[test]
    fn test_search_contact_first_match_wins() {
        let mut dir = empty();
        dir.add_contact("Mary Jones", "1").unwrap();
        dir.add_contact("Tom Jones", "2").unwrap();
        assert_eq!(dir.search_contact("jones").unwrap().name, "Mary Jones");
    }

    #[test]
    fn test_search_contact_not_found() {
        let dir = empty();
        let err = dir.search_contact("  ghost ").unwrap_err();
        assert!(matches!(err, DirectoryError::NotFound(ref n) if n == "ghost"));
    }

    #[test]
    fn test_failed_save_rolls_back_add() {
        let mut dir = empty();
        dir.add_contact("Alice", "111").unwrap();
        dir.storage().fail_saves(true);

        let err = dir.add_contact("Bob", "222").unwrap_err();
        assert!(matches!(
            err,
            DirectoryError::Storage(StorageError::Unavailable(_))
        ));
        assert_eq!(names(&dir), vec!["Alice"]);
    }

    #[test]
    fn test_failed_save_rolls_back_delete_and_edit() {
        let mut dir = empty();
        dir.add_contact("A", "1").unwrap();
        dir.add_contact("B", "2").unwrap();
        dir.add_contact("C", "3").unwrap();
        dir.storage().fail_saves(true);

        assert!(dir.delete_contact("B").is_err());
        assert!(dir.edit_contact("C", "9").is_err());
        assert_eq!(dir.list_contacts(), dir.storage().snapshot().as_slice());
        assert_eq!(names(&dir), vec!["A", "B", "C"]);
        assert_eq!(dir.list_contacts()[2].phone, "3");
    }

    #[test]
    fn test_unwritable_data_file_rolls_back() {
        let tmp = TempDir::new().unwrap();
        let data_dir = tmp.path().join("data");
        let mut dir = Directory::new(JsonStorage::new(data_dir.join("contacts.json"))).unwrap();
        dir.add_contact("Alice", "111").unwrap();

        // Replace the data directory with a plain file.
        std::fs::remove_dir_all(&data_dir).unwrap();
        std::fs::write(&data_dir, "in the way").unwrap();

        let err = dir.add_contact("Bob", "222").unwrap_err();
        assert!(
            matches!(err, DirectoryError::Storage(StorageError::Io { .. })),
            "got {:?}",
            err
        );
        assert!(err.to_string().starts_with("failed to save contacts:"));
        assert_eq!(dir.list_contacts(), &[Contact::new("Alice", "111")]);
    }

    #[test]
    fn test_full_lifecycle_scenario() {
        let mut dir = empty();
        dir.add_contact("Alice", "111").unwrap();
        assert!(matches!(
            dir.add_contact("alice", "222"),
            Err(DirectoryError::DuplicateName(_))
        ));
        dir.edit_contact("Alice", "333").unwrap();
        assert_eq!(dir.search_contact("alice").unwrap().phone, "333");
        dir.delete_contact("Alice").unwrap();
        assert!(dir.list_contacts().is_empty());
        assert!(dir.storage().snapshot().is_empty());
    }

    #[test]
    fn test_json_backed_directory_survives_reload() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("contacts.json");

        let mut dir = Directory::new(JsonStorage::new(&path)).unwrap();
        dir.add_contact("Alice", "111").unwrap();
        dir.add_contact("Bob", "222").unwrap();
        dir.delete_contact("alice").unwrap();

        let reloaded = Directory::new(JsonStorage::new(&path)).unwrap();
        assert_eq!(reloaded.list_contacts(), &[Contact::new("Bob", "222")]);
    }
}
