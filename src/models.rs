//! Core data model: the [`Contact`] entity stored by the directory.

use serde::{Deserialize, Serialize};

/// A single name/phone entry.
///
/// The name is the identifying key within a directory and is matched
/// case-insensitively. The phone number is free-form. `Contact` performs no
/// validation of its own; [`Directory`](crate::directory::Directory) trims and
/// checks both fields before constructing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub phone: String,
}

impl Contact {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_name_phone_object() {
        let contact = Contact::new("Alice", "111");
        let json = serde_json::to_value(&contact).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "Alice", "phone": "111" }));
    }

    #[test]
    fn test_no_validation_on_construction() {
        let contact = Contact::new("", "");
        assert!(contact.name.is_empty());
        assert!(contact.phone.is_empty());
    }
}
