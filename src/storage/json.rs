//! File-backed [`Storage`] writing a pretty-printed JSON array.
//!
//! ```json
//! [
//!   {
//!     "name": "Alice",
//!     "phone": "111"
//!   }
//! ]
//! ```
//!
//! Saves go to `<file>.tmp` first and are renamed over the target, so a
//! crash mid-write leaves the previous file intact. A failed save removes
//! its temporary file.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::Storage;
use crate::error::StorageError;
use crate::models::Contact;

/// Contacts stored in a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> Result<Vec<Contact>, StorageError> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no contacts file, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };

        if data.is_empty() {
            return Ok(Vec::new());
        }

        // A literal `null` is treated like an empty list.
        let contacts: Option<Vec<Contact>> =
            serde_json::from_slice(&data).map_err(|err| StorageError::Decode {
                path: self.path.clone(),
                err,
            })?;
        let contacts = contacts.unwrap_or_default();

        debug!(path = %self.path.display(), count = contacts.len(), "loaded contacts");
        Ok(contacts)
    }

    fn save(&self, contacts: &[Contact]) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(contacts).map_err(StorageError::Encode)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
            }
        }

        let tmp = self.temp_path();
        // A leftover temp file would keep its old permissions.
        let _ = fs::remove_file(&tmp);

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&tmp).map_err(|e| StorageError::io(&tmp, e))?;
        let written = file.write_all(json.as_bytes()).and_then(|_| file.sync_all());
        drop(file);
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(StorageError::io(&tmp, e));
        }

        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(StorageError::io(&self.path, e));
        }

        debug!(path = %self.path.display(), count = contacts.len(), "saved contacts");
        Ok(())
    }
}
