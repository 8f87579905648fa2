//! Command dispatch for the `--action` mode of the `contacts` binary.
//!
//! Each [`Action`] maps to exactly one [`Directory`] operation. Results are
//! written to the supplied writer (stdout in the binary) in a fixed
//! line-oriented format; failures come back as errors prefixed with
//! `Error <verb> contact`.

use std::io::Write;

use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::directory::Directory;
use crate::storage::Storage;

const SEPARATOR: &str = "-------------------";

/// What to do with the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    /// Add a new contact (requires --name and --tel)
    Add,
    /// Delete a contact (requires --name)
    Delete,
    /// Edit a contact's phone number (requires --name and --tel)
    Edit,
    /// Search for a contact (requires --name)
    Search,
    /// List all contacts
    List,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Add => "add",
            Action::Delete => "delete",
            Action::Edit => "edit",
            Action::Search => "search",
            Action::List => "list",
        }
    }

    pub fn needs_name(&self) -> bool {
        !matches!(self, Action::List)
    }

    pub fn needs_tel(&self) -> bool {
        matches!(self, Action::Add | Action::Edit)
    }

    fn verb(&self) -> &'static str {
        match self {
            Action::Add => "adding",
            Action::Delete => "deleting",
            Action::Edit => "editing",
            Action::Search => "searching",
            Action::List => "listing",
        }
    }

    /// Message shown when a required flag is missing, or `None` if the
    /// given values are sufficient.
    pub fn missing_flags(&self, name: &str, tel: &str) -> Option<String> {
        let name_missing = self.needs_name() && name.trim().is_empty();
        let tel_missing = self.needs_tel() && tel.trim().is_empty();
        match (name_missing, tel_missing) {
            (false, false) => None,
            (true, false) => Some(format!("--name is required for {} action", self.as_str())),
            _ => Some(format!(
                "both --name and --tel are required for {} action",
                self.as_str()
            )),
        }
    }
}

/// Run `action` against `directory`, printing the result to `out`.
pub fn run_action<S: Storage, W: Write>(
    directory: &mut Directory<S>,
    action: Action,
    name: &str,
    tel: &str,
    out: &mut W,
) -> Result<()> {
    let context = || format!("Error {} contact", action.verb());

    match action {
        Action::Add => {
            directory.add_contact(name, tel).with_context(context)?;
            writeln!(out, "Contact '{}' added successfully", name)?;
        }
        Action::Delete => {
            directory.delete_contact(name).with_context(context)?;
            writeln!(out, "Contact '{}' deleted successfully", name)?;
        }
        Action::Edit => {
            directory.edit_contact(name, tel).with_context(context)?;
            writeln!(out, "Contact '{}' updated successfully", name)?;
        }
        Action::Search => {
            let contact = directory.search_contact(name).with_context(context)?;
            writeln!(out, "Found contact:")?;
            writeln!(out, "Name: {}", contact.name)?;
            writeln!(out, "Phone: {}", contact.phone)?;
        }
        Action::List => {
            let contacts = directory.list_contacts();
            if contacts.is_empty() {
                writeln!(out, "No contacts found")?;
                return Ok(());
            }
            writeln!(out, "Found {} contact(s):", contacts.len())?;
            writeln!(out, "{}", SEPARATOR)?;
            for contact in contacts {
                writeln!(out, "Name: {}", contact.name)?;
                writeln!(out, "Phone: {}", contact.phone)?;
                writeln!(out, "{}", SEPARATOR)?;
            }
        }
    }

    Ok(())
}
