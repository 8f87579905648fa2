//! # Contact Directory
//!
//! A small personal contact directory: name/phone pairs with add, edit,
//! delete, search and list, persisted to a JSON file and exposed through a
//! CLI and a minimal HTTP interface over the same in-memory collection.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐
//! │   CLI    │   │   HTTP   │
//! │(contacts)│   │  (axum)  │
//! └────┬─────┘   └────┬─────┘
//!      └───────┬──────┘
//!              ▼
//!       ┌─────────────┐   ┌──────────────┐
//!       │  Directory  │──▶│   Storage    │
//!       │ (in-memory) │   │ (JSON file)  │
//!       └─────────────┘   └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! contacts --action add --name "Charlie Brown" --tel "0000000000"
//! contacts --action search --name "charlie"
//! contacts --action list
//! contacts --web --port 3000
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | The `Contact` entity |
//! | [`error`] | Directory and storage error types |
//! | [`storage`] | Load/save abstraction, JSON file and in-memory backends |
//! | [`directory`] | The contact directory service |
//! | [`config`] | Optional TOML configuration |
//! | [`cli`] | `--action` command dispatch |
//! | [`render`] | HTML for the web interface |
//! | [`server`] | HTTP server |
//! | [`logging`] | Tracing subscriber setup |

pub mod cli;
pub mod config;
pub mod directory;
pub mod error;
pub mod logging;
pub mod models;
pub mod render;
pub mod server;
pub mod storage;
