//! # Contact Directory CLI (`contacts`)
//!
//! Runs a single directory action against a JSON data file, or starts the
//! web interface.
//!
//! ## Usage
//!
//! ```bash
//! contacts --action <action> [--name <name>] [--tel <phone>] [--file <path>]
//! contacts --web [--port <port>] [--file <path>]
//! ```
//!
//! ## Actions
//!
//! | Action | Description |
//! |--------|-------------|
//! | `add` | Add a new contact (requires `--name` and `--tel`) |
//! | `delete` | Delete a contact (requires `--name`) |
//! | `edit` | Edit a contact's phone number (requires `--name` and `--tel`) |
//! | `search` | Search for a contact by name substring (requires `--name`) |
//! | `list` | List all contacts |
//!
//! ## Examples
//!
//! ```bash
//! contacts --action add --name "Charlie Brown" --tel "0000000000"
//! contacts --action search --name "Alice"
//! contacts --action list
//! contacts --web
//! contacts --web --port 3000
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use contact_directory::cli::{self, Action};
use contact_directory::config::{self, Config};
use contact_directory::directory::Directory;
use contact_directory::logging;
use contact_directory::server;
use contact_directory::storage::JsonStorage;

/// Contact Directory — store name/phone pairs in a JSON file and manage them
/// from the command line or a small web interface.
#[derive(Parser)]
#[command(
    name = "contacts",
    about = "Contact Directory — a small personal name/phone directory",
    version,
    after_help = "Examples:\n  \
    contacts --action add --name \"Charlie Brown\" --tel \"0000000000\"\n  \
    contacts --action search --name \"Alice\"\n  \
    contacts --action list\n  \
    contacts --web --port 3000"
)]
struct Cli {
    /// Action to perform.
    #[arg(long, value_enum)]
    action: Option<Action>,

    /// Contact name (firstname lastname).
    #[arg(long)]
    name: Option<String>,

    /// Phone number.
    #[arg(long)]
    tel: Option<String>,

    /// JSON file to store contacts [default: contacts.json].
    #[arg(long)]
    file: Option<PathBuf>,

    /// Run as web server.
    #[arg(long)]
    web: bool,

    /// Port for web server [default: 8080].
    #[arg(long)]
    port: Option<u16>,

    /// Optional TOML configuration file. Command-line flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Exit with a clap usage error (non-zero status, usage printed to stderr).
fn usage_error(message: impl std::fmt::Display) -> ! {
    Cli::command()
        .error(ErrorKind::MissingRequiredArgument, message)
        .exit()
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(if cli.web { "info" } else { "warn" });

    if let Err(e) = run(cli).await {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let base = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => Config::default(),
    };
    let cfg = base.with_overrides(cli.file, cli.port);
    cfg.validate()?;

    if cli.web {
        return server::run_server(&cfg).await;
    }

    let action = match cli.action {
        Some(action) => action,
        None => usage_error("--action flag is required"),
    };
    let name = cli.name.unwrap_or_default();
    let tel = cli.tel.unwrap_or_default();
    if let Some(message) = action.missing_flags(&name, &tel) {
        usage_error(message);
    }

    let data_file = cfg.resolve_data_file()?;
    let mut directory =
        Directory::new(JsonStorage::new(data_file)).context("Error initializing directory")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    cli::run_action(&mut directory, action, &name, &tel, &mut out)
}
