//! Tracing subscriber setup.
//!
//! Log output goes to stderr so that command output on stdout stays clean.
//! `RUST_LOG` overrides the default directive, e.g.
//! `RUST_LOG=contact_directory=debug contacts --action list`.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Calling it more than once is harmless.
pub fn init(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
