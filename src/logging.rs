//! Diagnostic logging setup.
//!
//! Library code logs through `tracing`; binaries call [`init_tracing`] once.
//! Logs go to stderr so the operator report on stdout stays readable.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "warn";

/// Install a global fmt subscriber filtered by `RUST_LOG` (default `warn`).
///
/// `verbose` raises the crate's own logs to `debug`. Calling this twice is a
/// no-op.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    if verbose {
        if let Ok(directive) = "specimen_labels=debug".parse() {
            filter = filter.add_directive(directive);
        }
    }

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
