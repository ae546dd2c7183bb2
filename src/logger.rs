//! Logging setup for the ScriptScope CLI.
//!
//! The library emits `tracing` events; the binary installs a compact
//! `tracing-subscriber` formatter on stderr so reports on stdout stay clean.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither `--verbose` nor `--quiet` is given and `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "scriptscope=warn";

/// Choose the log filter for the given flags.
///
/// `--verbose` wins over `--quiet`; `RUST_LOG` is only consulted when neither is set.
pub fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("scriptscope=debug")
    } else if quiet {
        EnvFilter::new("scriptscope=error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Initialize the global tracing subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter_for(verbose, quiet))
        .with(fmt_layer)
        .init();
}
