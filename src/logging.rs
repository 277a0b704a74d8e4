//! Logging setup
//!
//! Logs go to stderr so they never mix with a document written to stdout.

use tracing_subscriber::{fmt, EnvFilter};

/// Directive for the crate target at a given `-v` count
pub fn default_directive(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("{}={}", env!("CARGO_CRATE_NAME"), level)
}

/// Install the global subscriber; `RUST_LOG` takes precedence over `verbosity`
///
/// Calling this more than once is harmless.
pub fn init_logging(verbosity: u8) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
