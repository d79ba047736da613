//! Logging initialisation for the `distcheck` binary.
//!
//! Library code logs through the `log` facade. The binary installs a
//! `tracing-subscriber` registry that receives those records and writes them
//! to stderr, leaving stdout for the report.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding filter directives. When set, it overrides the
/// level chosen by `-v`/`-q`.
pub const LOG_ENV_VAR: &str = "DISTCHECK_LOG";

/// The filter level for a verbosity count and quiet flag.
///
/// # Examples
///
/// ```
/// use distcheck::logging::default_level;
///
/// assert_eq!(default_level(0, false), "warn");
/// assert_eq!(default_level(2, false), "debug");
/// assert_eq!(default_level(0, true), "error");
/// ```
#[must_use]
pub const fn default_level(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialise the global subscriber.
///
/// Call once from `main`.
///
/// # Errors
///
/// Returns [`TryInitError`] if a global subscriber or logger is already
/// installed.
pub fn init(verbosity: u8, quiet: bool) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbosity, quiet)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()
}
