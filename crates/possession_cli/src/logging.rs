//! Logging setup for the CLI
//!
//! `POSSESSION_LOG` (an `EnvFilter` directive) takes precedence over `-v`.

use tracing_subscriber::EnvFilter;

/// Maps a verbosity count to a tracing directive
///
/// - 0 → `"warn"`
/// - 1 → `"info"`
/// - 2 → `"debug"`
/// - 3+ → `"trace"`
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the global subscriber on stderr. Safe to call twice.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_env("POSSESSION_LOG")
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr)
        .try_init();
}
