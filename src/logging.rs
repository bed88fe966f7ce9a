//! Diagnostic logging setup.
//!
//! Logs go to stderr so stdout stays reserved for command output (tables,
//! manifests, reports).

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default directive for a given `-v` count.
fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "listings=info",
        1 => "listings=debug",
        _ => "listings=trace",
    }
}

/// Install the global subscriber. `RUST_LOG`, when set, wins over `-v`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_by_verbosity() {
        assert_eq!(default_directive(0), "listings=info");
        assert_eq!(default_directive(1), "listings=debug");
        assert_eq!(default_directive(5), "listings=trace");
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging(0);
        init_logging(2);
    }
}
