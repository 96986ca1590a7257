//! Structured logging setup.
//!
//! `RUST_LOG` always wins. Otherwise verbosity flags pick the level:
//! `-q` -> error, default -> info, `-v` -> debug, `-vv` -> trace.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Level directive for the given CLI verbosity.
#[must_use]
pub const fn level_for(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Initialize the global subscriber. Logs go to stderr.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(verbose: u8, quiet: bool, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbose, quiet)));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    Ok(())
}

/// Install a test-writer subscriber; repeated calls are no-ops.
pub fn init_test_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("issue_api=debug"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_test_writer())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for(0, false), "info");
        assert_eq!(level_for(1, false), "debug");
        assert_eq!(level_for(5, false), "trace");
        assert_eq!(level_for(2, true), "error");
    }

    #[test]
    fn test_logging_is_idempotent() {
        init_test_logging();
        init_test_logging();
    }
}
