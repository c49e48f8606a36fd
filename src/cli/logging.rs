//! Logging utilities for CLI output

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log level for CLI output
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    /// Suppress all output
    Quiet,
    /// Normal output level
    Normal,
    /// Verbose output with additional details
    Verbose,
}

impl LogLevel {
    /// Resolve from the global `--quiet` / `--verbose` flags
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            LogLevel::Quiet
        } else if verbose {
            LogLevel::Verbose
        } else {
            LogLevel::Normal
        }
    }

    /// Default `tracing` directive for this level
    pub fn directive(self, debug: bool) -> &'static str {
        match (self, debug) {
            (_, true) => "nitidez=debug",
            (LogLevel::Quiet, false) => "warn",
            (LogLevel::Normal, false) => "nitidez=info",
            (LogLevel::Verbose, false) => "nitidez=debug",
        }
    }
}

/// Log a message if the current level permits it
pub fn log(level: LogLevel, required: LogLevel, msg: &str) {
    if level != LogLevel::Quiet && (level == required || required == LogLevel::Normal) {
        println!("{msg}");
    }
}

/// Install the global `tracing` subscriber
///
/// `RUST_LOG` wins over the level derived from the CLI flags. A second call
/// is a no-op.
pub fn init_tracing(level: LogLevel, debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.directive(debug)));
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        assert_eq!(LogLevel::from_flags(true, true), LogLevel::Quiet);
        assert_eq!(LogLevel::from_flags(false, true), LogLevel::Verbose);
        assert_eq!(LogLevel::from_flags(false, false), LogLevel::Normal);
    }

    #[test]
    fn test_debug_flag_overrides_quiet() {
        assert_eq!(LogLevel::Quiet.directive(true), "nitidez=debug");
        assert_eq!(LogLevel::Quiet.directive(false), "warn");
        assert_eq!(LogLevel::Normal.directive(false), "nitidez=info");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_tracing(LogLevel::Quiet, false);
        init_tracing(LogLevel::Verbose, true);
    }
}
