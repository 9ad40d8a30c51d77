//! Tracing subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

use crate::LoggingConfig;

/// Picks the filter directive: `--verbose` forces `debug`, otherwise the
/// configured level. `RUST_LOG`, when set, overrides both in [`init`].
pub fn directive(config: &LoggingConfig, verbose: bool) -> &str {
    if verbose { "debug" } else { config.level.as_str() }
}

/// Installs a stderr `fmt` subscriber.
///
/// An unparseable directive falls back to `warn` rather than failing
/// startup.
pub fn init(config: &LoggingConfig, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive(config, verbose)))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_uses_configured_level() {
        let config = LoggingConfig {
            level: "info,tcrelay_session=debug".into(),
        };
        assert_eq!(directive(&config, false), "info,tcrelay_session=debug");
    }

    #[test]
    fn test_directive_verbose_forces_debug() {
        assert_eq!(directive(&LoggingConfig::default(), true), "debug");
    }
}
