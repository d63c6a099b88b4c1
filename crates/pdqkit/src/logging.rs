//! Logging initialization.
//!
//! Log output goes to stderr; stdout carries hash records only.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem.
///
/// `level` is the default filter directive; the RUST_LOG environment
/// variable overrides it when set.
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Pick the default level from config, with `--verbose` forcing debug.
pub fn level_for(config: &pdqkit_core::Config, verbose_override: bool) -> &str {
    if verbose_override && config.logging.level != "trace" {
        "debug"
    } else {
        config.logging.level.as_str()
    }
}

/// Initialize logging with settings from the config file and CLI flags.
pub fn init_from_config(
    config: &pdqkit_core::Config,
    verbose_override: bool,
    json_logs_override: bool,
) {
    let json_format = json_logs_override || config.logging.format == "json";
    init(level_for(config, verbose_override), json_format);
}
