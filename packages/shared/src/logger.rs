//! Logging setup for the justone binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build the default filter directive used when `RUST_LOG` is not set.
///
/// Both the library crate and the binary get the same level, plus
/// `tower_http` so request traces show up alongside game events.
pub fn default_directive(crate_name: &str, binary_name: &str, default_log_level: &str) -> String {
    format!(
        "{}={level},{}={level},tower_http={level}",
        crate_name.replace('-', "_"),
        binary_name.replace('-', "_"),
        level = default_log_level
    )
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `crate_name` - The library crate whose events should be shown (e.g., "justone-server")
/// * `binary_name` - The name of the binary (e.g., "justone-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use justone_shared::logger::setup_logger;
///
/// setup_logger("justone-server", "justone-server", "debug");
/// ```
pub fn setup_logger(crate_name: &str, binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                default_directive(crate_name, binary_name, default_log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
