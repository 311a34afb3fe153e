//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

use crate::config::LoggingConfig;

/// Initialize the logging system
pub fn init() {
    env_logger::init();
}

/// Initialize logging from configuration
///
/// The configured level is the default filter; `RUST_LOG` still wins when set.
/// Calling this more than once is harmless, later calls are ignored.
pub fn init_with_config(config: &LoggingConfig) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(parse_level(&config.level));
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    if !config.show_timestamps {
        builder.format_timestamp(None);
    }

    if builder.try_init().is_err() {
        log::debug!("Logger already initialized, keeping existing configuration");
    }
}

/// Parse a level name, falling back to `Info` for anything unrecognized
pub fn parse_level(level: &str) -> log::LevelFilter {
    level.trim().parse().unwrap_or_else(|_| {
        eprintln!("warning: unknown log level '{level}', using 'info'");
        log::LevelFilter::Info
    })
}
