//! Diagnostic logging to stderr using simplelog.
//!
//! Stores log through the `log` facade; only the binary installs a logger.
//! Level precedence: `-v` flags, then `RUST_LOG`, then config `log_level`.

use crate::config::{Config, LogLevel};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

/// Pick the log level from the verbosity count, `rust_log` and `config`.
pub fn resolve_level(verbose: u8, rust_log: Option<&str>, config: &Config) -> LevelFilter {
    match verbose {
        0 => {}
        1 => return LevelFilter::Debug,
        _ => return LevelFilter::Trace,
    }

    rust_log
        .and_then(LogLevel::from_str)
        .unwrap_or_else(|| config.log_level())
        .to_filter()
}

/// Install the stderr logger. Does nothing if a logger is already set.
pub fn init(verbose: u8, config: &Config) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let level = resolve_level(verbose, rust_log.as_deref(), config);

    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Off)
        .build();

    let _ = WriteLogger::init(level, log_config, std::io::stderr());
}
