//! Logging bridge for the compiler.
//!
//! Routes all `log::info!()` etc. to stderr with a level prefix, so
//! notices (missing glyphs, label sanitization) are visible alongside
//! the run output without polluting stdout. Level precedence: the CLI
//! `--log-level` flag, then the `PRESHAPE_LOG` environment variable,
//! then `info`.

use std::io::Write;
use std::sync::OnceLock;

use log::{Level, LevelFilter, Log, Metadata, Record};

struct StderrLogger {
    level: LevelFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level_str = match record.level() {
            Level::Error => "ERROR",
            Level::Warn => "WARN ",
            Level::Info => "INFO ",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        };
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "[{}] {}", level_str, record.args());
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Parse a level name; unknown names fall back to `info`.
pub fn parse_level(name: &str) -> LevelFilter {
    match name.trim().to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Install the stderr logger. Safe to call once per process; repeated
/// calls (e.g. from tests) are ignored.
pub fn init_log_bridge(cli_level: Option<LevelFilter>) {
    let level = cli_level
        .or_else(|| std::env::var("PRESHAPE_LOG").ok().map(|v| parse_level(&v)))
        .unwrap_or(LevelFilter::Info);

    let logger = LOGGER.get_or_init(|| StderrLogger { level });
    if log::set_logger(logger).is_ok() {
        log::set_max_level(level);
    }
}
