//! Host console logger.
//!
//! On the device `esp_idf_logger` routes the `log` facade to the IDF
//! console.  Host builds install this backend instead: one line per
//! record on stderr, level taken from `WATERHEATER_LOG`
//! (`error`..`trace`, default `info`).

use std::io::Write;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

/// Environment variable holding the maximum log level.
pub const LEVEL_ENV: &str = "WATERHEATER_LOG";

pub struct ConsoleLogger {
    started: Instant,
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let elapsed = self.started.elapsed();
        let _ = writeln!(
            std::io::stderr().lock(),
            "[{:>5}.{:03}] {:<5} {}: {}",
            elapsed.as_secs(),
            elapsed.subsec_millis(),
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Parse a level name; unknown names fall back to `Info`.
pub fn parse_level(name: &str) -> LevelFilter {
    name.trim().parse().unwrap_or(LevelFilter::Info)
}

/// Install the console logger as the global `log` backend.
pub fn init() -> Result<(), log::SetLoggerError> {
    let level = std::env::var(LEVEL_ENV)
        .map(|v| parse_level(&v))
        .unwrap_or(LevelFilter::Info);
    let logger = Box::leak(Box::new(ConsoleLogger {
        started: Instant::now(),
    }));
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}
