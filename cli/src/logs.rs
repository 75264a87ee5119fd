//! Console logger for the native client.
//!
//! Routes `log` records from the workflow and the mock server to stderr
//! with a timestamp and an emoji prefix, leaving stdout for command output.

use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record};

/// Minimal `log` backend writing to stderr.
pub struct ConsoleLogger {
    level: LevelFilter,
}

impl ConsoleLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    /// Install as the global logger. Safe to call more than once.
    pub fn init(level: LevelFilter) {
        if log::set_boxed_logger(Box::new(Self::new(level))).is_ok() {
            log::set_max_level(level);
        }
    }

    /// Verbosity from the number of `-v` flags.
    pub fn level_for(verbosity: u8) -> LevelFilter {
        match verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Prefix shown in front of each record.
pub fn prefix(level: Level) -> &'static str {
    match level {
        Level::Error => "❌",
        Level::Warn => "⚠️ ",
        Level::Info => "  ",
        Level::Debug => "🔍",
        Level::Trace => "  ·",
    }
}

/// Render one record line.
pub fn format_line(level: Level, timestamp: &str, message: &str) -> String {
    format!("[{}] {} {}", timestamp, prefix(level), message)
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let timestamp = Local::now().format("%H:%M:%S").to_string();
        eprintln!("{}", format_line(record.level(), &timestamp, &record.args().to_string()));
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(ConsoleLogger::level_for(0), LevelFilter::Warn);
        assert_eq!(ConsoleLogger::level_for(1), LevelFilter::Info);
        assert_eq!(ConsoleLogger::level_for(7), LevelFilter::Trace);
    }

    #[test]
    fn test_enabled_respects_level() {
        let logger = ConsoleLogger::new(LevelFilter::Info);
        let debug = Metadata::builder().level(Level::Debug).build();
        let error = Metadata::builder().level(Level::Error).build();
        assert!(!logger.enabled(&debug));
        assert!(logger.enabled(&error));
    }

    #[test]
    fn test_format_line() {
        let line = format_line(Level::Error, "12:00:00", "Error uploading image: boom");
        assert_eq!(line, "[12:00:00] ❌ Error uploading image: boom");
    }
}
