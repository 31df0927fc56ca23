//! Captures `log` records for the activity pane
//!
//! The TUI owns the terminal, so records go to a bounded in-memory buffer
//! instead; only errors still reach stderr.

use chrono::{DateTime, Local};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Oldest entries are dropped past this many
const MAX_LOG_ENTRIES: usize = 500;

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub level: Level,
    pub message: String,
}

/// Shared between the logger and the renderer
pub type LogBuffer = Arc<Mutex<VecDeque<LogEntry>>>;

pub struct ActivityLogger {
    buffer: LogBuffer,
    /// What still goes to stderr
    terminal: env_logger::Logger,
    /// What lands in the activity pane
    capture_filter: env_logger::Logger,
}

impl ActivityLogger {
    pub fn new(buffer: LogBuffer) -> Self {
        let terminal = env_logger::Builder::from_default_env()
            .filter_level(LevelFilter::Error)
            .build();

        let capture_filter = match std::env::var("RUST_LOG") {
            Ok(_) => env_logger::Builder::from_default_env().build(),
            Err(_) => env_logger::Builder::new()
                .filter_module("command_palette", LevelFilter::Debug)
                .filter_module("command_palette_tui", LevelFilter::Info)
                .build(),
        };

        Self {
            buffer,
            terminal,
            capture_filter,
        }
    }

    pub fn create_buffer() -> LogBuffer {
        Arc::new(Mutex::new(VecDeque::with_capacity(MAX_LOG_ENTRIES)))
    }

    fn capture(&self, record: &Record) {
        let Ok(mut buffer) = self.buffer.lock() else {
            return;
        };
        while buffer.len() >= MAX_LOG_ENTRIES {
            buffer.pop_front();
        }
        buffer.push_back(LogEntry {
            at: Local::now(),
            level: record.level(),
            message: record.args().to_string(),
        });
    }
}

impl Log for ActivityLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.capture_filter.enabled(metadata) || self.terminal.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if self.capture_filter.matches(record) {
            self.capture(record);
        }
        if self.terminal.matches(record) {
            self.terminal.log(record);
        }
    }

    fn flush(&self) {
        self.terminal.flush();
    }
}

/// Install the activity logger as the global logger
///
/// Call once, before anything logs. Without `RUST_LOG` the palette library
/// is captured from Debug and this binary from Info; with it, `RUST_LOG`
/// decides (e.g. `RUST_LOG=command_palette::search=trace`).
pub fn init_logger() -> anyhow::Result<LogBuffer> {
    let buffer = ActivityLogger::create_buffer();

    log::set_boxed_logger(Box::new(ActivityLogger::new(buffer.clone())))?;
    log::set_max_level(LevelFilter::Trace);

    log::info!("Activity log initialized");
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_is_bounded() {
        let buffer = ActivityLogger::create_buffer();
        let logger = ActivityLogger::new(buffer.clone());

        for i in 0..(MAX_LOG_ENTRIES + 10) {
            logger.capture(
                &Record::builder()
                    .args(format_args!("entry {}", i))
                    .level(Level::Info)
                    .target("command_palette_tui")
                    .build(),
            );
        }

        let buffer = buffer.lock().unwrap();
        assert_eq!(buffer.len(), MAX_LOG_ENTRIES);
        assert_eq!(buffer.front().unwrap().message, "entry 10");
    }
}
