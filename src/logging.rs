use chrono::Local;
use log::{LevelFilter, Metadata, Record, SetLoggerError};
use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::OnceLock;

// Console logger with per-topic debug filtering
#[derive(Debug)]
struct CircuitLogger {
    level: LevelFilter,
    debug_filters: Option<HashSet<String>>,
}

impl CircuitLogger {
    fn topic_enabled(&self, target: &str) -> bool {
        match &self.debug_filters {
            Some(filters) => filters.iter().any(|f| target.starts_with(f.as_str())),
            None => true,
        }
    }
}

/// Finds a "Tick N" mention in a message
fn tick_in(message: &str) -> Option<u32> {
    let start = message.find("Tick ")? + 5;
    let digits: String = message[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

impl log::Log for CircuitLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if metadata.level() > self.level {
            return false;
        }
        // Filters only narrow the chatty levels
        match metadata.level() {
            log::Level::Debug | log::Level::Trace => self.topic_enabled(metadata.target()),
            _ => true,
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level_color = match record.level() {
            log::Level::Error => "\x1B[31m", // Red
            log::Level::Warn => "\x1B[33m",  // Yellow
            log::Level::Info => "\x1B[32m",  // Green
            log::Level::Debug => "\x1B[36m", // Cyan
            log::Level::Trace => "\x1B[35m", // Magenta
        };
        let reset = "\x1B[0m";
        let timestamp = Local::now().format("%H:%M:%S%.3f");

        let message = record.args().to_string();
        let context = tick_in(&message)
            .map(|t| format!("[T{:03}] ", t))
            .unwrap_or_default();

        let mut output = format!(
            "{timestamp} {level_color}{level:5}{reset} {context}{target}: {message}",
            level = record.level(),
            target = record.target(),
        );
        if let Some(module_path) = record.module_path() {
            if module_path != record.target() {
                output.push_str(&format!(" [{}]", module_path));
            }
        }

        // A closed stdout must not take the simulation down
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", output);
        let _ = stdout.flush();
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

static LOGGER: OnceLock<CircuitLogger> = OnceLock::new();

/// Installs the logger. `debug_filter` is a comma separated list of topics
/// (board, maze, robot, level) that keep their debug output.
pub fn init_logger(level: LevelFilter, debug_filter: Option<String>) -> Result<(), SetLoggerError> {
    let debug_filters = debug_filter.map(|filter_str| {
        filter_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<HashSet<String>>()
    });

    let logger = LOGGER.get_or_init(|| CircuitLogger {
        level,
        debug_filters,
    });
    log::set_logger(logger).map(|()| log::set_max_level(level))
}

/// Parses a `--log-level` value, falling back to info
pub fn parse_level(name: &str) -> LevelFilter {
    name.parse().unwrap_or(LevelFilter::Info)
}

// Helper macros for specific debug topics. Mention "Tick N" to get the [T###] context.
#[macro_export]
macro_rules! debug_board {
    ($($arg:tt)*) => {
        log::debug!(target: "board", "{}", format_args!($($arg)*))
    }
}

#[macro_export]
macro_rules! debug_maze {
    ($($arg:tt)*) => {
        log::debug!(target: "maze", "{}", format_args!($($arg)*))
    }
}

#[macro_export]
macro_rules! debug_robot {
    ($($arg:tt)*) => {
        log::debug!(target: "robot", "{}", format_args!($($arg)*))
    }
}

#[macro_export]
macro_rules! debug_level {
    ($($arg:tt)*) => {
        log::debug!(target: "level", "{}", format_args!($($arg)*))
    }
}
