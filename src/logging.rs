//! Log sink
//!
//! The crate logs through the `log` facade. This module installs a sink
//! that writes each record to a log file, or to stderr when no file is
//! configured, and maps the host's numeric verbosity onto `log` filters.

use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::{const_mutex, Mutex};

/// Log levels matching the host's numeric verbosity
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Nothing = 0,
    User = 1,
    Error = 2,
    Warning = 3,
    #[default]
    Info = 4,
    Debug = 5,
    All = 6,
}

impl LogLevel {
    /// Create a LogLevel from an integer; unknown values map to `Info`
    pub fn from_i32(level: i32) -> Self {
        match level {
            0 => LogLevel::Nothing,
            1 => LogLevel::User,
            2 => LogLevel::Error,
            3 => LogLevel::Warning,
            4 => LogLevel::Info,
            5 => LogLevel::Debug,
            6 => LogLevel::All,
            _ => LogLevel::Info,
        }
    }

    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Nothing => LevelFilter::Off,
            LogLevel::User | LogLevel::Error => LevelFilter::Error,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::All => LevelFilter::Trace,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nothing" | "off" => Ok(LogLevel::Nothing),
            "user" => Ok(LogLevel::User),
            "error" => Ok(LogLevel::Error),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "all" | "trace" => Ok(LogLevel::All),
            other => other
                .parse::<i32>()
                .ok()
                .filter(|n| (0..=6).contains(n))
                .map(LogLevel::from_i32)
                .ok_or_else(|| format!("unknown log level '{}'", s)),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Nothing => "nothing",
            LogLevel::User => "user",
            LogLevel::Error => "error",
            LogLevel::Warning => "warning",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::All => "all",
        };
        f.write_str(name)
    }
}

/// Writes records to the log file if one is open, stderr otherwise
struct SinkLogger {
    file: Mutex<Option<File>>,
}

static LOGGER: SinkLogger = SinkLogger {
    file: const_mutex(None),
};

impl Log for SinkLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut guard = self.file.lock();
        match guard.as_mut() {
            Some(file) => {
                // Flush per record; the host may exit without notice
                let _ = writeln!(file, "[{}] {}", record.level(), record.args());
                let _ = file.flush();
            }
            None => eprintln!("[{}] {}", record.level(), record.args()),
        }
    }

    fn flush(&self) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.flush();
        }
    }
}

/// Install the sink at `level`, writing to `path` when given.
///
/// The file is created or truncated. Calling this again swaps the file and
/// level; if another logger was installed first, only the level changes.
pub fn init_logging(level: LogLevel, path: Option<&Path>) -> io::Result<()> {
    let file = path.map(File::create).transpose()?;
    *LOGGER.file.lock() = file;

    if log::set_logger(&LOGGER).is_err() {
        log::debug!("Logger already installed; keeping it");
    }
    set_level(level);
    Ok(())
}

/// Change the verbosity of everything logged through the facade
pub fn set_level(level: LogLevel) {
    log::set_max_level(level.to_level_filter());
}
