use parking_lot::Mutex;
/// Debug file logging for par-nav
///
/// Controlled by the DEBUG_LEVEL environment variable:
/// - 0 or unset: No debugging
/// - 1: Errors only
/// - 2: Info level (commits, tab/pane switches, rejected commands)
/// - 3: Debug level (mutator decisions, reconciliation)
/// - 4: Trace level (every snapshot read)
///
/// Output goes to par_nav_debug.log in the system temp directory so that
/// debug output never mixes with the CLI's stdout.
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Debug level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Off = 0,
    Error = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl DebugLevel {
    fn from_env() -> Self {
        match std::env::var("DEBUG_LEVEL") {
            Ok(val) => Self::from_number(val.trim().parse::<u8>().unwrap_or(0)),
            Err(_) => DebugLevel::Off,
        }
    }

    fn from_number(n: u8) -> Self {
        match n {
            1 => DebugLevel::Error,
            2 => DebugLevel::Info,
            3 => DebugLevel::Debug,
            4 => DebugLevel::Trace,
            _ => DebugLevel::Off,
        }
    }

    fn from_log_level(level: log::Level) -> Self {
        match level {
            log::Level::Error => DebugLevel::Error,
            log::Level::Warn | log::Level::Info => DebugLevel::Info,
            log::Level::Debug => DebugLevel::Debug,
            log::Level::Trace => DebugLevel::Trace,
        }
    }
}

/// Global debug logger
struct DebugLogger {
    level: DebugLevel,
    file: Option<std::fs::File>,
}

impl DebugLogger {
    fn new(level: DebugLevel) -> Self {
        if level == DebugLevel::Off {
            return DebugLogger { level, file: None };
        }

        let log_path = log_path();
        match OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(&log_path)
        {
            Ok(f) => {
                let mut logger = DebugLogger {
                    level,
                    file: Some(f),
                };
                logger.write_raw(&format!(
                    "\n{}\npar-nav debug session started at {} (level={:?})\n{}\n",
                    "=".repeat(80),
                    get_timestamp(),
                    level,
                    "=".repeat(80)
                ));
                logger
            }
            // Unwritable temp dir: run without a log file
            Err(_) => DebugLogger { level, file: None },
        }
    }

    fn write_raw(&mut self, msg: &str) {
        if let Some(ref mut file) = self.file {
            let _ = file.write_all(msg.as_bytes());
            let _ = file.flush();
        }
    }

    fn log(&mut self, level: DebugLevel, category: &str, msg: &str) {
        if level <= self.level {
            let timestamp = get_timestamp();
            let level_str = match level {
                DebugLevel::Error => "ERROR",
                DebugLevel::Info => "INFO ",
                DebugLevel::Debug => "DEBUG",
                DebugLevel::Trace => "TRACE",
                DebugLevel::Off => return,
            };
            self.write_raw(&format!(
                "[{}] [{}] [{}] {}\n",
                timestamp, level_str, category, msg
            ));
        }
    }
}

static LOGGER: OnceLock<Mutex<DebugLogger>> = OnceLock::new();

fn get_logger() -> &'static Mutex<DebugLogger> {
    LOGGER.get_or_init(|| Mutex::new(DebugLogger::new(DebugLevel::from_env())))
}

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// Location of the debug log file
pub fn log_path() -> std::path::PathBuf {
    std::env::temp_dir().join("par_nav_debug.log")
}

/// Check if debugging is enabled at given level
pub fn is_enabled(level: DebugLevel) -> bool {
    let logger = get_logger().lock();
    level <= logger.level
}

/// Log a message at specified level
pub fn log(level: DebugLevel, category: &str, msg: &str) {
    let mut logger = get_logger().lock();
    logger.log(level, category, msg);
}

/// Log formatted message
pub fn logf(level: DebugLevel, category: &str, args: fmt::Arguments) {
    if is_enabled(level) {
        log(level, category, &format!("{}", args));
    }
}

/// Routes `log` records into the debug file, mirroring them to stderr when
/// `RUST_LOG` is set
struct LogBridge {
    mirror_stderr: bool,
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if self.mirror_stderr {
            eprintln!("[{}] {}: {}", record.level(), record.target(), record.args());
        }
        log(
            DebugLevel::from_log_level(record.level()),
            record.target(),
            &record.args().to_string(),
        );
    }

    fn flush(&self) {}
}

static BRIDGE: OnceLock<LogBridge> = OnceLock::new();

/// Install the `log` bridge.
///
/// `level` caps the `log` facade. When `DEBUG_LEVEL` is unset the debug file
/// is opened at the matching level so `log` output is not lost. Calling this
/// twice is harmless; the first logger stays installed.
pub fn init_log_bridge(level: log::LevelFilter) {
    if std::env::var("DEBUG_LEVEL").is_err() {
        let file_level = match level {
            log::LevelFilter::Off => DebugLevel::Off,
            log::LevelFilter::Error => DebugLevel::Error,
            log::LevelFilter::Warn | log::LevelFilter::Info => DebugLevel::Info,
            log::LevelFilter::Debug => DebugLevel::Debug,
            log::LevelFilter::Trace => DebugLevel::Trace,
        };
        let _ = LOGGER.set(Mutex::new(DebugLogger::new(file_level)));
    }

    let bridge = BRIDGE.get_or_init(|| LogBridge {
        mirror_stderr: std::env::var("RUST_LOG").is_ok(),
    });
    if log::set_logger(bridge).is_ok() {
        log::set_max_level(level);
    }
}

// Convenience macros for logging
#[macro_export]
macro_rules! debug_error {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Error, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_info {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Info, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_log {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Debug, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_trace {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Trace, $category, format_args!($($arg)*))
    };
}
