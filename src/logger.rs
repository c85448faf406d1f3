//! The named log handles and their leveled logging methods.

use log::{LevelFilter, Log};
use std::fmt::{Arguments, Display};
use std::sync::{Mutex, MutexGuard, RwLock};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::config::Config;
use crate::error::OpenError;
use crate::level::{self, Severity};
use crate::target::{self, OutputTarget};

const TIMESTAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]");

/// A named logger writing to `<name>.log`. Handles are obtained through a
/// [`Registry`][crate::Registry] and shared, so every lookup of the same name yields the same
/// handle.
///
/// # Notes
///
/// After [`close()`][Self::close()] has been called the handle stays registered, but all further
/// messages are silently discarded.
pub struct LogHandle {
    name: String,
    /// The current threshold. Changed by the registry whenever the global level changes.
    threshold: RwLock<LevelFilter>,
    /// `None` if the file could not be opened or if the handle has been closed.
    output: Mutex<Option<OutputTarget>>,
}

impl std::fmt::Debug for LogHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogHandle")
            .field("name", &self.name)
            .field("threshold", &self.threshold())
            .field("output", &*self.output())
            .finish()
    }
}

/// Writes a list of values separated by single spaces. This is the counterpart to the format
/// string variants of the logging methods:
///
/// ```
/// # let dir = tempfile::tempdir().unwrap();
/// # let registry = named_log::Registry::new(named_log::Config::new(dir.path(), "info"));
/// let handle = registry.get_instance("worker", false).unwrap();
/// handle.info(named_log::Spaced(&[&"processed", &12, &"jobs"]));
/// ```
pub struct Spaced<'a>(pub &'a [&'a dyn Display]);

impl Display for Spaced<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{value}")?;
        }

        Ok(())
    }
}

impl LogHandle {
    /// A handle without a file. Messages are dropped until [`open()`][Self::open()] succeeds.
    pub(crate) fn unopened(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            threshold: RwLock::new(level::DEFAULT_THRESHOLD),
            output: Mutex::new(None),
        }
    }

    /// Create the log directory, open the log file, and apply the configured level, in that
    /// order. The first failure aborts the remaining steps. A level parsing failure leaves the
    /// file open with the default `info` threshold.
    pub(crate) fn open(&self, config: &Config, mirror_stdout: bool) -> Result<(), OpenError> {
        if let Err(error) = target::create_directory(&config.directory) {
            eprintln!("Could not create '{}': {error}", config.directory.display());
            return Err(OpenError::CreateDirectory {
                path: config.directory.clone(),
                error,
            });
        }

        let path = config.log_file_path(&self.name);
        match OutputTarget::new_file_path(&path, mirror_stdout) {
            Ok(target) => *self.output() = Some(target),
            Err(error) => {
                eprintln!("Could not open '{}': {error}", path.display());
                return Err(OpenError::OpenFile { path, error });
            }
        }

        match level::parse_level(&config.level) {
            Ok(threshold) => {
                self.set_threshold(threshold);
                Ok(())
            }
            Err(error) => {
                eprintln!("Could not parse the log level for '{}': {error}", self.name);
                Err(error.into())
            }
        }
    }

    /// The name this handle is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The minimum level a non-fatal message needs in order to be written.
    pub fn threshold(&self) -> LevelFilter {
        match self.threshold.read() {
            Ok(threshold) => *threshold,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub(crate) fn set_threshold(&self, threshold: LevelFilter) {
        match self.threshold.write() {
            Ok(mut current) => *current = threshold,
            Err(poisoned) => *poisoned.into_inner() = threshold,
        }
    }

    /// Whether the handle currently has an open file.
    pub fn is_open(&self) -> bool {
        self.output().is_some()
    }

    /// Release the log file. The handle stays registered under its name and any further messages
    /// written to it are discarded.
    pub fn close(&self) {
        self.output().take();
    }

    /// Write a message if `severity` passes the threshold. Write failures are not reported.
    pub fn log_args(&self, severity: Severity, args: Arguments) {
        if !severity.admitted_by(self.threshold()) {
            return;
        }

        let timestamp = OffsetDateTime::now_local()
            .unwrap_or_else(|_| OffsetDateTime::now_utc())
            .format(TIMESTAMP_FORMAT)
            .unwrap_or_default();
        let message = args.to_string();
        if let Some(target) = self.output().as_mut() {
            let _ = target.write_line(&timestamp, severity, &self.name, &message);
        }
    }

    /// Log a debug message if the threshold admits it.
    pub fn debug(&self, msg: impl Display) {
        self.log_args(Severity::Debug, format_args!("{msg}"));
    }

    /// The format string variant of [`debug()`][Self::debug()], used by the
    /// [`debug!`][crate::debug] macro.
    pub fn debugf(&self, args: Arguments) {
        self.log_args(Severity::Debug, args);
    }

    /// Log an info message if the threshold admits it.
    pub fn info(&self, msg: impl Display) {
        self.log_args(Severity::Info, format_args!("{msg}"));
    }

    /// The format string variant of [`info()`][Self::info()], used by the
    /// [`info!`][crate::info] macro.
    pub fn infof(&self, args: Arguments) {
        self.log_args(Severity::Info, args);
    }

    /// Log a warning if the threshold admits it.
    pub fn warn(&self, msg: impl Display) {
        self.log_args(Severity::Warn, format_args!("{msg}"));
    }

    /// The format string variant of [`warn()`][Self::warn()], used by the
    /// [`warn!`][crate::warn] macro.
    pub fn warnf(&self, args: Arguments) {
        self.log_args(Severity::Warn, args);
    }

    /// An alias for [`warn()`][Self::warn()].
    pub fn warning(&self, msg: impl Display) {
        self.warn(msg);
    }

    /// An alias for [`warnf()`][Self::warnf()].
    pub fn warningf(&self, args: Arguments) {
        self.warnf(args);
    }

    /// Log an error if the threshold admits it.
    pub fn error(&self, msg: impl Display) {
        self.log_args(Severity::Error, format_args!("{msg}"));
    }

    /// The format string variant of [`error()`][Self::error()], used by the
    /// [`error!`][crate::error] macro.
    pub fn errorf(&self, args: Arguments) {
        self.log_args(Severity::Error, args);
    }

    /// Write the message regardless of the threshold and then terminate the process with exit
    /// status 1.
    pub fn fatal(&self, msg: impl Display) -> ! {
        self.fatalf(format_args!("{msg}"))
    }

    /// The format string variant of [`fatal()`][Self::fatal()].
    pub fn fatalf(&self, args: Arguments) -> ! {
        self.log_args(Severity::Fatal, args);
        std::process::exit(1)
    }

    fn output(&self) -> MutexGuard<'_, Option<OutputTarget>> {
        match self.output.lock() {
            Ok(output) => output,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Log for LogHandle {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.threshold()
    }

    fn log(&self, record: &log::Record) {
        self.log_args(record.level().into(), *record.args());
    }

    fn flush(&self) {
        if let Some(target) = self.output().as_mut() {
            let _ = target.flush();
        }
    }
}

/// Log a formatted debug message to a handle: `debug!(handle, "{} items", count)`.
#[macro_export]
macro_rules! debug {
    ($handle:expr, $($arg:tt)+) => {
        $handle.debugf(::std::format_args!($($arg)+))
    };
}

/// Log a formatted info message to a handle: `info!(handle, "{} items", count)`.
#[macro_export]
macro_rules! info {
    ($handle:expr, $($arg:tt)+) => {
        $handle.infof(::std::format_args!($($arg)+))
    };
}

/// Log a formatted warning to a handle: `warn!(handle, "{} items", count)`.
#[macro_export]
macro_rules! warn {
    ($handle:expr, $($arg:tt)+) => {
        $handle.warnf(::std::format_args!($($arg)+))
    };
}

/// Log a formatted error to a handle: `error!(handle, "{} items", count)`.
#[macro_export]
macro_rules! error {
    ($handle:expr, $($arg:tt)+) => {
        $handle.errorf(::std::format_args!($($arg)+))
    };
}

/// Log a formatted message to a handle and terminate the process.
#[macro_export]
macro_rules! fatal {
    ($handle:expr, $($arg:tt)+) => {
        $handle.fatalf(::std::format_args!($($arg)+))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_handle(dir: &std::path::Path, name: &str, level: &str) -> LogHandle {
        let handle = LogHandle::unopened(name);
        handle.open(&Config::new(dir, level), false).unwrap();
        handle
    }

    fn read_log(dir: &std::path::Path, name: &str) -> String {
        std::fs::read_to_string(dir.join(format!("{name}.log"))).unwrap()
    }

    #[test]
    fn writes_admitted_messages() {
        let dir = tempfile::tempdir().unwrap();
        let handle = open_handle(dir.path(), "writes", "warn");

        handle.info("info message");
        handle.warning("warn message");
        crate::error!(handle, "error {}", 42);

        let contents = read_log(dir.path(), "writes");
        assert!(!contents.contains("info message"));
        assert!(contents.contains("[WARN] writes: warn message"));
        assert!(contents.contains("[ERROR] writes: error 42"));
    }

    #[test]
    fn spaced_values_are_joined_with_spaces() {
        let dir = tempfile::tempdir().unwrap();
        let handle = open_handle(dir.path(), "spaced", "debug");

        handle.debug(Spaced(&[&"a", &1, &2.5, &'c']));
        assert!(read_log(dir.path(), "spaced").contains("spaced: a 1 2.5 c\n"));
        assert_eq!(Spaced(&[]).to_string(), "");
    }

    #[test]
    fn invalid_level_keeps_file_with_default_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let handle = LogHandle::unopened("bad_level");

        let err = handle
            .open(&Config::new(dir.path(), "loud"), false)
            .unwrap_err();
        assert!(matches!(err, OpenError::ParseLevel(_)));
        assert!(handle.is_open());
        assert_eq!(handle.threshold(), LevelFilter::Info);

        handle.debug("dropped");
        handle.info("kept");
        let contents = read_log(dir.path(), "bad_level");
        assert!(!contents.contains("dropped"));
        assert!(contents.contains("kept"));
    }

    #[test]
    fn close_discards_later_messages() {
        let dir = tempfile::tempdir().unwrap();
        let handle = open_handle(dir.path(), "closed", "info");

        handle.info("before close");
        handle.close();
        assert!(!handle.is_open());
        handle.info("after close");
        // Closing twice is harmless
        handle.close();

        let contents = read_log(dir.path(), "closed");
        assert!(contents.contains("before close"));
        assert!(!contents.contains("after close"));
    }

    #[test]
    fn log_facade_records_respect_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let handle = open_handle(dir.path(), "facade", "info");

        assert!(!handle.enabled(
            &log::Metadata::builder()
                .level(log::Level::Debug)
                .build()
        ));
        handle.log(
            &log::Record::builder()
                .level(log::Level::Debug)
                .args(format_args!("facade debug"))
                .build(),
        );
        handle.log(
            &log::Record::builder()
                .level(log::Level::Info)
                .args(format_args!("facade info"))
                .build(),
        );
        handle.flush();

        let contents = read_log(dir.path(), "facade");
        assert!(!contents.contains("facade debug"));
        assert!(contents.contains("facade info"));
    }
}
