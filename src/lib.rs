//! Named, leveled file loggers sharing a single global level.
//!
//! Every name maps to one [`LogHandle`] writing to `<directory>/<name>.log`. The handles live in a
//! [`Registry`]. The free functions in this module operate on a process-wide registry that
//! initializes itself on first use, while separate [`Registry`] instances can be created for
//! isolated use.
//!
//! ```no_run
//! named_log::init("logs", "info");
//!
//! let handle = named_log::get_instance("svc", false).expect("Could not open svc.log");
//! handle.info("hello");
//! named_log::warn!(handle, "{} retries left", 3);
//!
//! named_log::set_level("error").expect("'error' is a valid level");
//! handle.warn("this is no longer written");
//! ```

use log::{LevelFilter, SetLoggerError};
use once_cell::sync::{Lazy, OnceCell};
use std::path::Path;
use std::sync::Arc;

mod config;
mod error;
mod level;
mod logger;
mod registry;
mod target;

pub use config::Config;
pub use error::{InitError, OpenError};
pub use level::{parse_level, ParseLevelError, Severity};
pub use logger::{LogHandle, Spaced};
pub use registry::{Registry, DEFAULT_LOGGER_NAME};

/// The process-wide registry used by the free functions in this module.
static REGISTRY: Lazy<Registry> = Lazy::new(Registry::default);

/// The handle installed as the `log` crate's logger using [`install()`].
static INSTALLED_HANDLE: OnceCell<Arc<LogHandle>> = OnceCell::new();

/// The process-wide registry.
pub fn registry() -> &'static Registry {
    &REGISTRY
}

/// Set the log directory and level for the process-wide registry, forget all existing handles,
/// and open the `application` handle. Empty values keep the current setting, which defaults to
/// the working directory and `info`.
///
/// # Notes
///
/// The process is terminated with exit status 1 if the `application` handle cannot be opened.
/// Use [`Registry::initialize()`] to handle that error instead.
pub fn init<P: AsRef<Path>>(directory: P, level: &str) {
    exit_on_init_failure(REGISTRY.initialize(directory, level));
}

/// Get the handle for `name` from the process-wide registry. See [`Registry::get_instance()`].
///
/// # Notes
///
/// The process is terminated with exit status 1 if the registry needs to be initialized and the
/// `application` handle cannot be opened.
pub fn get_instance(name: &str, mirror_stdout: bool) -> Result<Arc<LogHandle>, OpenError> {
    exit_on_init_failure(REGISTRY.initialize_and_get_instance(name, mirror_stdout))
}

/// The process-wide `application` handle. This handle writes to both `application.log` and STDOUT.
///
/// # Notes
///
/// The process is terminated with exit status 1 if the handle cannot be opened.
pub fn default_logger() -> Arc<LogHandle> {
    exit_on_init_failure(REGISTRY.default_logger())
}

/// Change the level of every handle in the process-wide registry. See [`Registry::set_level()`].
pub fn set_level(level: &str) -> Result<(), ParseLevelError> {
    REGISTRY.set_level(level)
}

/// Forget every handle in the process-wide registry and restore the default configuration.
pub fn reset() {
    REGISTRY.reset();
}

/// Install a handle as the logger for the `log` crate's macros. Records are filtered using the
/// handle's threshold, so [`set_level()`] also applies to them. This can only succeed once per
/// process.
pub fn install(handle: Arc<LogHandle>) -> Result<(), SetLoggerError> {
    let handle = INSTALLED_HANDLE.get_or_init(|| handle);
    log::set_logger(&**handle)?;
    log::set_max_level(LevelFilter::Trace);

    Ok(())
}

fn exit_on_init_failure<T>(result: Result<T, InitError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
