//! The configuration consulted whenever a new handle is opened.

use std::path::{Path, PathBuf};

/// The directory log files are created in and the level new handles start out with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Every handle writes to `<directory>/<name>.log`.
    pub directory: PathBuf,
    /// The level name new handles are opened with. This is stored as-is, even when it isn't a
    /// valid level name. Handles opened while it is invalid fail with
    /// [`OpenError::ParseLevel`][crate::OpenError::ParseLevel].
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            level: String::from("info"),
        }
    }
}

impl Config {
    /// A configuration writing to `directory` at `level`.
    pub fn new<P: Into<PathBuf>, S: Into<String>>(directory: P, level: S) -> Self {
        Self {
            directory: directory.into(),
            level: level.into(),
        }
    }

    /// Overwrite the directory and the level. Empty values keep the current setting.
    pub fn apply(&mut self, directory: &Path, level: &str) {
        if !directory.as_os_str().is_empty() {
            self.directory = directory.to_owned();
        }
        if !level.is_empty() {
            self.level = level.to_owned();
        }
    }

    /// The path of the log file for the handle called `name`. The name is not sanitized.
    pub fn log_file_path(&self, name: &str) -> PathBuf {
        self.directory.join(format!("{name}.log"))
    }
}
