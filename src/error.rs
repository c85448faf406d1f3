//! Errors raised while opening handles and initializing the registry.

use std::error::Error;
use std::fmt::Display;
use std::path::PathBuf;

use crate::level::ParseLevelError;

/// An error raised while opening a handle's log file. The handle is still registered when this
/// happens, so later lookups of the same name return that handle without an error.
#[derive(Debug)]
pub enum OpenError {
    CreateDirectory {
        path: PathBuf,
        error: std::io::Error,
    },
    OpenFile {
        path: PathBuf,
        error: std::io::Error,
    },
    ParseLevel(ParseLevelError),
}

impl From<ParseLevelError> for OpenError {
    fn from(value: ParseLevelError) -> Self {
        OpenError::ParseLevel(value)
    }
}

impl Error for OpenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            OpenError::CreateDirectory { error, .. } | OpenError::OpenFile { error, .. } => {
                Some(error)
            }
            OpenError::ParseLevel(error) => Some(error),
        }
    }
}

impl Display for OpenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpenError::CreateDirectory { path, error } => {
                write!(f, "Could not create '{}' ({})", path.display(), error)
            }
            OpenError::OpenFile { path, error } => {
                write!(f, "Could not open '{}' ({})", path.display(), error)
            }
            OpenError::ParseLevel(error) => write!(f, "Could not set the log level ({error})"),
        }
    }
}

/// The default `application` handle could not be opened. The registry is unusable after this, so
/// the free functions in the crate root terminate the process when they encounter it.
#[derive(Debug)]
pub struct InitError {
    pub error: OpenError,
}

impl Error for InitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}

impl Display for InitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Could not initialize the default logger: {}", self.error)
    }
}
