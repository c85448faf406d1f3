//! The name to handle registry.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::Config;
use crate::error::{InitError, OpenError};
use crate::level::{self, ParseLevelError};
use crate::logger::LogHandle;

/// The name of the handle created during initialization. This handle also mirrors its output to
/// STDOUT.
pub const DEFAULT_LOGGER_NAME: &str = "application";

/// Owns every [`LogHandle`] and the [`Config`] they are opened with. There is at most one handle
/// per name until the registry is initialized again.
///
/// The registry initializes itself on first use if [`initialize()`][Self::initialize()] was never
/// called. A single lock guards the handles and the configuration, so concurrent first lookups of
/// the same name still result in a single handle.
#[derive(Debug, Default)]
pub struct Registry {
    state: Mutex<RegistryState>,
}

#[derive(Debug, Default)]
struct RegistryState {
    config: Config,
    entries: HashMap<String, Arc<LogHandle>>,
    /// The `application` handle. `None` until the registry has been successfully initialized.
    default_handle: Option<Arc<LogHandle>>,
}

impl RegistryState {
    /// Open the `application` handle if that hasn't happened yet. Unlike other handles, a broken
    /// `application` handle is not kept around so the next call tries to open it again.
    fn ensure_initialized(&mut self) -> Result<Arc<LogHandle>, InitError> {
        if let Some(handle) = &self.default_handle {
            return Ok(handle.clone());
        }

        let (handle, result) = self.lookup_or_open(DEFAULT_LOGGER_NAME, true);
        if let Err(error) = result {
            self.entries.remove(DEFAULT_LOGGER_NAME);
            return Err(InitError { error });
        }
        self.default_handle = Some(handle.clone());

        Ok(handle)
    }

    /// Return the handle for `name`, opening it first if it isn't registered yet. The handle is
    /// registered even when opening it fails, in which case the error is returned alongside it.
    fn lookup_or_open(
        &mut self,
        name: &str,
        mirror_stdout: bool,
    ) -> (Arc<LogHandle>, Result<(), OpenError>) {
        if let Some(handle) = self.entries.get(name) {
            return (handle.clone(), Ok(()));
        }

        let handle = Arc::new(LogHandle::unopened(name));
        let result = handle.open(&self.config, mirror_stdout);
        self.entries.insert(name.to_owned(), handle.clone());

        (handle, result)
    }
}

impl Registry {
    /// Create an uninitialized registry. Nothing is written to disk until the first lookup.
    pub fn new(config: Config) -> Self {
        Self {
            state: Mutex::new(RegistryState {
                config,
                ..RegistryState::default()
            }),
        }
    }

    /// Update the configuration, forget all registered handles, and open the `application` handle.
    /// An empty `directory` or `level` keeps the current value. Forgotten handles are closed once
    /// the last reference to them is dropped.
    ///
    /// An error means that the `application` handle could not be opened. The registry stays
    /// uninitialized and tries to open it again on the next lookup.
    pub fn initialize<P: AsRef<Path>>(&self, directory: P, level: &str) -> Result<(), InitError> {
        let mut state = self.state();
        state.config.apply(directory.as_ref(), level);
        state.entries.clear();
        state.default_handle = None;

        state.ensure_initialized().map(|_| ())
    }

    /// Initialize the registry with its current configuration if that hasn't happened yet.
    pub fn ensure_initialized(&self) -> Result<(), InitError> {
        self.state().ensure_initialized().map(|_| ())
    }

    /// Get the handle for `name`, creating `<directory>/<name>.log` on first use. `mirror_stdout`
    /// only has an effect when the handle does not exist yet.
    ///
    /// # Notes
    ///
    /// When opening a new handle fails, the broken handle is still registered. Later lookups of
    /// the same name return it without an error and anything written to it is lost. If the
    /// implicit initialization fails, then the `application` handle's error is returned instead.
    pub fn get_instance(
        &self,
        name: &str,
        mirror_stdout: bool,
    ) -> Result<Arc<LogHandle>, OpenError> {
        self.initialize_and_get_instance(name, mirror_stdout)
            .map_err(|err| err.error)?
    }

    /// [`get_instance()`][Self::get_instance()], but with initialization failures kept apart from
    /// failures to open the requested handle. Both happen while holding the lock once.
    pub(crate) fn initialize_and_get_instance(
        &self,
        name: &str,
        mirror_stdout: bool,
    ) -> Result<Result<Arc<LogHandle>, OpenError>, InitError> {
        let mut state = self.state();
        state.ensure_initialized()?;

        let (handle, result) = state.lookup_or_open(name, mirror_stdout);
        Ok(result.map(|()| handle))
    }

    /// The `application` handle, initializing the registry if needed.
    pub fn default_logger(&self) -> Result<Arc<LogHandle>, InitError> {
        self.state().ensure_initialized()
    }

    /// Change the level of every registered handle, and of all handles opened from here on.
    ///
    /// The new level is stored even if it cannot be parsed. In that case none of the existing
    /// handles change, the parsing error is returned, and every handle opened afterwards fails with
    /// [`OpenError::ParseLevel`] until a valid level is set.
    pub fn set_level(&self, level: &str) -> Result<(), ParseLevelError> {
        let mut state = self.state();
        state.config.level = level.to_owned();

        let threshold = level::parse_level(level)?;
        if let Some(handle) = &state.default_handle {
            handle.set_threshold(threshold);
        }
        for handle in state.entries.values() {
            handle.set_threshold(threshold);
        }

        Ok(())
    }

    /// A copy of the current configuration.
    pub fn config(&self) -> Config {
        self.state().config.clone()
    }

    /// Forget every handle and restore the default configuration, leaving the registry in the
    /// same state as [`Registry::default()`].
    pub fn reset(&self) {
        *self.state() = RegistryState::default();
    }

    fn state(&self) -> MutexGuard<'_, RegistryState> {
        match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
