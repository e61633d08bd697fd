//! File-backed configuration store with default fallback

use super::format::ConfigFormat;
use super::value::{Config, ConfigValue};
use crate::error::{DataprocError, ErrorCode, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

/// What happened during a [`ConfigStore::load`]
#[derive(Debug)]
pub enum LoadOutcome {
    /// The file was read and replaced the in-memory config
    Loaded { path: PathBuf },
    /// The file could not be used; the store now holds its defaults
    Fallback { error: DataprocError },
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// The load error that caused a fallback, if any
    pub fn warning(&self) -> Option<&DataprocError> {
        match self {
            Self::Loaded { .. } => None,
            Self::Fallback { error } => Some(error),
        }
    }
}

/// Read-only view of a store's config
///
/// Handles never mutate; they only hand out snapshots of whatever the owning
/// [`ConfigStore`] currently holds.
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    config: Arc<RwLock<Config>>,
}

impl ConfigHandle {
    /// A handle over a fixed config with no owning store
    pub fn detached(config: Config) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
        }
    }

    pub fn snapshot(&self) -> Config {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Run `f` against the current config without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&Config) -> R) -> R {
        f(&self.config.read().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Owns one [`Config`] and an optional backing file
#[derive(Debug)]
pub struct ConfigStore {
    config: Arc<RwLock<Config>>,
    defaults: Config,
    path: Option<PathBuf>,
}

impl ConfigStore {
    /// In-memory store seeded with `defaults`, which also serve as the load
    /// fallback. An empty `defaults` is replaced by [`Config::defaults`].
    pub fn with_defaults(defaults: Config) -> Self {
        let defaults = if defaults.is_empty() {
            Config::defaults()
        } else {
            defaults
        };

        Self {
            config: Arc::new(RwLock::new(defaults.clone())),
            defaults,
            path: None,
        }
    }

    /// Create a store and immediately load it from `path`
    pub fn open(path: impl AsRef<Path>) -> (Self, LoadOutcome) {
        let mut store = Self::default();
        let outcome = store.load(path);
        (store, outcome)
    }

    /// Load configuration from `path`, falling back to defaults on any failure
    ///
    /// Never fails: a missing, unreadable or malformed file leaves the store
    /// holding its defaults and the cause is returned in
    /// [`LoadOutcome::Fallback`]. `path` becomes the backing path either way.
    pub fn load(&mut self, path: impl AsRef<Path>) -> LoadOutcome {
        let path = path.as_ref();
        self.path = Some(path.to_path_buf());

        match read_config(path) {
            Ok(config) => {
                debug!(
                    "Loaded {} configuration keys from {}",
                    config.len(),
                    path.display()
                );
                self.replace(config);
                LoadOutcome::Loaded {
                    path: path.to_path_buf(),
                }
            }
            Err(error) => {
                if error.is_not_found() {
                    info!(
                        "No configuration at {}, using defaults",
                        path.display()
                    );
                } else {
                    warn!("Error loading config, using defaults: {}", error);
                }
                self.replace(self.defaults.clone());
                LoadOutcome::Fallback { error }
            }
        }
    }

    /// Reload from the backing path; `None` if the store has none
    pub fn reload(&mut self) -> Option<LoadOutcome> {
        let path = self.path.clone()?;
        Some(self.load(path))
    }

    /// Write the current config to `path`
    ///
    /// The in-memory config is untouched whether or not this succeeds.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path);
        let rendered = self.handle().with(|config| format.render(config)).map_err(|e| {
            DataprocError::config_save(
                ErrorCode::SAVE_SERIALIZATION_ERROR,
                format!("Failed to serialize configuration as {}", format),
                Some(path.to_path_buf()),
            )
            .with_context(&e)
            .with_source(e)
        })?;

        write_atomic(path, &rendered).map_err(|e| {
            DataprocError::config_save(
                ErrorCode::SAVE_IO_ERROR,
                "Failed to write configuration file",
                Some(path.to_path_buf()),
            )
            .with_context(&e)
            .with_source(e)
        })?;

        debug!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Save to the backing path
    pub fn persist(&self) -> Result<()> {
        match &self.path {
            Some(path) => self.save(path),
            None => Err(DataprocError::config_save(
                ErrorCode::SAVE_NO_PATH,
                "Store was not loaded from a file",
                None,
            )),
        }
    }

    /// Value for `key`, or `default` if absent
    pub fn get(&self, key: &str, default: impl Into<ConfigValue>) -> ConfigValue {
        self.value(key).unwrap_or_else(|| default.into())
    }

    pub fn value(&self, key: &str) -> Option<ConfigValue> {
        self.handle().with(|config| config.get(key).cloned())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.handle().with(|config| config.contains_key(key))
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.write().insert(key, value);
    }

    /// Shallow-merge `partial` into the config
    pub fn update<K, V>(&mut self, partial: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<ConfigValue>,
    {
        self.write().merge(partial);
    }

    pub fn snapshot(&self) -> Config {
        self.handle().snapshot()
    }

    pub fn handle(&self) -> ConfigHandle {
        ConfigHandle {
            config: Arc::clone(&self.config),
        }
    }

    pub fn defaults(&self) -> &Config {
        &self.defaults
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn replace(&mut self, config: Config) {
        *self.write() = config;
    }

    fn write(&mut self) -> std::sync::RwLockWriteGuard<'_, Config> {
        self.config.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::with_defaults(Config::defaults())
    }
}

fn read_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| {
        let code = if e.kind() == io::ErrorKind::NotFound {
            ErrorCode::CONFIG_NOT_FOUND
        } else {
            ErrorCode::CONFIG_UNREADABLE
        };
        DataprocError::config_load(code, "Failed to read configuration file", path)
            .with_source(e)
    })?;

    let format = ConfigFormat::from_path(path);
    let config = format.parse(&content).map_err(|e| {
        DataprocError::config_load(
            ErrorCode::CONFIG_PARSE_ERROR,
            format!("Failed to parse {} configuration", format),
            path,
        )
        .with_source(e)
    })?;

    if config.is_empty() {
        return Err(DataprocError::config_load(
            ErrorCode::CONFIG_EMPTY,
            "Configuration file contains no settings",
            path,
        ));
    }

    Ok(config)
}

/// Write via a sibling temp file and rename over the target
fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let mut temp_name = file_name.to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, contents)?;
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }
    Ok(())
}
