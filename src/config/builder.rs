use std::path::Path;

use tracing::{debug, info};

use super::env::EnvSource;
use super::file::FileSource;
use super::source::{merge_shallow, ConfigSource};
use super::ConfigError;
use crate::store::{ConfigValue, DotPathStore, Map, DEFAULT_SEPARATOR};

/// Top-level key the `.env` snapshot is stored under.
pub const ENV_KEY: &str = "env";

/// Builder for a [`DotPathStore`] loaded from a `.env` file and config files.
///
/// The `.env` file is loaded first, so a missing or malformed one fails the
/// build before any config file is read. Config files are then merged in
/// registration order, and the `.env` snapshot is merged last under the
/// `env` key. Merging is shallow: a later top-level key replaces the earlier
/// one entirely, so a config file's own `env` table never survives.
///
/// ## Example
///
/// ```no_run
/// use dotstore::Config;
///
/// // .env:        ENVIRONMENT=production
/// //              DATABASE_HOST=db1
/// // config.toml: name = "svc"
/// let store = Config::builder()
///     .with_env_file(".env")
///     .with_file("config.toml")
///     .build()?;
///
/// assert_eq!(store.get("name").and_then(|v| v.as_str()), Some("svc"));
/// assert_eq!(store.get("env.database.host").and_then(|v| v.as_str()), Some("db1"));
/// # Ok::<(), dotstore::ConfigError>(())
/// ```
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct Config {
    env: Option<EnvSource>,
    required_env: Vec<String>,
    files: Vec<FileSource>,
    separator: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            env: None,
            required_env: Vec::new(),
            files: Vec::new(),
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl Config {
    /// Creates a new configuration builder.
    pub fn builder() -> Self {
        Self::default()
    }

    /// Sets the `.env` file to load. It must exist and define `ENVIRONMENT`.
    pub fn with_env_file(mut self, path: impl AsRef<Path>) -> Self {
        self.env = Some(EnvSource::new(path));
        self
    }

    /// Uses a preconfigured `.env` source, e.g. one with custom required keys.
    pub fn with_env_source(mut self, source: EnvSource) -> Self {
        self.env = Some(source);
        self
    }

    /// Adds a key the `.env` file must define, on top of those required by
    /// the env source.
    ///
    /// Applies whether it is called before or after the env file is set. If
    /// no env file is set at all, the build fails with
    /// [`ConfigError::MissingEnvVar`].
    pub fn require_env(mut self, key: impl Into<String>) -> Self {
        self.required_env.push(key.into());
        self
    }

    /// Adds a TOML or JSON config file. The file must exist.
    ///
    /// Sources are applied in registration order, so later files override
    /// top-level keys of earlier ones.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.files.push(FileSource::new(path));
        self
    }

    /// Sets the path separator of the resulting store.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Loads every source and builds the store.
    pub fn build(self) -> Result<DotPathStore, ConfigError> {
        let snapshot = match &self.env {
            Some(env) => self
                .required_env
                .iter()
                .fold(env.clone(), |env, key| env.require(key.as_str()))
                .load()?,
            None => match self.required_env.first() {
                Some(key) => return Err(ConfigError::MissingEnvVar(key.clone())),
                None => Map::new(),
            },
        };

        if self.files.is_empty() {
            return Err(ConfigError::NoConfigFile);
        }

        let mut merged = Map::new();
        for file in &self.files {
            merge_shallow(&mut merged, file.load()?);
        }

        if merged.contains_key(ENV_KEY) {
            debug!("config file defines '{ENV_KEY}', replacing it with the .env snapshot");
        }
        merge_shallow(
            &mut merged,
            Map::from([(ENV_KEY.to_string(), ConfigValue::Map(snapshot))]),
        );

        let store = DotPathStore::with_separator(merged, &self.separator)?;
        info!(
            files = self.files.len(),
            keys = store.root().len(),
            "configuration loaded"
        );
        Ok(store)
    }
}
