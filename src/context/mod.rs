//! Application context holding the shared configuration store.

use std::sync::Arc;

use crate::config::Config;
use crate::store::DotPathStore;
use crate::Error;

/// Service id the configuration store is registered under.
pub const CONFIG_SERVICE: &str = "app.config";

/// Implemented by types that want the configuration store handed to them.
///
/// [`AppContext::inject`] and [`AppContext::resolve`] call
/// [`set_config`](Self::set_config) with the context's shared store.
pub trait ConfigAware {
    fn set_config(&mut self, config: Arc<DotPathStore>);
}

/// Central application context holding configuration and shared resources.
///
/// The store is built once and shared: every call to
/// [`shared_config`](Self::shared_config) and every injection hands out the
/// same `Arc`.
///
/// ## Example
///
/// ```no_run
/// use std::sync::Arc;
/// use dotstore::{AppContext, Config, ConfigAware, DotPathStore};
///
/// #[derive(Default)]
/// struct Mailer {
///     config: Option<Arc<DotPathStore>>,
/// }
///
/// impl ConfigAware for Mailer {
///     fn set_config(&mut self, config: Arc<DotPathStore>) {
///         self.config = Some(config);
///     }
/// }
///
/// let ctx = AppContext::builder()
///     .with_config_builder(
///         Config::builder()
///             .with_env_file(".env")
///             .with_file("config.toml"),
///     )?
///     .build()?;
///
/// let mailer: Mailer = ctx.resolve();
/// # Ok::<(), dotstore::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct AppContext {
    config: Arc<DotPathStore>,
}

impl AppContext {
    /// Creates a new builder for constructing an `AppContext`.
    pub fn builder() -> AppContextBuilder {
        AppContextBuilder { config: None }
    }

    /// Returns a reference to the shared configuration store.
    pub fn config(&self) -> &Arc<DotPathStore> {
        &self.config
    }

    /// Returns a new handle to the shared configuration store.
    pub fn shared_config(&self) -> Arc<DotPathStore> {
        Arc::clone(&self.config)
    }

    /// Whether the context provides the service registered under `id`.
    pub fn provides(&self, id: &str) -> bool {
        id == CONFIG_SERVICE
    }

    /// Hands the shared store to `target` and returns it.
    pub fn inject<T: ConfigAware>(&self, mut target: T) -> T {
        target.set_config(self.shared_config());
        target
    }

    /// Constructs a `T` with its default value and injects the store.
    pub fn resolve<T: ConfigAware + Default>(&self) -> T {
        self.inject(T::default())
    }
}

/// Builder for constructing an [`AppContext`].
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct AppContextBuilder {
    config: Option<DotPathStore>,
}

impl AppContextBuilder {
    /// Attaches an already built configuration store.
    pub fn with_config(mut self, config: DotPathStore) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the store from `config` and attaches it.
    pub fn with_config_builder(self, config: Config) -> Result<Self, Error> {
        Ok(self.with_config(config.build()?))
    }

    /// Builds the `AppContext`.
    ///
    /// Returns an error if no configuration was provided.
    pub fn build(self) -> Result<AppContext, Error> {
        let config = self.config.ok_or(Error::MissingConfig)?;
        Ok(AppContext {
            config: Arc::new(config),
        })
    }
}
