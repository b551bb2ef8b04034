pub mod config;
pub mod context;
mod error;
pub mod store;

pub use config::{Config, ConfigError};
pub use context::{AppContext, ConfigAware};
pub use error::Error;
pub use store::{ConfigValue, DotPathStore, Map, StoreError};
