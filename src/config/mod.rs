//! Loading configuration from `.env` and config files.

mod builder;
mod env;
mod error;
mod file;
mod source;

pub use builder::{Config, ENV_KEY};
pub use env::{EnvSource, REQUIRED_ENV_KEY};
pub use error::ConfigError;
pub use file::{FileFormat, FileSource};
pub use source::{merge_shallow, ConfigSource};
