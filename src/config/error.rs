use std::path::PathBuf;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("config file '{0}' must contain a mapping at the top level")]
    ConfigFileInvalid(PathBuf),

    #[error("no config file registered")]
    NoConfigFile,

    #[error(".env file not found: {0}")]
    EnvFileNotFound(PathBuf),

    /// Only the position within the offending line is reported so `.env`
    /// contents never reach logs.
    #[error("failed to parse .env file '{path}' at position {error_index}")]
    EnvParse { path: PathBuf, error_index: usize },

    #[error("failed to read .env file '{path}': {source}")]
    EnvReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("required environment variable missing from .env file: {0}")]
    MissingEnvVar(String),

    #[error("failed to load .env file '{path}': {source}")]
    EnvLoad {
        path: PathBuf,
        source: dotenvy::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}
