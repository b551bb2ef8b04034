use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("path separator must not be empty")]
    InvalidSeparator,

    #[error("cannot set a value at the empty path")]
    InvalidPath,

    #[error("cannot set '{path}': segment '{segment}' holds a {found}, not a map")]
    PathConflict {
        path: String,
        segment: String,
        found: &'static str,
    },

    #[error("failed to deserialize value at '{path}': {source}")]
    Deserialize {
        path: String,
        source: serde_json::Error,
    },
}
