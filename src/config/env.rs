//! `.env` file loading.
//!
//! Keys are lower-cased and then split on `_` into nested maps, so
//! `DATABASE_HOST=db1` becomes `{ database: { host: "db1" } }`. Keys are
//! applied in file order and the last write wins: `APP=demo` followed by
//! `APP_NAME=svc` leaves `{ app: { name: "svc" } }`, and the reverse order
//! leaves `{ app: "demo" }`.
//!
//! Values are kept as raw strings. `$VAR` and `${VAR}` are not expanded, and
//! the process environment is neither read nor written; callers get the
//! parsed snapshot back as a [`Map`].

use std::io::Cursor;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::source::ConfigSource;
use super::ConfigError;
use crate::store::{ConfigValue, Map};

/// Key every `.env` file must define unless overridden with
/// [`EnvSource::with_required`].
pub const REQUIRED_ENV_KEY: &str = "ENVIRONMENT";

const NESTING_SEPARATOR: &str = "_";

#[derive(Debug, Clone)]
pub struct EnvSource {
    path: PathBuf,
    required: Vec<String>,
}

impl EnvSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required: vec![REQUIRED_ENV_KEY.to_string()],
        }
    }

    /// Adds a key that must be present in the file.
    pub fn require(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        if !self.required.contains(&key) {
            self.required.push(key);
        }
        self
    }

    /// Replaces the set of required keys.
    pub fn with_required<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses the file into raw `(KEY, value)` pairs in file order.
    fn read_pairs(&self) -> Result<Vec<(String, String)>, ConfigError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::EnvFileNotFound(self.path.clone()));
            }
            Err(e) => {
                return Err(ConfigError::EnvReadError {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };

        let escaped = escape_substitutions(&contents);
        dotenvy::from_read_iter(Cursor::new(escaped.into_bytes()))
            .map(|item| item.map_err(|e| self.map_error(e)))
            .collect()
    }

    fn map_error(&self, err: dotenvy::Error) -> ConfigError {
        match err {
            dotenvy::Error::Io(e) => ConfigError::EnvReadError {
                path: self.path.clone(),
                source: e,
            },
            dotenvy::Error::LineParse(_, error_index) => ConfigError::EnvParse {
                path: self.path.clone(),
                error_index,
            },
            other => ConfigError::EnvLoad {
                path: self.path.clone(),
                source: other,
            },
        }
    }
}

impl ConfigSource for EnvSource {
    fn load(&self) -> Result<Map, ConfigError> {
        let pairs = self.read_pairs()?;

        for key in &self.required {
            if !pairs.iter().any(|(k, _)| k == key) {
                return Err(ConfigError::MissingEnvVar(key.clone()));
            }
        }

        let snapshot = nest(pairs);
        debug!(path = %self.path.display(), keys = snapshot.len(), "loaded .env file");
        Ok(snapshot)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scan {
    Unquoted,
    Single,
    Double,
    Comment,
}

/// Escapes every `$` that dotenvy would treat as a substitution, i.e. those
/// outside single quotes and comments, so values come back verbatim.
fn escape_substitutions(contents: &str) -> String {
    let mut out = String::with_capacity(contents.len());
    let mut state = Scan::Unquoted;
    let mut escaped = false;
    // Start of line or after whitespace: where a `#` opens a comment.
    let mut comment_allowed = true;

    for ch in contents.chars() {
        match state {
            Scan::Comment => {
                if ch == '\n' {
                    state = Scan::Unquoted;
                    comment_allowed = true;
                }
                out.push(ch);
                continue;
            }
            Scan::Single => {
                if ch == '\'' {
                    state = Scan::Unquoted;
                }
                out.push(ch);
                continue;
            }
            Scan::Unquoted | Scan::Double => {}
        }

        if escaped {
            escaped = false;
            out.push(ch);
            comment_allowed = false;
            continue;
        }

        match ch {
            '\\' => escaped = true,
            '$' => out.push('\\'),
            '"' if state == Scan::Double => state = Scan::Unquoted,
            '"' => state = Scan::Double,
            '\'' if state == Scan::Unquoted => state = Scan::Single,
            '#' if state == Scan::Unquoted && comment_allowed => state = Scan::Comment,
            _ => {}
        }
        comment_allowed = state == Scan::Unquoted && ch.is_whitespace();
        out.push(ch);
    }

    out
}

/// Applies the lowercase and underscore-nesting filters in file order.
fn nest(pairs: Vec<(String, String)>) -> Map {
    let mut snapshot = Map::new();
    for (key, value) in pairs {
        let path = key.to_lowercase();
        insert_overwriting(&mut snapshot, &path, ConfigValue::String(value));
    }
    snapshot
}

/// Writes `value` at `path`, replacing any non-map found along the way.
fn insert_overwriting(map: &mut Map, path: &str, value: ConfigValue) {
    let segments: Vec<&str> = path.split(NESTING_SEPARATOR).collect();
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut current = map;
    for segment in parents {
        let slot = current
            .entry((*segment).to_string())
            .or_insert_with(|| ConfigValue::Map(Map::new()));
        if !matches!(slot, ConfigValue::Map(_)) {
            *slot = ConfigValue::Map(Map::new());
        }
        let ConfigValue::Map(next) = slot else {
            unreachable!("slot was just made a map");
        };
        current = next;
    }
    current.insert((*last).to_string(), value);
}
