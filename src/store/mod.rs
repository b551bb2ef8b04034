//! Path-addressed configuration tree.
//!
//! A [`DotPathStore`] owns a nested [`ConfigValue`] tree whose root is always a
//! map. Values are addressed by joining keys with a separator (`.` by default),
//! so `"database.connections.primary.host"` walks four maps deep. Numeric
//! segments index into sequences when the node being walked is a sequence.
//!
//! Keys that contain the separator stay in the tree but cannot be addressed by
//! a path; they remain visible through [`DotPathStore::export`] and
//! [`DotPathStore::keys`].
//!
//! The store has no internal locking. Share it behind an `Arc` for readers and
//! wrap it in a lock of your own if it must be written while shared.

mod error;
mod value;

use serde::de::DeserializeOwned;

pub use error::StoreError;
pub use value::{ConfigValue, Map};

/// Separator used by [`DotPathStore::new`].
pub const DEFAULT_SEPARATOR: &str = ".";

/// A nested key-value tree with path-based get/set/has.
///
/// ## Example
///
/// ```
/// use dotstore::{ConfigValue, DotPathStore, Map};
///
/// let mut store = DotPathStore::new(Map::new());
/// store.set("database.host", "db1".into())?;
///
/// assert_eq!(store.get("database.host"), Some(&ConfigValue::from("db1")));
/// assert!(!store.has("database.port"));
/// # Ok::<(), dotstore::StoreError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DotPathStore {
    // Always `ConfigValue::Map`.
    root: ConfigValue,
    separator: String,
}

impl Default for DotPathStore {
    fn default() -> Self {
        Self::new(Map::new())
    }
}

impl DotPathStore {
    /// Creates a store over `root` using the default `.` separator.
    pub fn new(root: Map) -> Self {
        Self {
            root: ConfigValue::Map(root),
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }

    /// Creates a store over `root` with a custom path separator.
    ///
    /// Returns [`StoreError::InvalidSeparator`] if `separator` is empty.
    pub fn with_separator(root: Map, separator: &str) -> Result<Self, StoreError> {
        if separator.is_empty() {
            return Err(StoreError::InvalidSeparator);
        }
        Ok(Self {
            root: ConfigValue::Map(root),
            separator: separator.to_string(),
        })
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Read-only view of the whole tree.
    pub fn root(&self) -> &Map {
        match &self.root {
            ConfigValue::Map(map) => map,
            _ => unreachable!("store root is always a map"),
        }
    }

    fn root_mut(&mut self) -> &mut Map {
        match &mut self.root {
            ConfigValue::Map(map) => map,
            _ => unreachable!("store root is always a map"),
        }
    }

    /// Looks up the value at `path`.
    ///
    /// The empty path returns the root. Every segment must match exactly:
    /// map segments by key, sequence segments by zero-based index. Any
    /// mismatch, including an out-of-range index, yields `None`.
    pub fn get(&self, path: &str) -> Option<&ConfigValue> {
        if path.is_empty() {
            return Some(&self.root);
        }
        path.split(self.separator.as_str())
            .try_fold(&self.root, |node, segment| descend(node, segment))
    }

    /// Returns a clone of the value at `path`, or `default` if absent.
    pub fn get_or(&self, path: &str, default: ConfigValue) -> ConfigValue {
        self.get(path).cloned().unwrap_or(default)
    }

    pub fn has(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Deserializes the value at `path` into `T`.
    ///
    /// Returns `Ok(None)` when the path is absent. Values are not coerced:
    /// the string `"8080"` does not deserialize into an integer.
    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, StoreError> {
        let Some(value) = self.get(path) else {
            return Ok(None);
        };
        serde_json::to_value(value)
            .and_then(serde_json::from_value)
            .map(Some)
            .map_err(|source| StoreError::Deserialize {
                path: path.to_string(),
                source,
            })
    }

    /// Keys of the map at `path`, or `None` if the path is absent or not a map.
    pub fn keys(&self, path: &str) -> Option<Vec<&str>> {
        self.get(path)?
            .as_map()
            .map(|map| map.keys().map(String::as_str).collect())
    }

    /// Writes `value` at `path`, creating empty maps for missing segments.
    ///
    /// Whatever held the final segment is replaced, including whole subtrees.
    /// Intermediate segments must be maps or absent; sequences are never
    /// created or descended into. On error the store is left unchanged.
    pub fn set(&mut self, path: &str, value: ConfigValue) -> Result<(), StoreError> {
        if path.is_empty() {
            return Err(StoreError::InvalidPath);
        }

        let segments: Vec<&str> = path.split(self.separator.as_str()).collect();
        let Some((last, parents)) = segments.split_last() else {
            return Err(StoreError::InvalidPath);
        };

        // Conflicts can only occur on existing nodes, which are all visited
        // before the first map is created, so a failed call mutates nothing.
        let mut current = self.root_mut();
        for segment in parents {
            match current
                .entry((*segment).to_string())
                .or_insert_with(|| ConfigValue::Map(Map::new()))
            {
                ConfigValue::Map(map) => current = map,
                other => {
                    return Err(StoreError::PathConflict {
                        path: path.to_string(),
                        segment: (*segment).to_string(),
                        found: other.type_name(),
                    })
                }
            }
        }

        current.insert((*last).to_string(), value);
        Ok(())
    }

    /// Returns a deep copy of the whole tree.
    pub fn export(&self) -> Map {
        self.root().clone()
    }

    /// Consumes the store, returning its tree.
    pub fn into_inner(self) -> Map {
        match self.root {
            ConfigValue::Map(map) => map,
            _ => unreachable!("store root is always a map"),
        }
    }
}

fn descend<'a>(node: &'a ConfigValue, segment: &str) -> Option<&'a ConfigValue> {
    match node {
        ConfigValue::Map(map) => map.get(segment),
        ConfigValue::Sequence(seq) => parse_index(segment).and_then(|i| seq.get(i)),
        _ => None,
    }
}

/// Parses a sequence index. Only canonical decimal forms are accepted, so
/// `"01"` and `"+1"` are not indices.
fn parse_index(segment: &str) -> Option<usize> {
    let canonical = !segment.is_empty()
        && segment.bytes().all(|b| b.is_ascii_digit())
        && (segment == "0" || !segment.starts_with('0'));
    if canonical {
        segment.parse().ok()
    } else {
        None
    }
}
