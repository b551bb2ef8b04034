//! File-based configuration source.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::source::ConfigSource;
use super::ConfigError;
use crate::store::{ConfigValue, Map};

/// Structured formats a config file may be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Toml,
    Json,
}

impl FileFormat {
    /// Picks the format from the file extension. Anything other than `.json`
    /// is read as TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => FileFormat::Json,
            _ => FileFormat::Toml,
        }
    }
}

/// A configuration source that loads a TOML or JSON file.
///
/// The file must exist and its top level must be a mapping.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    format: FileFormat,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let format = FileFormat::from_path(&path);
        Self { path, format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for FileSource {
    fn load(&self) -> Result<Map, ConfigError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::ConfigFileNotFound(self.path.clone()));
            }
            Err(e) => {
                return Err(ConfigError::ReadError {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };

        let map = parse(&self.path, self.format, &contents)?;
        debug!(path = %self.path.display(), keys = map.len(), "loaded config file");
        Ok(map)
    }
}

fn parse(path: &Path, format: FileFormat, contents: &str) -> Result<Map, ConfigError> {
    let parse_error = |message: String| ConfigError::ParseError {
        path: path.to_path_buf(),
        message,
    };

    let value = match format {
        FileFormat::Toml => toml::from_str::<toml::Table>(contents)
            .map(|table| ConfigValue::from(toml::Value::Table(table)))
            .map_err(|e| parse_error(e.to_string()))?,
        FileFormat::Json => serde_json::from_str::<serde_json::Value>(contents)
            .map(ConfigValue::from)
            .map_err(|e| parse_error(e.to_string()))?,
    };

    match value {
        ConfigValue::Map(map) => Ok(map),
        _ => Err(ConfigError::ConfigFileInvalid(path.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn temp_file(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(FileFormat::from_path(Path::new("a.json")), FileFormat::Json);
        assert_eq!(FileFormat::from_path(Path::new("a.JSON")), FileFormat::Json);
        assert_eq!(FileFormat::from_path(Path::new("a.toml")), FileFormat::Toml);
        assert_eq!(FileFormat::from_path(Path::new("config")), FileFormat::Toml);
    }

    #[test]
    fn test_file_source_loads_toml() {
        let file = temp_file(".toml", "name = \"svc\"\n[database]\nhost = \"db1\"\n");

        let map = FileSource::new(file.path()).load().unwrap();

        assert_eq!(map["name"], ConfigValue::from("svc"));
        assert_eq!(
            map["database"].as_map().unwrap()["host"],
            ConfigValue::from("db1")
        );
    }

    #[test]
    fn test_file_source_loads_json() {
        let file = temp_file(".json", r#"{"name": "svc", "debug": null}"#);

        let map = FileSource::new(file.path()).load().unwrap();

        assert_eq!(map["name"], ConfigValue::from("svc"));
        assert!(map["debug"].is_null());
    }

    #[test]
    fn test_file_source_missing() {
        let result = FileSource::new("/nonexistent/path/config.toml").load();
        assert!(matches!(result, Err(ConfigError::ConfigFileNotFound(_))));
    }

    #[test]
    fn test_json_array_is_invalid() {
        let file = temp_file(".json", "[1, 2, 3]");

        let result = FileSource::new(file.path()).load();
        assert!(matches!(result, Err(ConfigError::ConfigFileInvalid(_))));
    }

    #[test]
    fn test_json_scalar_is_invalid() {
        let file = temp_file(".json", "\"just a string\"");

        let result = FileSource::new(file.path()).load();
        assert!(matches!(result, Err(ConfigError::ConfigFileInvalid(_))));
    }

    #[test]
    fn test_toml_syntax_error() {
        let file = temp_file(".toml", "name = ");

        let result = FileSource::new(file.path()).load();
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }
}
