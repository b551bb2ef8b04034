//! End-to-end loading: `.env` + config file → shared store → injection.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use dotstore::{AppContext, Config, ConfigAware, ConfigError, ConfigValue, DotPathStore, Map};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[derive(Default)]
struct Repository {
    config: Option<Arc<DotPathStore>>,
}

impl ConfigAware for Repository {
    fn set_config(&mut self, config: Arc<DotPathStore>) {
        self.config = Some(config);
    }
}

impl Repository {
    fn host(&self) -> Option<String> {
        self.config
            .as_ref()?
            .get("env.database.host")
            .and_then(ConfigValue::as_str)
            .map(str::to_string)
    }
}

#[test]
fn test_end_to_end_toml() {
    let dir = TempDir::new().unwrap();
    let env = write(&dir, ".env", "ENVIRONMENT=production\nDATABASE_HOST=db1\n");
    let config = write(&dir, "config.toml", "name = \"svc\"\n");

    let ctx = AppContext::builder()
        .with_config_builder(Config::builder().with_env_file(&env).with_file(&config))
        .unwrap()
        .build()
        .unwrap();

    let store = ctx.config();
    assert_eq!(store.get("name"), Some(&ConfigValue::from("svc")));
    assert_eq!(store.get("env.database.host"), Some(&ConfigValue::from("db1")));

    let repo: Repository = ctx.resolve();
    assert_eq!(repo.host().as_deref(), Some("db1"));
}

#[test]
fn test_end_to_end_json() {
    let dir = TempDir::new().unwrap();
    let env = write(&dir, ".env", "ENVIRONMENT=dev\n");
    let config = write(
        &dir,
        "config.json",
        r#"{"name": "svc", "servers": [{"host": "a"}, {"host": "b"}], "replica": null}"#,
    );

    let store = Config::builder()
        .with_env_file(&env)
        .with_file(&config)
        .build()
        .unwrap();

    assert_eq!(store.get("servers.1.host"), Some(&ConfigValue::from("b")));
    assert_eq!(store.get("servers.2.host"), None);
    assert_eq!(store.get("replica"), Some(&ConfigValue::Null));
    assert_eq!(store.get("env.environment"), Some(&ConfigValue::from("dev")));
}

#[test]
fn test_missing_config_file_fails_before_parsing() {
    let dir = TempDir::new().unwrap();
    let env = write(&dir, ".env", "ENVIRONMENT=dev\n");

    let result = Config::builder()
        .with_env_file(&env)
        .with_file(dir.path().join("missing.toml"))
        .build();

    assert!(matches!(result, Err(ConfigError::ConfigFileNotFound(ref p)) if p.ends_with("missing.toml")));
}

#[test]
fn test_invalid_top_level() {
    let dir = TempDir::new().unwrap();
    let env = write(&dir, ".env", "ENVIRONMENT=dev\n");
    let config = write(&dir, "config.json", "[1, 2]");

    let result = Config::builder()
        .with_env_file(&env)
        .with_file(&config)
        .build();

    assert!(matches!(result, Err(ConfigError::ConfigFileInvalid(_))));
}

#[test]
fn test_env_without_environment_key() {
    let dir = TempDir::new().unwrap();
    let env = write(&dir, ".env", "DATABASE_HOST=db1\n");
    let config = write(&dir, "config.toml", "name = \"svc\"\n");

    let result = Config::builder()
        .with_env_file(&env)
        .with_file(&config)
        .build();

    assert!(matches!(result, Err(ConfigError::MissingEnvVar(ref k)) if k == "ENVIRONMENT"));
}

#[test]
fn test_shallow_merge_of_env_key() {
    let dir = TempDir::new().unwrap();
    let env = write(&dir, ".env", "ENVIRONMENT=dev\n");
    let config = write(&dir, "config.toml", "[env]\nx = 1\n");

    let store = Config::builder()
        .with_env_file(&env)
        .with_file(&config)
        .build()
        .unwrap();

    let mut expected = Map::new();
    expected.insert("environment".into(), "dev".into());
    assert_eq!(store.get("env"), Some(&ConfigValue::Map(expected)));
}

#[test]
fn test_store_mutation_after_load() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "config.toml", "[database]\nhost = \"db1\"\n");

    let mut store = Config::builder().with_file(&config).build().unwrap();
    store.set("database.port", 5432.into()).unwrap();

    assert_eq!(store.get_as::<u16>("database.port").unwrap(), Some(5432));
    assert_eq!(store.keys("database"), Some(vec!["host", "port"]));
}
