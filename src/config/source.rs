use crate::store::Map;

use super::ConfigError;

/// Anything that produces a top-level configuration mapping.
pub trait ConfigSource: Send + Sync + std::fmt::Debug {
    fn load(&self) -> Result<Map, ConfigError>;
}

/// Merges `overlay` into `base` one level deep.
///
/// A top-level key in `overlay` replaces the same key in `base` entirely;
/// nested maps are not combined.
pub fn merge_shallow(base: &mut Map, overlay: Map) {
    for (key, value) in overlay {
        base.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ConfigValue;

    fn map(entries: &[(&str, ConfigValue)]) -> Map {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_merge_replaces_nested_maps() {
        let mut base = map(&[("a", map(&[("x", 1.into())]).into())]);
        let overlay = map(&[("a", map(&[("y", 2.into())]).into())]);

        merge_shallow(&mut base, overlay);

        assert_eq!(base, map(&[("a", map(&[("y", 2.into())]).into())]));
    }

    #[test]
    fn test_merge_keeps_unrelated_keys() {
        let mut base = map(&[("name", "svc".into()), ("env", "file".into())]);
        let overlay = map(&[("env", Map::new().into())]);

        merge_shallow(&mut base, overlay);

        assert_eq!(base["name"], ConfigValue::from("svc"));
        assert_eq!(base["env"], ConfigValue::Map(Map::new()));
    }
}
