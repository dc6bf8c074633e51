//! Helm values as an untyped nested map with typed, non-failing lookups

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Helm chart values (`values.yaml` as JSON).
///
/// Keys are kept sorted so that serializing the same values twice always
/// yields the same bytes.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(transparent)]
pub struct HelmValues(pub Map<String, Value>);

impl HelmValues {
    /// Empty values
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk `path` through nested maps and return the raw value at the end.
    ///
    /// Returns `None` if any level is missing or is not a map.
    pub fn lookup(&self, path: &[&str]) -> Option<&Value> {
        let (last, parents) = path.split_last()?;
        let mut current = &self.0;
        for key in parents {
            current = current.get(*key)?.as_object()?;
        }
        current.get(*last)
    }

    /// Typed lookup of `path`.
    ///
    /// A missing level, a non-map intermediate, or a value of the wrong type
    /// all come back as `None`; callers treat that as "not there yet".
    pub fn get<T: DeserializeOwned>(&self, path: &[&str]) -> Option<T> {
        self.lookup(path)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Set `path` to `value`, creating intermediate maps as needed.
    ///
    /// Any non-map value found on the way is replaced by a map.
    pub fn set(&mut self, path: &[&str], value: impl Into<Value>) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };
        let mut current = &mut self.0;
        for key in parents {
            let entry = current
                .entry((*key).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            let Value::Object(map) = entry else {
                return;
            };
            current = map;
        }
        current.insert((*last).to_string(), value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PSP_ENABLED: &[&str] = &["global", "cattle", "psp", "enabled"];

    fn values(v: Value) -> HelmValues {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn get_reads_nested_bool() {
        let v = values(json!({"global": {"cattle": {"psp": {"enabled": true}}}}));
        assert_eq!(v.get::<bool>(PSP_ENABLED), Some(true));
    }

    #[test]
    fn get_is_none_for_missing_levels() {
        for v in [
            json!({}),
            json!({"global": {}}),
            json!({"global": {"cattle": {}}}),
            json!({"global": {"cattle": {"psp": {}}}}),
        ] {
            assert_eq!(values(v).get::<bool>(PSP_ENABLED), None);
        }
    }

    #[test]
    fn get_is_none_for_non_map_levels() {
        for v in [
            json!({"global": "oops"}),
            json!({"global": {"cattle": 3}}),
            json!({"global": {"cattle": {"psp": [true]}}}),
        ] {
            assert_eq!(values(v).get::<bool>(PSP_ENABLED), None);
        }
    }

    #[test]
    fn get_is_none_for_wrong_leaf_type() {
        let v = values(json!({"global": {"cattle": {"psp": {"enabled": "true"}}}}));
        assert_eq!(v.get::<bool>(PSP_ENABLED), None);
        assert_eq!(v.get::<String>(PSP_ENABLED).as_deref(), Some("true"));
    }

    #[test]
    fn empty_path_is_none() {
        let v = values(json!({"a": 1}));
        assert!(v.lookup(&[]).is_none());
    }

    #[test]
    fn set_creates_intermediate_maps() {
        let mut v = HelmValues::new();
        v.set(PSP_ENABLED, false);
        v.set(&["global", "cattle", "systemDefaultRegistry"], "registry.example.com");

        assert_eq!(
            serde_json::to_value(&v).unwrap(),
            json!({"global": {"cattle": {
                "psp": {"enabled": false},
                "systemDefaultRegistry": "registry.example.com"
            }}})
        );
    }

    #[test]
    fn set_overwrites_scalar_on_path() {
        let mut v = values(json!({"global": "scalar"}));
        v.set(&["global", "cattle"], 1);
        assert_eq!(v.get::<i64>(&["global", "cattle"]), Some(1));
    }
}
