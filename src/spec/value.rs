//! Plain data values as found in a parsed spec.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A parsed configuration value.
///
/// This is the format-independent tree a YAML or TOML document is read
/// into. Mapping keys are always strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// `null` / `~`
    #[default]
    Null,
    /// A boolean
    Bool(bool),
    /// An integer that fits in `i64`
    Int(i64),
    /// Any other number
    Float(f64),
    /// A string
    Str(String),
    /// A sequence
    Seq(Vec<Value>),
    /// A string-keyed mapping
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Short name of the value's kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "a boolean",
            Self::Int(_) => "an integer",
            Self::Float(_) => "a float",
            Self::Str(_) => "a string",
            Self::Seq(_) => "a sequence",
            Self::Map(_) => "a mapping",
        }
    }

    /// Whether this is `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The string, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The integer, if this is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The sequence, if this is one.
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Self::Seq(items) => Some(items),
            _ => None,
        }
    }

    /// The mapping, if this is one.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up `key` if this is a mapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Mutable access to `key` if this is a mapping.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        match self {
            Self::Map(map) => map.get_mut(key),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// Renders compact JSON, which is how values show up in logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Seq(items.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self::Map(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_scalars_and_containers() {
        let value: Value = serde_yaml::from_str(
            r#"
name: laser
port: 3
power: 0.5
enabled: true
missing: ~
wavelengths: [488, 561]
"#,
        )
        .unwrap();

        assert_eq!(value.get("name"), Some(&Value::from("laser")));
        assert_eq!(value.get("port"), Some(&Value::Int(3)));
        assert_eq!(value.get("power"), Some(&Value::Float(0.5)));
        assert_eq!(value.get("enabled"), Some(&Value::Bool(true)));
        assert_eq!(value.get("missing"), Some(&Value::Null));
        assert_eq!(value.get("wavelengths"), Some(&Value::from(vec![488, 561])));
    }

    #[test]
    fn test_toml_document() {
        let value: Value = toml::from_str(
            r#"
[devices.camera]
module = "lab"
class = "Camera"
"#,
        )
        .unwrap();

        let camera = value.get("devices").and_then(|d| d.get("camera")).unwrap();
        assert_eq!(camera.get("class").and_then(Value::as_str), Some("Camera"));
    }

    #[test]
    fn test_display_is_compact_json() {
        let value = Value::from(vec![Value::from("a"), Value::Int(1), Value::Null]);
        assert_eq!(value.to_string(), r#"["a",1,null]"#);
    }
}
