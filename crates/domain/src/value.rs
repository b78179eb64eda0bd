//! Untyped configuration values
//!
//! Resource sources, task params and other pipeline fragments arrive here
//! already decoded. The tree is closed: every consumer matches exhaustively on
//! [`ConfigValue`] instead of inspecting types at runtime.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// String-keyed mapping that keeps insertion order.
pub type ConfigMap = IndexMap<String, ConfigValue>;

/// A structured configuration value.
///
/// Serializes as plain untagged data, so any self-describing format
/// (JSON, YAML) round-trips through it.
///
/// # Example
///
/// ```
/// use keel_domain::ConfigValue;
///
/// let value: ConfigValue = serde_json::from_str(r#"{"uri": "((repo_uri))", "depth": 1}"#).unwrap();
/// assert_eq!(value.get("depth"), Some(&ConfigValue::from(1_i64)));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Explicit null / missing value.
    #[default]
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Numeric scalar, keeping the integer/float distinction.
    Number(Number),
    /// String scalar. The only variant that can hold a placeholder.
    String(String),
    /// Ordered sequence.
    Sequence(Vec<ConfigValue>),
    /// String-keyed mapping.
    Mapping(ConfigMap),
}

impl ConfigValue {
    /// Returns a short name for the variant, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }

    /// Returns true for `Null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the string slice if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the mapping if this is a mapping.
    #[must_use]
    pub const fn as_mapping(&self) -> Option<&ConfigMap> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the elements if this is a sequence.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Self]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Looks up a key when this is a mapping.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Collects every string leaf, depth-first, into `out`.
    pub fn collect_strings<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::String(s) => out.push(s),
            Self::Sequence(items) => items.iter().for_each(|item| item.collect_strings(out)),
            Self::Mapping(map) => map.values().for_each(|item| item.collect_strings(out)),
            Self::Null | Self::Bool(_) | Self::Number(_) => {}
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for ConfigValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for ConfigValue {
    /// Non-finite floats have no configuration representation and become `Null`.
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(Self::Null, Self::Number)
    }
}

impl From<Vec<Self>> for ConfigValue {
    fn from(value: Vec<Self>) -> Self {
        Self::Sequence(value)
    }
}

impl From<ConfigMap> for ConfigValue {
    fn from(value: ConfigMap) -> Self {
        Self::Mapping(value)
    }
}

impl FromIterator<(String, Self)> for ConfigValue {
    fn from_iter<I: IntoIterator<Item = (String, Self)>>(iter: I) -> Self {
        Self::Mapping(iter.into_iter().collect())
    }
}

impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => map.into_iter().map(|(k, v)| (k, Self::from(v))).collect(),
        }
    }
}

impl From<ConfigValue> for serde_json::Value {
    fn from(value: ConfigValue) -> Self {
        match value {
            ConfigValue::Null => Self::Null,
            ConfigValue::Bool(b) => Self::Bool(b),
            ConfigValue::Number(n) => Self::Number(n),
            ConfigValue::String(s) => Self::String(s),
            ConfigValue::Sequence(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            ConfigValue::Mapping(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}
