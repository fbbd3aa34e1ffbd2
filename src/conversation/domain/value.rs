//! Tagged value union for settings, metadata and tool payloads.
//!
//! Plugins exchange loosely structured data with the host: user settings,
//! scratch data, result metadata and tool arguments. [`PluginValue`] keeps
//! that data closed over five variants so serialisation and validation are
//! total.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Key/value map attached to intercept results, tool results and messages.
pub type Metadata = BTreeMap<String, PluginValue>;

/// A dynamically typed value passed between plugins and the host.
///
/// Serialised untagged so the JSON form is the natural one:
///
/// ```json
/// { "region": "NZ", "max_results": 5, "auto_intervene": true }
/// ```
///
/// # Examples
///
/// ```
/// use aimate::conversation::domain::{PluginValue, PluginValueKind};
///
/// let value = PluginValue::from("NZ");
/// assert_eq!(value.as_str(), Some("NZ"));
/// assert_eq!(value.kind(), PluginValueKind::Text);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PluginValue {
    /// A boolean flag.
    Boolean(bool),
    /// A floating point number.
    Number(f64),
    /// UTF-8 text.
    Text(String),
    /// An ordered list of values.
    List(Vec<PluginValue>),
    /// A string-keyed map of values.
    Map(BTreeMap<String, PluginValue>),
}

/// The variant of a [`PluginValue`], used to type tool parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginValueKind {
    /// [`PluginValue::Boolean`].
    Boolean,
    /// [`PluginValue::Number`].
    Number,
    /// [`PluginValue::Text`].
    Text,
    /// [`PluginValue::List`].
    List,
    /// [`PluginValue::Map`].
    Map,
}

impl PluginValueKind {
    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Text => "text",
            Self::List => "list",
            Self::Map => "map",
        }
    }
}

impl fmt::Display for PluginValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised when converting external JSON into a [`PluginValue`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PluginValueError {
    /// JSON `null` has no counterpart.
    #[error("null is not a valid plugin value")]
    Null,
    /// The JSON number cannot be represented as `f64`.
    #[error("number {0} cannot be represented as a plugin value")]
    UnrepresentableNumber(String),
}

impl PluginValue {
    /// Returns the variant of this value.
    #[must_use]
    pub const fn kind(&self) -> PluginValueKind {
        match self {
            Self::Boolean(_) => PluginValueKind::Boolean,
            Self::Number(_) => PluginValueKind::Number,
            Self::Text(_) => PluginValueKind::Text,
            Self::List(_) => PluginValueKind::List,
            Self::Map(_) => PluginValueKind::Map,
        }
    }

    /// Builds a list of text values.
    #[must_use]
    pub fn text_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(items.into_iter().map(|item| Self::Text(item.into())).collect())
    }

    /// Returns the text content when this is a [`PluginValue::Text`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the flag when this is a [`PluginValue::Boolean`].
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Returns the number when this is a [`PluginValue::Number`].
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            _ => None,
        }
    }

    /// Returns the items when this is a [`PluginValue::List`].
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries when this is a [`PluginValue::Map`].
    #[must_use]
    pub const fn as_map(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Converts the value into JSON.
    ///
    /// Non-finite numbers have no JSON form and become `null`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Boolean(flag) => serde_json::Value::Bool(*flag),
            Self::Number(number) => serde_json::Number::from_f64(*number)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Self::Text(text) => serde_json::Value::String(text.clone()),
            Self::List(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Map(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

impl TryFrom<serde_json::Value> for PluginValue {
    type Error = PluginValueError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Null => Err(PluginValueError::Null),
            serde_json::Value::Bool(flag) => Ok(Self::Boolean(flag)),
            serde_json::Value::Number(number) => number
                .as_f64()
                .map(Self::Number)
                .ok_or_else(|| PluginValueError::UnrepresentableNumber(number.to_string())),
            serde_json::Value::String(text) => Ok(Self::Text(text)),
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(Self::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::List),
            serde_json::Value::Object(entries) => entries
                .into_iter()
                .map(|(key, item)| Self::try_from(item).map(|converted| (key, converted)))
                .collect::<Result<BTreeMap<_, _>, _>>()
                .map(Self::Map),
        }
    }
}

impl From<&str> for PluginValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for PluginValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for PluginValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<f64> for PluginValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for PluginValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for PluginValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<Vec<Self>> for PluginValue {
    fn from(value: Vec<Self>) -> Self {
        Self::List(value)
    }
}

impl From<BTreeMap<String, Self>> for PluginValue {
    fn from(value: BTreeMap<String, Self>) -> Self {
        Self::Map(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn converts_nested_json() {
        let value = PluginValue::try_from(json!({
            "query": "rust news",
            "num_results": 3,
            "tags": ["a", true]
        }))
        .expect("json without nulls should convert");

        let map = value.as_map().expect("object should become a map");
        assert_eq!(map.get("query").and_then(PluginValue::as_str), Some("rust news"));
        assert_eq!(map.get("num_results").and_then(PluginValue::as_f64), Some(3.0));
        assert_eq!(
            map.get("tags").and_then(PluginValue::as_list).map(<[PluginValue]>::len),
            Some(2)
        );
    }

    #[rstest]
    fn rejects_null_anywhere() {
        let result = PluginValue::try_from(json!({"nested": [1, null]}));
        assert_eq!(result, Err(PluginValueError::Null));
    }

    #[rstest]
    fn deserialises_untagged_json() {
        let value: PluginValue =
            serde_json::from_str(r#"{"auto_intervene": false, "region": "AU"}"#)
                .expect("valid json");
        let map = value.as_map().expect("map");
        assert_eq!(
            map.get("auto_intervene").and_then(PluginValue::as_bool),
            Some(false)
        );
        assert_eq!(map.get("region").map(PluginValue::kind), Some(PluginValueKind::Text));
    }

    #[rstest]
    fn to_json_maps_non_finite_numbers_to_null() {
        assert_eq!(PluginValue::Number(f64::NAN).to_json(), serde_json::Value::Null);
        assert_eq!(PluginValue::from(2).to_json(), json!(2.0));
    }
}
