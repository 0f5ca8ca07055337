//! Core data types: data frames, fields, links, mappings
//!
//! These mirror the payloads a dashboard host hands to the override
//! processors. Wire names are camelCase to match the host API. Links and
//! mappings keep keys this crate does not model in `extra`.

use crate::template::format_number;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Label set attached to a field
pub type Labels = BTreeMap<String, String>;

/// Scoped template variables, keyed by variable name
pub type ScopedVars = HashMap<String, ScopedVar>;

/// A single scoped template variable
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScopedVar {
    /// Display text, used when the variable is expanded into a string
    #[serde(default)]
    pub text: String,
    /// Underlying value
    #[serde(default)]
    pub value: Value,
}

impl ScopedVar {
    pub fn new(text: impl Into<String>, value: Value) -> Self {
        Self {
            text: text.into(),
            value,
        }
    }
}

/// Mutable per-field state owned by the host
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldState {
    #[serde(default)]
    pub scoped_vars: ScopedVars,
}

/// A named column of values
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Field {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Labels>,

    /// Ordered, indexable values
    #[serde(default)]
    pub values: Vec<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<FieldState>,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels
            .get_or_insert_with(Labels::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_values<I>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        self.values = values.into_iter().collect();
        self
    }

    pub fn with_scoped_var(mut self, name: impl Into<String>, var: ScopedVar) -> Self {
        self.state
            .get_or_insert_with(FieldState::default)
            .scoped_vars
            .insert(name.into(), var);
        self
    }

    /// Label value, if present
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels.as_ref()?.get(name).map(String::as_str)
    }

    /// Scoped variables from the field state, if any
    pub fn scoped_vars(&self) -> Option<&ScopedVars> {
        self.state.as_ref().map(|s| &s.scoped_vars)
    }
}

/// One data series
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataFrame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub fields: Vec<Field>,
}

impl DataFrame {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { name: None, fields }
    }

    /// First field with the given name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A link attached to a field
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataLink {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_blank: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Kind of value mapping; carried as an integer on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MappingType {
    ValueToText,
    RangeToText,
}

impl TryFrom<u8> for MappingType {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(MappingType::ValueToText),
            2 => Ok(MappingType::RangeToText),
            other => Err(format!("unknown mapping type: {}", other)),
        }
    }
}

impl From<MappingType> for u8 {
    fn from(value: MappingType) -> Self {
        match value {
            MappingType::ValueToText => 1,
            MappingType::RangeToText => 2,
        }
    }
}

/// Maps a value or range of values to display text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueMapping {
    pub id: i64,
    #[serde(default)]
    pub operator: String,
    pub text: String,
    #[serde(rename = "type")]
    pub mapping_type: MappingType,
    #[serde(
        default,
        deserialize_with = "deserialize_match_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_match_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub from: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_match_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub to: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Mapping match values arrive as strings or numbers; numbers become text
fn deserialize_match_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct MatchTextVisitor;

    impl<'de> Visitor<'de> for MatchTextVisitor {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string, a number or null")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(format_number(v)))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2: Deserializer<'de>>(self, deserializer: D2) -> Result<Self::Value, D2::Error> {
            deserializer.deserialize_any(self)
        }
    }

    deserializer.deserialize_any(MatchTextVisitor)
}

/// An option offered by a select editor
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectableValue {
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SelectableValue {
    pub fn new(value: Value, label: impl Into<String>) -> Self {
        Self {
            value,
            label: Some(label.into()),
            description: None,
        }
    }
}
