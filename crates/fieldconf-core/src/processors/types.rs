//! Core types for the override processor registry
//!
//! This module defines the closed set of field config kinds, the typed
//! settings record for each kind, the tagged output value, and the untyped
//! request shape converted once at the boundary.
//!
//! Copyright (c) 2025 Fieldconf Team
//! Licensed under the Apache-2.0 license

use crate::context::OverrideContext;
use crate::error::{Error, Result};
use crate::thresholds::ThresholdsConfig;
use crate::types::{DataLink, SelectableValue, ValueMapping};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Field configuration property kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldConfigKind {
    Identity,
    Number,
    String,
    Select,
    DataLinks,
    ValueMappings,
    Thresholds,
    Unit,
    Boolean,
    /// Settings only; consumed by a color picker, never by a value transform
    Color,
}

impl FieldConfigKind {
    pub const ALL: [FieldConfigKind; 10] = [
        FieldConfigKind::Identity,
        FieldConfigKind::Number,
        FieldConfigKind::String,
        FieldConfigKind::Select,
        FieldConfigKind::DataLinks,
        FieldConfigKind::ValueMappings,
        FieldConfigKind::Thresholds,
        FieldConfigKind::Unit,
        FieldConfigKind::Boolean,
        FieldConfigKind::Color,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldConfigKind::Identity => "identity",
            FieldConfigKind::Number => "number",
            FieldConfigKind::String => "string",
            FieldConfigKind::Select => "select",
            FieldConfigKind::DataLinks => "dataLinks",
            FieldConfigKind::ValueMappings => "valueMappings",
            FieldConfigKind::Thresholds => "thresholds",
            FieldConfigKind::Unit => "unit",
            FieldConfigKind::Boolean => "boolean",
            FieldConfigKind::Color => "color",
        }
    }

    /// Whether a value transform exists for this kind
    pub fn has_processor(&self) -> bool {
        !matches!(self, FieldConfigKind::Color)
    }
}

impl fmt::Display for FieldConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldConfigKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FieldConfigKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownKind { kind: s.to_string() })
    }
}

/// Settings for the identity processor
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IdentityFieldConfigSettings {}

/// Number editor settings; advisory only, never enforced by the processor
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NumberFieldConfigSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

/// String editor settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StringFieldConfigSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Hand the resolved string to the host variable replacer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expand_template_vars: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_textarea: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
}

impl StringFieldConfigSettings {
    pub fn expands_template_vars(&self) -> bool {
        self.expand_template_vars.unwrap_or(false)
    }
}

/// Loads select options from the context, for the editing UI
#[async_trait]
pub trait OptionsLoader: Send + Sync {
    async fn load_options(&self, context: &OverrideContext) -> Result<Vec<SelectableValue>>;
}

impl fmt::Debug for dyn OptionsLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OptionsLoader")
    }
}

/// Select editor settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectFieldConfigSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_custom_value: Option<bool>,

    /// The default options
    pub options: Vec<SelectableValue>,

    /// Optionally use the context to define the options
    #[serde(skip)]
    pub get_options: Option<Arc<dyn OptionsLoader>>,
}

impl SelectFieldConfigSettings {
    pub fn with_options(options: Vec<SelectableValue>) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn with_loader(mut self, loader: Arc<dyn OptionsLoader>) -> Self {
        self.get_options = Some(loader);
        self
    }

    /// Options to offer for `context`: the loader's answer, or the static list
    ///
    /// Every call starts a fresh load; callers that re-invoke for a changed
    /// context discard stale answers themselves.
    pub async fn options_for(&self, context: &OverrideContext) -> Result<Vec<SelectableValue>> {
        match &self.get_options {
            Some(loader) => loader.load_options(context).await,
            None => Ok(self.options.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataLinksFieldConfigSettings {}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValueMappingFieldConfigSettings {}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ThresholdsFieldConfigSettings {}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UnitFieldConfigSettings {}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BooleanFieldConfigSettings {}

/// Color picker settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColorFieldConfigSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_undefined: Option<bool>,
    /// Shown in place of a color, e.g. "Pick Color"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_when_undefined: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_named_colors: Option<bool>,
}

/// Typed settings, one variant per kind
#[derive(Debug, Clone)]
pub enum ProcessorSettings {
    Identity(IdentityFieldConfigSettings),
    Number(NumberFieldConfigSettings),
    String(StringFieldConfigSettings),
    Select(SelectFieldConfigSettings),
    DataLinks(DataLinksFieldConfigSettings),
    ValueMappings(ValueMappingFieldConfigSettings),
    Thresholds(ThresholdsFieldConfigSettings),
    Unit(UnitFieldConfigSettings),
    Boolean(BooleanFieldConfigSettings),
    Color(ColorFieldConfigSettings),
}

impl ProcessorSettings {
    pub fn kind(&self) -> FieldConfigKind {
        match self {
            ProcessorSettings::Identity(_) => FieldConfigKind::Identity,
            ProcessorSettings::Number(_) => FieldConfigKind::Number,
            ProcessorSettings::String(_) => FieldConfigKind::String,
            ProcessorSettings::Select(_) => FieldConfigKind::Select,
            ProcessorSettings::DataLinks(_) => FieldConfigKind::DataLinks,
            ProcessorSettings::ValueMappings(_) => FieldConfigKind::ValueMappings,
            ProcessorSettings::Thresholds(_) => FieldConfigKind::Thresholds,
            ProcessorSettings::Unit(_) => FieldConfigKind::Unit,
            ProcessorSettings::Boolean(_) => FieldConfigKind::Boolean,
            ProcessorSettings::Color(_) => FieldConfigKind::Color,
        }
    }

    /// Default settings for a kind
    pub fn default_for(kind: FieldConfigKind) -> Self {
        match kind {
            FieldConfigKind::Identity => ProcessorSettings::Identity(Default::default()),
            FieldConfigKind::Number => ProcessorSettings::Number(Default::default()),
            FieldConfigKind::String => ProcessorSettings::String(Default::default()),
            FieldConfigKind::Select => ProcessorSettings::Select(Default::default()),
            FieldConfigKind::DataLinks => ProcessorSettings::DataLinks(Default::default()),
            FieldConfigKind::ValueMappings => ProcessorSettings::ValueMappings(Default::default()),
            FieldConfigKind::Thresholds => ProcessorSettings::Thresholds(Default::default()),
            FieldConfigKind::Unit => ProcessorSettings::Unit(Default::default()),
            FieldConfigKind::Boolean => ProcessorSettings::Boolean(Default::default()),
            FieldConfigKind::Color => ProcessorSettings::Color(Default::default()),
        }
    }

    /// Decode untyped settings JSON for `kind`
    ///
    /// Missing or null settings yield the defaults; unknown keys are ignored.
    pub fn decode(kind: FieldConfigKind, settings: Option<&Value>) -> Result<Self> {
        let settings = match settings {
            None | Some(Value::Null) => return Ok(Self::default_for(kind)),
            Some(value) => value,
        };

        Ok(match kind {
            FieldConfigKind::Identity => ProcessorSettings::Identity(decode_settings(kind, settings)?),
            FieldConfigKind::Number => ProcessorSettings::Number(decode_settings(kind, settings)?),
            FieldConfigKind::String => ProcessorSettings::String(decode_settings(kind, settings)?),
            FieldConfigKind::Select => ProcessorSettings::Select(decode_settings(kind, settings)?),
            FieldConfigKind::DataLinks => ProcessorSettings::DataLinks(decode_settings(kind, settings)?),
            FieldConfigKind::ValueMappings => {
                ProcessorSettings::ValueMappings(decode_settings(kind, settings)?)
            }
            FieldConfigKind::Thresholds => ProcessorSettings::Thresholds(decode_settings(kind, settings)?),
            FieldConfigKind::Unit => ProcessorSettings::Unit(decode_settings(kind, settings)?),
            FieldConfigKind::Boolean => ProcessorSettings::Boolean(decode_settings(kind, settings)?),
            FieldConfigKind::Color => ProcessorSettings::Color(decode_settings(kind, settings)?),
        })
    }
}

fn decode_settings<T: DeserializeOwned>(kind: FieldConfigKind, settings: &Value) -> Result<T> {
    T::deserialize(settings).map_err(|source| Error::Settings {
        kind: kind.to_string(),
        message: source.to_string(),
        source,
    })
}

/// Canonical typed value produced by a processor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldConfigValue {
    /// No value was supplied
    Undefined,
    /// An explicit null, preserved by the string processor
    Null,
    /// Parsed number; NaN when the input was not numeric
    Number(f64),
    String(String),
    Boolean(bool),
    Links(Vec<DataLink>),
    Mappings(Vec<ValueMapping>),
    Thresholds(ThresholdsConfig),
    /// The original value, passed through unchanged
    Raw(Value),
}

impl FieldConfigValue {
    pub fn is_undefined(&self) -> bool {
        matches!(self, FieldConfigValue::Undefined)
    }

    /// Whether this is a number that failed to parse
    pub fn is_nan(&self) -> bool {
        matches!(self, FieldConfigValue::Number(n) if n.is_nan())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldConfigValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_thresholds(&self) -> Option<&ThresholdsConfig> {
        match self {
            FieldConfigValue::Thresholds(cfg) => Some(cfg),
            _ => None,
        }
    }

    /// Short name of the variant, for logs and reports
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldConfigValue::Undefined => "undefined",
            FieldConfigValue::Null => "null",
            FieldConfigValue::Number(_) => "number",
            FieldConfigValue::String(_) => "string",
            FieldConfigValue::Boolean(_) => "boolean",
            FieldConfigValue::Links(_) => "links",
            FieldConfigValue::Mappings(_) => "mappings",
            FieldConfigValue::Thresholds(_) => "thresholds",
            FieldConfigValue::Raw(_) => "raw",
        }
    }

    /// JSON form of the value; `None` for undefined
    ///
    /// Non-finite numbers have no JSON literal and become null.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            FieldConfigValue::Undefined => None,
            other => Some(serde_json::to_value(other).unwrap_or(Value::Null)),
        }
    }
}

/// An untyped override as received from an API or file
#[derive(Debug, Clone, Deserialize)]
pub struct OverrideRequest {
    pub kind: FieldConfigKind,

    /// Absent means undefined; an explicit null stays null
    #[serde(default, deserialize_with = "deserialize_present")]
    pub value: Option<Value>,

    #[serde(default)]
    pub settings: Option<Value>,

    #[serde(default)]
    pub context: OverrideContext,
}

impl OverrideRequest {
    pub fn new(kind: FieldConfigKind, value: Option<Value>) -> Self {
        Self {
            kind,
            value,
            settings: None,
            context: OverrideContext::default(),
        }
    }

    pub fn with_settings(mut self, settings: Value) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn with_context(mut self, context: OverrideContext) -> Self {
        self.context = context;
        self
    }

    /// Typed settings for the declared kind
    pub fn settings(&self) -> Result<ProcessorSettings> {
        ProcessorSettings::decode(self.kind, self.settings.as_ref())
    }
}

fn deserialize_present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
