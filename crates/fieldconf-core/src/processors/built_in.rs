//! Built-in override processors
//!
//! One function per field config kind. Every processor is a pure function of
//! its inputs and never fails: malformed input yields NaN or the original
//! value unchanged.
//!
//! Copyright (c) 2025 Fieldconf Team
//! Licensed under the Apache-2.0 license

use super::types::{
    BooleanFieldConfigSettings, DataLinksFieldConfigSettings, FieldConfigValue,
    IdentityFieldConfigSettings, NumberFieldConfigSettings, SelectFieldConfigSettings,
    StringFieldConfigSettings, ThresholdsFieldConfigSettings, UnitFieldConfigSettings,
    ValueMappingFieldConfigSettings,
};
use crate::context::OverrideContext;
use crate::template::{resolve_field_tokens, to_display_string};
use crate::thresholds::ThresholdsConfig;
use crate::types::{DataLink, ValueMapping};
use crate::variables::VariableReplacer;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::OnceLock;

static FLOAT_PREFIX_REGEX: OnceLock<Regex> = OnceLock::new();

fn float_prefix_regex() -> &'static Regex {
    FLOAT_PREFIX_REGEX.get_or_init(|| {
        Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
            .expect("float prefix pattern is valid")
    })
}

/// Parse the longest numeric prefix of `input`, NaN when there is none
///
/// Leading whitespace is skipped and trailing garbage ignored, so `"3.5px"`
/// parses as 3.5.
pub fn parse_float(input: &str) -> f64 {
    let trimmed = input.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    let Some(prefix) = float_prefix_regex().find(trimmed) else {
        return f64::NAN;
    };

    let literal = prefix.as_str();
    match literal.trim_start_matches(['+', '-']) {
        "Infinity" if literal.starts_with('-') => f64::NEG_INFINITY,
        "Infinity" => f64::INFINITY,
        _ => literal.parse::<f64>().unwrap_or(f64::NAN),
    }
}

fn pass_through(value: Option<&Value>) -> FieldConfigValue {
    match value {
        None => FieldConfigValue::Undefined,
        Some(v) => FieldConfigValue::Raw(v.clone()),
    }
}

fn decode_or_raw<T, F>(value: Option<&Value>, wrap: F) -> FieldConfigValue
where
    T: DeserializeOwned,
    F: FnOnce(T) -> FieldConfigValue,
{
    match value {
        None => FieldConfigValue::Undefined,
        Some(v) => match T::deserialize(v) {
            Ok(decoded) => wrap(decoded),
            Err(_) => FieldConfigValue::Raw(v.clone()),
        },
    }
}

/// Returns the value unchanged
pub fn identity_override_processor(
    value: Option<&Value>,
    _context: &OverrideContext,
    _settings: &IdentityFieldConfigSettings,
) -> FieldConfigValue {
    pass_through(value)
}

/// Numeric parse; absent and null stay undefined, unparsable input is NaN
pub fn number_override_processor(
    value: Option<&Value>,
    _context: &OverrideContext,
    _settings: &NumberFieldConfigSettings,
) -> FieldConfigValue {
    match value {
        None | Some(Value::Null) => FieldConfigValue::Undefined,
        Some(Value::Number(n)) => FieldConfigValue::Number(n.as_f64().unwrap_or(f64::NAN)),
        Some(other) => FieldConfigValue::Number(parse_float(&to_display_string(other))),
    }
}

/// Resolves field tokens, then optionally hands off to the variable replacer
pub fn string_override_processor(
    value: Option<&Value>,
    context: &OverrideContext,
    settings: &StringFieldConfigSettings,
    replacer: Option<&dyn VariableReplacer>,
) -> FieldConfigValue {
    let raw = match value {
        None => return FieldConfigValue::Undefined,
        Some(Value::Null) => return FieldConfigValue::Null,
        Some(v) => to_display_string(v),
    };

    let resolved = resolve_field_tokens(&raw, context);

    match replacer {
        Some(replacer) if settings.expands_template_vars() => {
            FieldConfigValue::String(replacer.replace(&resolved, context.scoped_vars()))
        }
        _ => FieldConfigValue::String(resolved),
    }
}

/// Returns the value unchanged; the option loader belongs to the editing UI
pub fn select_override_processor(
    value: Option<&Value>,
    _context: &OverrideContext,
    _settings: &SelectFieldConfigSettings,
) -> FieldConfigValue {
    pass_through(value)
}

/// Reads the value as a list of data links, without checking them
pub fn data_links_override_processor(
    value: Option<&Value>,
    _context: &OverrideContext,
    _settings: &DataLinksFieldConfigSettings,
) -> FieldConfigValue {
    decode_or_raw::<Vec<DataLink>, _>(value, FieldConfigValue::Links)
}

/// Reads the value as a list of value mappings, without checking them
pub fn value_mappings_override_processor(
    value: Option<&Value>,
    _context: &OverrideContext,
    _settings: &ValueMappingFieldConfigSettings,
) -> FieldConfigValue {
    decode_or_raw::<Vec<ValueMapping>, _>(value, FieldConfigValue::Mappings)
}

/// Reads the value as a thresholds config; step order is not checked here
pub fn thresholds_override_processor(
    value: Option<&Value>,
    _context: &OverrideContext,
    _settings: &ThresholdsFieldConfigSettings,
) -> FieldConfigValue {
    decode_or_raw::<ThresholdsConfig, _>(value, FieldConfigValue::Thresholds)
}

/// Opaque pass-through
pub fn unit_override_processor(
    value: Option<&Value>,
    _context: &OverrideContext,
    _settings: &UnitFieldConfigSettings,
) -> FieldConfigValue {
    pass_through(value)
}

pub fn boolean_override_processor(
    value: Option<&Value>,
    _context: &OverrideContext,
    _settings: &BooleanFieldConfigSettings,
) -> FieldConfigValue {
    match value {
        Some(Value::Bool(b)) => FieldConfigValue::Boolean(*b),
        other => pass_through(other),
    }
}
