//! Field template tokens
//!
//! Resolves `&&(name)` tokens in string override values. Each token is looked
//! up first in the current field's labels, then by scanning the data series
//! for a field with that name and taking its first value. Tokens that resolve
//! to nothing render as the literal `undefined`.
//!
//! ```
//! use fieldconf_core::{OverrideContext, Field};
//! use fieldconf_core::template::resolve_field_tokens;
//!
//! let field = Field::new("cpu").with_label("region", "us-east");
//! let ctx = OverrideContext::for_field(field);
//! assert_eq!(resolve_field_tokens("&&(region)", &ctx), "us-east");
//! ```

use crate::context::OverrideContext;
use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::OnceLock;

static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();

/// Rendering of a token that nothing resolved
pub const UNRESOLVED: &str = "undefined";

fn token_regex() -> &'static Regex {
    TOKEN_REGEX.get_or_init(|| {
        Regex::new(r"&&\(([A-Za-z0-9_]+)\)").expect("field token pattern is valid")
    })
}

/// Replace every `&&(name)` token in `value`
///
/// Single left-to-right pass; substituted text is never rescanned.
pub fn resolve_field_tokens(value: &str, context: &OverrideContext) -> String {
    token_regex()
        .replace_all(value, |caps: &Captures| {
            resolve_token(&caps[1], context).unwrap_or_else(|| UNRESOLVED.to_string())
        })
        .into_owned()
}

/// Whether `value` carries at least one field token
pub fn has_field_tokens(value: &str) -> bool {
    token_regex().is_match(value)
}

/// Resolve a single token name against the context
///
/// The first series holding a field with this name decides the outcome, even
/// when that field has no values.
pub fn resolve_token(name: &str, context: &OverrideContext) -> Option<String> {
    if let Some(label) = context.field.label(name) {
        if !label.is_empty() {
            return Some(label.to_string());
        }
    }

    context
        .find_field(name)
        .and_then(|field| field.values.first())
        .map(to_display_string)
}

/// Render a JSON value the way a string join in the host renders it
pub fn to_display_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if n.is_f64() {
                n.as_f64().map(format_number).unwrap_or_else(|| n.to_string())
            } else {
                n.to_string()
            }
        }
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => to_display_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Format a float the way the host's number-to-string conversion does
///
/// Shortest round-trip digits with no trailing `.0`. Magnitudes of `1e21` and
/// above or below `1e-6` use exponent notation with an explicit exponent sign.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        let formatted = format!("{:e}", n);
        match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        }
    } else {
        n.to_string()
    }
}
