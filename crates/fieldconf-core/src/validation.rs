//! Structural validation for processed override values
//!
//! Processors accept whatever they are given. This module layers optional
//! checks on top: threshold sentinel and ordering, link urls, mapping shape,
//! and the advisory number settings.
//!
//! Copyright (c) 2025 Fieldconf Team
//! Licensed under the Apache-2.0 license

use crate::error::Severity;
use crate::processors::{FieldConfigValue, NumberFieldConfigSettings, ProcessorSettings};
use crate::thresholds::{ThresholdsConfig, ThresholdsMode};
use crate::types::{DataLink, MappingType, ValueMapping};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the pipeline treats structural problems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// No checks; values pass through as processed
    #[default]
    Lenient,
    /// Checks run and issues are logged, the value is still returned
    Warn,
    /// Any error-severity issue rejects the value
    Strict,
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationMode::Lenient => write!(f, "lenient"),
            ValidationMode::Warn => write!(f, "warn"),
            ValidationMode::Strict => write!(f, "strict"),
        }
    }
}

/// A single problem found in a processed value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    pub severity: Severity,
}

impl ValidationIssue {
    fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            expected: None,
            actual: None,
            severity: Severity::Error,
        }
    }

    fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(path, message)
        }
    }

    fn expected(mut self, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.path, self.message)
    }
}

/// All issues found for one value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.first_error().is_some()
    }

    pub fn first_error(&self) -> Option<&ValidationIssue> {
        self.errors().next()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }
}

/// Check a processed value against the structure its kind declares
pub fn validate_value(value: &FieldConfigValue, settings: &ProcessorSettings) -> ValidationReport {
    let issues = match (value, settings) {
        (FieldConfigValue::Undefined, _) => Vec::new(),
        (FieldConfigValue::Thresholds(cfg), _) => validate_thresholds(cfg),
        (FieldConfigValue::Links(links), _) => validate_links(links),
        (FieldConfigValue::Mappings(mappings), _) => validate_mappings(mappings),
        (FieldConfigValue::Number(n), ProcessorSettings::Number(number)) => validate_number(*n, number),
        (
            FieldConfigValue::Raw(raw),
            ProcessorSettings::Thresholds(_)
            | ProcessorSettings::DataLinks(_)
            | ProcessorSettings::ValueMappings(_),
        ) => vec![ValidationIssue::error(
            "$",
            format!("value does not have the structure of {}", settings.kind()),
        )
        .expected(settings.kind().to_string(), json_type(raw))],
        (FieldConfigValue::Raw(raw), ProcessorSettings::Boolean(_)) if !raw.is_null() => {
            vec![ValidationIssue::warning("$", "value is not a boolean")
                .expected("boolean", json_type(raw))]
        }
        _ => Vec::new(),
    };

    ValidationReport { issues }
}

/// Sentinel, ordering, and field-based mode checks
pub fn validate_thresholds(cfg: &ThresholdsConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    match cfg.steps.first() {
        None => issues.push(ValidationIssue::error("steps", "thresholds need at least the base step")),
        Some(first) if !first.is_base() => issues.push(
            ValidationIssue::error("steps[0].value", "first step must be the -Infinity base step")
                .expected("-Infinity", first.value.to_string()),
        ),
        Some(_) => {}
    }

    for (i, step) in cfg.steps.iter().enumerate() {
        if step.value.is_nan() {
            issues.push(ValidationIssue::error(
                format!("steps[{}].value", i),
                "step value is not a number",
            ));
        }
        if step.color.trim().is_empty() {
            issues.push(ValidationIssue::error(
                format!("steps[{}].color", i),
                "step color cannot be empty",
            ));
        }
    }

    for (i, pair) in cfg.steps.windows(2).enumerate() {
        if pair[1].value < pair[0].value {
            issues.push(
                ValidationIssue::error(
                    format!("steps[{}].value", i + 1),
                    "steps must be sorted ascending by value",
                )
                .expected(format!(">= {}", pair[0].value), pair[1].value.to_string()),
            );
        }
    }

    if cfg.mode == ThresholdsMode::FieldBased
        && cfg.field_name.as_deref().map_or(true, |n| n.trim().is_empty())
    {
        issues.push(ValidationIssue::error(
            "fieldName",
            "field_based thresholds need a field name",
        ));
    }

    if cfg.mode == ThresholdsMode::Percentage {
        for (i, step) in cfg.steps.iter().enumerate().skip(1) {
            if step.value.is_finite() && !(0.0..=1.0).contains(&step.value) {
                issues.push(
                    ValidationIssue::warning(
                        format!("steps[{}].value", i),
                        "percentage step outside 0..1",
                    )
                    .expected("0..1", step.value.to_string()),
                );
            }
        }
    }

    issues
}

pub fn validate_links(links: &[DataLink]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for (i, link) in links.iter().enumerate() {
        if link.url.trim().is_empty() {
            issues.push(ValidationIssue::error(format!("[{}].url", i), "link url cannot be empty"));
        }
        if link.title.trim().is_empty() {
            issues.push(ValidationIssue::warning(format!("[{}].title", i), "link has no title"));
        }
    }
    issues
}

pub fn validate_mappings(mappings: &[ValueMapping]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for (i, mapping) in mappings.iter().enumerate() {
        match mapping.mapping_type {
            MappingType::ValueToText if mapping.value.is_none() => {
                issues.push(ValidationIssue::error(
                    format!("[{}].value", i),
                    "value mapping needs a value",
                ));
            }
            MappingType::RangeToText if mapping.from.is_none() && mapping.to.is_none() => {
                issues.push(ValidationIssue::error(
                    format!("[{}]", i),
                    "range mapping needs from or to",
                ));
            }
            _ => {}
        }
    }
    issues
}

/// Number settings are advisory, so these never rise above warnings
pub fn validate_number(n: f64, settings: &NumberFieldConfigSettings) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if n.is_nan() {
        issues.push(ValidationIssue::warning("$", "value is not a number"));
        return issues;
    }
    if settings.integer.unwrap_or(false) && n.fract() != 0.0 {
        issues.push(ValidationIssue::warning("$", "expected an integer").expected("integer", n.to_string()));
    }
    if let Some(min) = settings.min {
        if n < min {
            issues.push(ValidationIssue::warning("$", "below min").expected(format!(">= {}", min), n.to_string()));
        }
    }
    if let Some(max) = settings.max {
        if n > max {
            issues.push(ValidationIssue::warning("$", "above max").expected(format!("<= {}", max), n.to_string()));
        }
    }

    issues
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
