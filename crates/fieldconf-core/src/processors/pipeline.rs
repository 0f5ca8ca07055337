//! Override pipeline: processor dispatch plus the optional validation stage
//!
//! Copyright (c) 2025 Fieldconf Team
//! Licensed under the Apache-2.0 license

use super::built_in;
use super::builder::OverridePipelineBuilder;
use super::types::{FieldConfigKind, FieldConfigValue, OverrideRequest, ProcessorSettings};
use crate::context::OverrideContext;
use crate::error::{Error, Result};
use crate::validation::{validate_value, ValidationMode, ValidationReport};
use crate::variables::VariableReplacer;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Result of running one override through the pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedOverride {
    pub kind: FieldConfigKind,
    pub value: FieldConfigValue,
    pub report: ValidationReport,
}

/// Converts raw override values into typed field config values
///
/// Dispatch is an exhaustive match over [`ProcessorSettings`], so every kind
/// is handled at compile time. The pipeline holds no mutable state and can be
/// shared across threads.
#[derive(Debug, Clone, Default)]
pub struct OverridePipeline {
    variable_replacer: Option<Arc<dyn VariableReplacer>>,
    validation_mode: ValidationMode,
}

impl OverridePipeline {
    /// Create a pipeline without a variable replacer and with validation off
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> OverridePipelineBuilder {
        OverridePipelineBuilder::new()
    }

    pub(super) fn from_parts(
        variable_replacer: Option<Arc<dyn VariableReplacer>>,
        validation_mode: ValidationMode,
    ) -> Self {
        Self {
            variable_replacer,
            validation_mode,
        }
    }

    pub fn validation_mode(&self) -> ValidationMode {
        self.validation_mode
    }

    pub fn has_variable_replacer(&self) -> bool {
        self.variable_replacer.is_some()
    }

    /// Run the processor for the settings' kind; never fails
    ///
    /// Color has no processor, so its value comes back unchanged.
    pub fn process(
        &self,
        value: Option<&Value>,
        context: &OverrideContext,
        settings: &ProcessorSettings,
    ) -> FieldConfigValue {
        tracing::trace!(kind = %settings.kind(), "processing override value");

        match settings {
            ProcessorSettings::Identity(s) => built_in::identity_override_processor(value, context, s),
            ProcessorSettings::Number(s) => built_in::number_override_processor(value, context, s),
            ProcessorSettings::String(s) => built_in::string_override_processor(
                value,
                context,
                s,
                self.variable_replacer.as_deref(),
            ),
            ProcessorSettings::Select(s) => built_in::select_override_processor(value, context, s),
            ProcessorSettings::DataLinks(s) => built_in::data_links_override_processor(value, context, s),
            ProcessorSettings::ValueMappings(s) => {
                built_in::value_mappings_override_processor(value, context, s)
            }
            ProcessorSettings::Thresholds(s) => built_in::thresholds_override_processor(value, context, s),
            ProcessorSettings::Unit(s) => built_in::unit_override_processor(value, context, s),
            ProcessorSettings::Boolean(s) => built_in::boolean_override_processor(value, context, s),
            ProcessorSettings::Color(_) => match value {
                None => FieldConfigValue::Undefined,
                Some(v) => FieldConfigValue::Raw(v.clone()),
            },
        }
    }

    /// Process, then validate according to the pipeline's mode
    pub fn apply(
        &self,
        value: Option<&Value>,
        context: &OverrideContext,
        settings: &ProcessorSettings,
    ) -> Result<ProcessedOverride> {
        let kind = settings.kind();
        let processed = self.process(value, context, settings);

        let report = match self.validation_mode {
            ValidationMode::Lenient => ValidationReport::default(),
            ValidationMode::Warn | ValidationMode::Strict => validate_value(&processed, settings),
        };

        if !report.is_clean() {
            tracing::debug!(
                kind = %kind,
                issues = report.issues.len(),
                mode = %self.validation_mode,
                "override value has structural issues"
            );
        }

        match self.validation_mode {
            ValidationMode::Strict => {
                if let Some(issue) = report.first_error() {
                    return Err(Error::Validation {
                        path: issue.path.clone(),
                        message: issue.message.clone(),
                    });
                }
            }
            ValidationMode::Warn => {
                for issue in &report.issues {
                    tracing::warn!(kind = %kind, "{}", issue);
                }
            }
            ValidationMode::Lenient => {}
        }

        Ok(ProcessedOverride {
            kind,
            value: processed,
            report,
        })
    }

    /// Decode an untyped request's settings and apply it
    pub fn apply_request(&self, request: &OverrideRequest) -> Result<ProcessedOverride> {
        let settings = request.settings()?;
        self.apply(request.value.as_ref(), &request.context, &settings)
    }
}
