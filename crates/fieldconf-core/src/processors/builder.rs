//! Builder for override pipelines
//!
//! Host capabilities are injected here, once, instead of riding on every
//! context as nullable fields.
//!
//! Copyright (c) 2025 Fieldconf Team
//! Licensed under the Apache-2.0 license

use super::pipeline::OverridePipeline;
use crate::validation::ValidationMode;
use crate::variables::VariableReplacer;
use std::sync::Arc;

/// Builder for creating override pipelines
#[derive(Default)]
pub struct OverridePipelineBuilder {
    variable_replacer: Option<Arc<dyn VariableReplacer>>,
    validation_mode: ValidationMode,
}

impl OverridePipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the host variable replacer used by `expandTemplateVars`
    pub fn variable_replacer(mut self, replacer: impl VariableReplacer + 'static) -> Self {
        self.variable_replacer = Some(Arc::new(replacer));
        self
    }

    /// Share an existing replacer
    pub fn shared_variable_replacer(mut self, replacer: Arc<dyn VariableReplacer>) -> Self {
        self.variable_replacer = Some(replacer);
        self
    }

    /// Set the validation mode
    pub fn validation_mode(mut self, mode: ValidationMode) -> Self {
        self.validation_mode = mode;
        self
    }

    /// Shorthand for strict validation
    pub fn strict(self) -> Self {
        self.validation_mode(ValidationMode::Strict)
    }

    /// Build the pipeline
    pub fn build(self) -> OverridePipeline {
        OverridePipeline::from_parts(self.variable_replacer, self.validation_mode)
    }
}
