//! Fieldconf Core - field configuration override processors
//!
//! This crate converts raw, user- or API-supplied override values into
//! validated, typed field configuration values, resolving embedded `&&(name)`
//! template tokens against the dataset being displayed.
//!
//! # Main Components
//!
//! - **Threshold Model**: sorted steps with a negative infinity floor and a display mode
//! - **Override Context**: the field being configured plus every data series
//! - **Template Resolver**: `&&(name)` lookup against labels, then series fields
//! - **Processor Registry**: one typed processor per field config kind
//! - **Validation**: optional structural checks layered after processing
//!
//! # Example
//!
//! ```
//! use fieldconf_core::{Field, OverrideContext, OverridePipeline, ProcessorSettings, FieldConfigKind};
//! use serde_json::json;
//!
//! let field = Field::new("latency").with_label("region", "us-east");
//! let ctx = OverrideContext::for_field(field);
//! let pipeline = OverridePipeline::new();
//!
//! let settings = ProcessorSettings::default_for(FieldConfigKind::String);
//! let value = pipeline.process(Some(&json!("Latency (&&(region))")), &ctx, &settings);
//! assert_eq!(value.as_str(), Some("Latency (us-east)"));
//! ```

pub mod context;
pub mod error;
pub mod processors;
pub mod template;
pub mod thresholds;
pub mod types;
pub mod validation;
pub mod variables;

// Re-export main types for convenience
pub use context::OverrideContext;
pub use error::{Error, Result, Severity};
pub use processors::{
    FieldConfigKind, FieldConfigValue, OptionsLoader, OverridePipeline, OverridePipelineBuilder,
    OverrideRequest, ProcessedOverride, ProcessorSettings,
};
pub use thresholds::{Threshold, ThresholdsConfig, ThresholdsMode};
pub use types::{
    DataFrame, DataLink, Field, FieldState, Labels, MappingType, ScopedVar, ScopedVars,
    SelectableValue, ValueMapping,
};
pub use validation::{ValidationIssue, ValidationMode, ValidationReport};
pub use variables::{ScopedVarsReplacer, VariableReplacer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod proptest_strategies;
