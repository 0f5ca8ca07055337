//! Override processor registry
//!
//! A closed table of processors, one per field config kind, each converting
//! a raw override value into its canonical typed form given a context.
//!
//! # Module Organization
//!
//! - [`types`] - Kinds, typed settings, output values, untyped requests
//! - [`built_in`] - The processor function for each kind
//! - [`pipeline`] - Dispatch by kind plus the optional validation stage
//! - [`builder`] - Capability injection for pipelines
//!
//! # Examples
//!
//! ```
//! use fieldconf_core::processors::{OverridePipeline, ProcessorSettings, FieldConfigKind, FieldConfigValue};
//! use fieldconf_core::OverrideContext;
//! use serde_json::json;
//!
//! let pipeline = OverridePipeline::new();
//! let settings = ProcessorSettings::default_for(FieldConfigKind::Number);
//! let value = pipeline.process(Some(&json!("3.14")), &OverrideContext::default(), &settings);
//! assert_eq!(value, FieldConfigValue::Number(3.14));
//! ```
//!
//! Copyright (c) 2025 Fieldconf Team
//! Licensed under the Apache-2.0 license

pub mod types;

pub mod built_in;

pub mod pipeline;

pub mod builder;

#[cfg(test)]
mod tests;

pub use types::{
    BooleanFieldConfigSettings, ColorFieldConfigSettings, DataLinksFieldConfigSettings,
    FieldConfigKind, FieldConfigValue, IdentityFieldConfigSettings, NumberFieldConfigSettings,
    OptionsLoader, OverrideRequest, ProcessorSettings, SelectFieldConfigSettings,
    StringFieldConfigSettings, ThresholdsFieldConfigSettings, UnitFieldConfigSettings,
    ValueMappingFieldConfigSettings,
};

pub use pipeline::{OverridePipeline, ProcessedOverride};
pub use builder::OverridePipelineBuilder;
