//! Shared utilities for command handlers

use crate::config::Config;
use crate::error::{Error, Result};
use fieldconf_core::{
    FieldConfigKind, OverridePipeline, OverrideRequest, ScopedVarsReplacer, ValidationMode,
};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Load an override request from a JSON or YAML file
pub fn load_request(path: &Path) -> Result<OverrideRequest> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "Read request file");

    let is_yaml = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false);

    if is_yaml {
        serde_yaml::from_str(&content).map_err(|e| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "YAML override request".to_string(),
            reason: e.to_string(),
        })
    } else {
        serde_json::from_str(&content).map_err(|e| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "JSON override request".to_string(),
            reason: e.to_string(),
        })
    }
}

/// Fill in config-level defaults the request leaves open
///
/// String overrides without an explicit `expandTemplateVars` take the
/// configured default.
pub fn apply_config_defaults(request: &mut OverrideRequest, config: &Config) {
    if request.kind != FieldConfigKind::String || !config.pipeline.expand_template_vars {
        return;
    }

    match &mut request.settings {
        None | Some(Value::Null) => {
            request.settings = Some(serde_json::json!({ "expandTemplateVars": true }));
        }
        Some(Value::Object(map)) => {
            map.entry("expandTemplateVars").or_insert(Value::Bool(true));
        }
        Some(_) => {}
    }
}

/// Build the pipeline from config, with an optional mode override
pub fn build_pipeline(
    config: &Config,
    mode: Option<ValidationMode>,
    with_variables: bool,
) -> OverridePipeline {
    let mode = mode.unwrap_or(config.pipeline.validation);
    let mut builder = OverridePipeline::builder().validation_mode(mode);

    if with_variables {
        builder = builder.variable_replacer(ScopedVarsReplacer::with_globals(
            config.global_variables(),
        ));
    }

    tracing::debug!(mode = %mode, variables = with_variables, "Built override pipeline");
    builder.build()
}
