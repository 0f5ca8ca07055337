//! Configuration management for the CLI
//!
//! Configuration comes from, in order of precedence:
//! - Command-line arguments
//! - An explicit file (`--config` or `FIELDCONF_CONFIG`)
//! - The first default location that exists
//! - Built-in defaults

use crate::error::{Error, Result};
use fieldconf_core::ValidationMode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pipeline behavior
    pub pipeline: PipelineConfig,

    /// Global template variables handed to the variable replacer
    pub variables: BTreeMap<String, String>,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Validation applied after processing
    pub validation: ValidationMode,

    /// Expand template variables in string overrides whose settings do not say
    pub expand_template_vars: bool,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: String,

    /// Use colored output by default
    pub color: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter used when no `-v` flag is given
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
            color: true,
        }
    }
}

/// Supported config file encodings, picked by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Toml,
    Yaml,
    Json,
}

impl FileKind {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Self::Yaml,
            Some("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_str_with_kind(&content, FileKind::from_path(path))
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))
    }

    fn from_str_with_kind(content: &str, kind: FileKind) -> Result<Self> {
        let config = match kind {
            FileKind::Toml => toml::from_str(content)?,
            FileKind::Yaml => serde_yaml::from_str(content)?,
            FileKind::Json => serde_json::from_str(content)?,
        };
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                tracing::debug!(path = %path.display(), "Loading configuration file");
                return Self::from_file(&path);
            }
        }

        tracing::debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Get default configuration file paths to check
    pub fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".fieldconf.toml"),
            PathBuf::from(".fieldconf.yaml"),
            PathBuf::from(".fieldconf.json"),
        ];

        if let Some(path) = Self::user_config_path() {
            paths.push(path);
        }

        paths
    }

    /// Location of the per-user config file
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("fieldconf").join("config.toml"))
    }

    /// Serialize in the encoding matching the file extension
    pub fn to_string_for(&self, path: &Path) -> Result<String> {
        let content = match FileKind::from_path(path) {
            FileKind::Toml => toml::to_string_pretty(self)?,
            FileKind::Yaml => serde_yaml::to_string(self)?,
            FileKind::Json => serde_json::to_string_pretty(self)?,
        };
        Ok(content)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_string_for(path)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Global variables as the map the replacer expects
    pub fn global_variables(&self) -> std::collections::HashMap<String, String> {
        self.variables
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.pipeline.validation, ValidationMode::Lenient);
        assert!(!config.pipeline.expand_template_vars);
        assert!(config.variables.is_empty());
        assert_eq!(config.output.format, "human");
        assert_eq!(config.logging.format, None);
    }

    #[test]
    fn test_load_toml() {
        let file = write_temp(
            ".toml",
            r#"
[pipeline]
validation = "strict"
expand_template_vars = true

[variables]
datacenter = "dc1"

[output]
format = "json"
"#,
        );

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.pipeline.validation, ValidationMode::Strict);
        assert!(config.pipeline.expand_template_vars);
        assert_eq!(config.variables.get("datacenter").map(String::as_str), Some("dc1"));
        assert_eq!(config.output.format, "json");
        assert!(config.output.color);
    }

    #[test]
    fn test_load_yaml_and_json() {
        let yaml = write_temp(".yaml", "pipeline:\n  validation: warn\nvariables:\n  env: prod\n");
        let config = Config::from_file(yaml.path()).unwrap();
        assert_eq!(config.pipeline.validation, ValidationMode::Warn);
        assert_eq!(config.global_variables().get("env").map(String::as_str), Some("prod"));

        let json = write_temp(".json", r#"{"logging": {"level": "debug"}}"#);
        let config = Config::from_file(json.path()).unwrap();
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.pipeline, PipelineConfig::default());
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let file = write_temp(".toml", "[pipeline]\nvalidation = \"sometimes\"\n");
        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file(Path::new("/nonexistent/fieldconf.toml")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.pipeline.validation = ValidationMode::Warn;
        config.variables.insert("host".to_string(), "web-1".to_string());
        config.save(&path).unwrap();

        assert_eq!(Config::from_file(&path).unwrap(), config);
    }
}
