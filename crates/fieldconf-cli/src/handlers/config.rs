//! Configuration command handlers

use crate::cli::{ConfigAction, ConfigArgs, ConfigFormat, ConfigInitArgs, ConfigShowArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputWriter;

/// Handle the config command
pub async fn handle_config(
    args: ConfigArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    match args.action {
        ConfigAction::Init(init_args) => handle_config_init(init_args, output),
        ConfigAction::Show(show_args) => handle_config_show(show_args, config, output),
    }
}

/// Handle config init subcommand
fn handle_config_init(args: ConfigInitArgs, output: &mut OutputWriter) -> Result<()> {
    if args.path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {} (use --force to overwrite)",
            args.path.display()
        ))?;
        return Ok(());
    }

    Config::default().save(&args.path)?;
    tracing::info!(path = %args.path.display(), "Wrote default configuration");
    output.success(&format!("✓ Created config at {}", args.path.display()))?;
    output.info("Edit it to set the validation mode and global template variables.")?;
    Ok(())
}

/// Handle config show subcommand
fn handle_config_show(
    args: ConfigShowArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let content = render_config(config, args.format)?;
    output.writeln(content.trim_end())
}

fn render_config(config: &Config, format: ConfigFormat) -> Result<String> {
    match format {
        ConfigFormat::Toml => toml::to_string_pretty(config)
            .map_err(|e| Error::config(format!("Failed to serialize as TOML: {}", e))),
        ConfigFormat::Json => serde_json::to_string_pretty(config)
            .map_err(|e| Error::config(format!("Failed to serialize as JSON: {}", e))),
        ConfigFormat::Yaml => serde_yaml::to_string(config)
            .map_err(|e| Error::config(format!("Failed to serialize as YAML: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use fieldconf_core::ValidationMode;

    #[test]
    fn test_render_config_formats() {
        let mut config = Config::default();
        config.pipeline.validation = ValidationMode::Strict;

        let toml = render_config(&config, ConfigFormat::Toml).unwrap();
        assert!(toml.contains("[pipeline]"));
        assert!(toml.contains("validation = \"strict\""));

        let json = render_config(&config, ConfigFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["pipeline"]["validation"], "strict");

        let yaml = render_config(&config, ConfigFormat::Yaml).unwrap();
        assert!(yaml.contains("validation: strict"));
    }

    #[tokio::test]
    async fn test_config_init_writes_loadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".fieldconf.toml");
        let mut output = OutputWriter::with_writer(
            OutputFormat::Human,
            false,
            true,
            0,
            Box::new(std::io::sink()),
        );

        let args = ConfigArgs {
            action: ConfigAction::Init(ConfigInitArgs {
                path: path.clone(),
                force: false,
            }),
        };
        handle_config(args, &Config::default(), &mut output)
            .await
            .unwrap();

        assert_eq!(Config::from_file(&path).unwrap(), Config::default());
    }

    #[tokio::test]
    async fn test_config_init_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".fieldconf.toml");
        std::fs::write(&path, "[variables]\nenv = \"prod\"\n").unwrap();
        let mut output = OutputWriter::with_writer(
            OutputFormat::Human,
            false,
            true,
            0,
            Box::new(std::io::sink()),
        );

        let args = ConfigArgs {
            action: ConfigAction::Init(ConfigInitArgs {
                path: path.clone(),
                force: false,
            }),
        };
        handle_config(args, &Config::default(), &mut output)
            .await
            .unwrap();

        let kept = Config::from_file(&path).unwrap();
        assert_eq!(kept.variables.get("env").map(String::as_str), Some("prod"));
    }
}
