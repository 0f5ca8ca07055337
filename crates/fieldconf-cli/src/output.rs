//! Output formatting and writing utilities
//!
//! This module formats processed overrides and validation reports as JSON,
//! YAML or human-readable text.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use fieldconf_core::{
    FieldConfigValue, ProcessedOverride, Severity, ThresholdsConfig, ValidationIssue,
    ValidationReport,
};
use fieldconf_core::template::format_number;
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};
use tracing::{debug, trace};

/// Formatting for serializable values and the pipeline's result types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a processed override with its report
    fn format_processed(&self, processed: &ProcessedOverride) -> Result<String>;

    /// Format a validation report
    fn format_report(&self, report: &ValidationReport) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty | OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }

    fn format_processed(&self, processed: &ProcessedOverride) -> Result<String> {
        match self {
            OutputFormat::Human => format_processed_human(processed),
            _ => self.format(processed),
        }
    }

    fn format_report(&self, report: &ValidationReport) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_report_human(report)),
            _ => self.format(report),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    verbose: u8,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, verbose: u8) -> Self {
        Self::with_writer(format, use_color, quiet, verbose, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        verbose: u8,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            verbose,
            writer,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write an error message
    pub fn error(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.red().to_string())
        } else {
            self.writeln(&format!("ERROR: {}", message))
        }
    }

    /// Write debug information if verbose mode is enabled
    pub fn debug(&mut self, message: &str) -> Result<()> {
        if self.verbose == 0 || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "DEBUG:".dimmed(), message.dimmed()))
        } else {
            self.writeln(&format!("DEBUG: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!("Outputting data: {}", formatted);
        self.writeln(formatted.trim_end())
    }

    /// Write a processed override
    pub fn processed(&mut self, processed: &ProcessedOverride) -> Result<()> {
        let formatted = self.format.format_processed(processed)?;
        self.writeln(formatted.trim_end())
    }

    /// Write a validation report
    pub fn report(&mut self, report: &ValidationReport) -> Result<()> {
        let formatted = self.format.format_report(report)?;
        self.writeln(formatted.trim_end())
    }

    /// Write a table (for human format)
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }

        let header_row = headers
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
            .collect::<Vec<_>>()
            .join(" │ ");

        if self.use_color {
            self.writeln(&header_row.bold().to_string())?;
        } else {
            self.writeln(&header_row)?;
        }

        let separator = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        self.writeln(&separator)?;

        for row in rows {
            let row_str = row
                .iter()
                .enumerate()
                .map(|(i, cell)| match widths.get(i) {
                    Some(width) => format!("{:width$}", cell, width = width),
                    None => cell.clone(),
                })
                .collect::<Vec<_>>()
                .join(" │ ");
            self.writeln(row_str.trim_end())?;
        }

        Ok(())
    }
}

/// Format a processed override for human reading
fn format_processed_human(processed: &ProcessedOverride) -> Result<String> {
    let mut output = String::new();

    output.push_str(&format!("Kind: {}\n", processed.kind));
    output.push_str(&format!("Type: {}\n", processed.value.type_name()));
    output.push_str(&format!("Value: {}\n", format_field_config_value(&processed.value)?));

    if !processed.report.is_clean() {
        output.push('\n');
        output.push_str(&format_report_human(&processed.report));
    }

    Ok(output)
}

/// Render a typed value on one line, or as an indented block for thresholds
fn format_field_config_value(value: &FieldConfigValue) -> Result<String> {
    Ok(match value {
        FieldConfigValue::Undefined => "undefined".to_string(),
        FieldConfigValue::Null => "null".to_string(),
        FieldConfigValue::Number(n) if n.is_nan() => "NaN".to_string(),
        FieldConfigValue::Number(n) => n.to_string(),
        FieldConfigValue::String(s) => format!("\"{}\"", s),
        FieldConfigValue::Boolean(b) => b.to_string(),
        FieldConfigValue::Links(links) => format!("{} link(s)", links.len()),
        FieldConfigValue::Mappings(mappings) => format!("{} mapping(s)", mappings.len()),
        FieldConfigValue::Thresholds(cfg) => format_thresholds_human(cfg),
        FieldConfigValue::Raw(raw) => format_value_compact(raw),
    })
}

fn format_thresholds_human(cfg: &ThresholdsConfig) -> String {
    let mut output = format!("{} thresholds", cfg.mode);
    if let Some(field) = &cfg.field_name {
        output.push_str(&format!(" (field: {})", field));
    }

    for step in &cfg.steps {
        let value = format_number(step.value);
        output.push_str(&format!("\n  {:>10} → {}", value, step.color));
        if let Some(state) = &step.state {
            output.push_str(&format!(" [{}]", state));
        }
    }

    output
}

/// Format a validation report for human reading
fn format_report_human(report: &ValidationReport) -> String {
    if report.is_clean() {
        return "✅ No issues found\n".to_string();
    }

    let mut output = format!("Found {} issue(s)\n", report.issues.len());
    for severity in [Severity::Error, Severity::Warning, Severity::Info] {
        let issues: Vec<&ValidationIssue> = report
            .issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .collect();
        if issues.is_empty() {
            continue;
        }

        let icon = match severity {
            Severity::Error => "❌",
            Severity::Warning => "⚠️",
            Severity::Info => "ℹ️",
        };
        output.push_str(&format!("{} {} ({}):\n", icon, severity, issues.len()));

        for issue in issues {
            output.push_str(&format!("  📍 {}: {}\n", issue.path, issue.message));
            if let (Some(expected), Some(actual)) = (&issue.expected, &issue.actual) {
                output.push_str(&format!("     expected {}, got {}\n", expected, actual));
            }
        }
    }

    output
}

/// Format a JSON value in a compact, human-readable way
fn format_value_compact(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            if arr.len() <= 3 {
                format!(
                    "[{}]",
                    arr.iter()
                        .map(format_value_compact)
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            } else {
                format!("[{} items]", arr.len())
            }
        }
        Value::Object(obj) => {
            if obj.len() <= 2 {
                let items: Vec<String> = obj
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, format_value_compact(v)))
                    .collect();
                format!("{{{}}}", items.join(", "))
            } else {
                format!("{{{} fields}}", obj.len())
            }
        }
    }
}
