//! Validate command handler

use super::utils::{apply_config_defaults, build_pipeline, load_request};
use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use fieldconf_core::{Severity, ValidationMode, ValidationReport};
use tracing::{info, instrument, warn};

/// Handle the validate command
///
/// Runs the pipeline in warn mode so the whole report is collected, then
/// fails when it holds errors (or warnings, with `--deny-warnings`).
#[instrument(skip(config, output), fields(file = %args.request_file.display()))]
pub async fn handle_validate(
    args: ValidateArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::with_details(
        "validate_command",
        &format!("file: {}", args.request_file.display()),
    );
    output.info(&format!("Validating override: {}", args.request_file.display()))?;

    let mut request = load_request(&args.request_file)?;
    apply_config_defaults(&mut request, config);

    let pipeline = build_pipeline(config, Some(ValidationMode::Warn), true);
    let processed = pipeline.apply_request(&request)?;

    let failures = failure_count(&processed.report, args.deny_warnings);
    if failures == 0 {
        info!(kind = %processed.kind, "Override is valid");
        output.success(&format!("✓ {} override is valid", processed.kind))?;
        if !processed.report.is_clean() {
            output.report(&processed.report)?;
        }
        return Ok(());
    }

    warn!(kind = %processed.kind, failures, "Override validation failed");
    output.error(&format!("✗ {} override validation failed", processed.kind))?;
    output.report(&processed.report)?;

    Err(Error::ValidationFailed { count: failures })
}

/// Number of issues that fail validation
fn failure_count(report: &ValidationReport, deny_warnings: bool) -> usize {
    report
        .issues
        .iter()
        .filter(|issue| match issue.severity {
            Severity::Error => true,
            Severity::Warning => deny_warnings,
            Severity::Info => false,
        })
        .count()
}
