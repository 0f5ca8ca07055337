//! Process command handler

use super::utils::{apply_config_defaults, build_pipeline, load_request};
use crate::cli::{OutputFormat, ProcessArgs};
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use tracing::{info, instrument};

/// Handle the process command
#[instrument(skip(config, output), fields(file = %args.request_file.display()))]
pub async fn handle_process(
    args: ProcessArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::with_details(
        "process_command",
        &format!("file: {}", args.request_file.display()),
    );

    let mut request = load_request(&args.request_file)?;
    apply_config_defaults(&mut request, config);
    info!(kind = %request.kind, "Processing override");
    output.debug(&format!(
        "kind: {}, value present: {}, context frames: {}",
        request.kind,
        request.value.is_some(),
        request.context.data.len()
    ))?;

    let pipeline = build_pipeline(config, args.validation_mode(), !args.no_vars);
    let processed = {
        let _pipeline_timer = Timer::new("override_pipeline");
        pipeline.apply_request(&request)?
    };

    output.processed(&processed)?;

    // Non-clean reports are already part of the human output
    if args.show_report && output.format() == OutputFormat::Human && processed.report.is_clean() {
        output.section("Validation")?;
        output.report(&processed.report)?;
    }

    Ok(())
}
