//! Report Conversion (node side)
//!
//! Runs one tool's converter over every report matching the job pattern and
//! writes canonical reports under the namespace. Executes on the node that
//! owns the workspace; the coordinator only sees the processed count.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use xunit_converters::{ConverterRegistry, FormatConverter};
use xunit_core::{CoreError, CoreResult, RunLog};

use crate::services::node::protocol::ConversionJob;
use crate::services::pattern;
use crate::utils::paths;

/// Convert the reports of `job`, returning how many input files were processed.
pub fn convert_reports(
    workspace: &Path,
    job: &ConversionJob,
    registry: &ConverterRegistry,
    log: &RunLog,
) -> CoreResult<usize> {
    let converter = registry.create(&job.tool.format, job.stylesheet.clone())?;
    let tool_name = converter.tool_name().to_string();

    // Reports generated by earlier tools are never inputs
    let generated = paths::generated_root(workspace);
    let files: Vec<PathBuf> = pattern::find_files(workspace, &job.pattern)?
        .into_iter()
        .filter(|f| !f.starts_with(&generated))
        .collect();
    if files.is_empty() {
        let message = format!(
            "[{}] - No test report file(s) were found with the pattern '{}' relative to '{}'.",
            tool_name,
            job.pattern,
            workspace.display()
        );
        if job.tool.skip_no_test_files {
            log.warn(format!("{} Skipping.", message));
            return Ok(0);
        }
        return Err(CoreError::no_test_found(format!(
            "{} Did you enter a pattern relative to the workspace directory? Did you generate the result report(s) for '{}'?",
            message, tool_name
        )));
    }

    log.info(format!(
        "[{}] - {} test report file(s) were found with the pattern '{}' relative to '{}' for the testing framework '{}'.",
        tool_name,
        files.len(),
        job.pattern,
        workspace.display(),
        tool_name
    ));

    if job.tool.fail_if_not_new {
        check_freshness(&files, job.build_time_ms - job.test_time_margin_ms)?;
    }

    let output_dir = paths::tool_dir(workspace, &job.namespace, &tool_name);
    fs::create_dir_all(&output_dir)?;

    let mut processed = 0;
    for file in &files {
        if fs::metadata(file)?.len() == 0 {
            log.warn(format!(
                "[{}] - The file '{}' is empty. This file has been skipped.",
                tool_name,
                file.display()
            ));
            continue;
        }
        match convert_one(converter.as_ref(), file, &output_dir, log) {
            Ok(true) => processed += 1,
            Ok(false) => {}
            Err(err) if job.tool.stop_processing_if_error => return Err(err),
            Err(err) => log.error(format!("[{}] - {}", tool_name, err)),
        }
    }

    tracing::debug!(tool = %tool_name, processed, "conversion finished");
    Ok(processed)
}

/// Validate, convert and re-validate one file. `Ok(false)` when the input
/// was rejected.
fn convert_one(
    converter: &dyn FormatConverter,
    input: &Path,
    output_dir: &Path,
    log: &RunLog,
) -> CoreResult<bool> {
    let tool_name = converter.tool_name();

    if let Err(errors) = converter.validate_input(input) {
        log.error(format!(
            "[{}] - The result file '{}' for the metric '{}' is not valid. The result file has been skipped.",
            tool_name,
            input.display(),
            tool_name
        ));
        for error in errors {
            log.error(error.to_string());
        }
        return Ok(false);
    }

    let output = output_dir.join(paths::report_file_name());
    if let Err(e) = converter.convert(input, &output) {
        // A partial output must not reach the recorder
        if let Err(remove_err) = fs::remove_file(&output) {
            if remove_err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %output.display(),
                    error = %remove_err,
                    "partial report left behind"
                );
            }
        }
        return Err(CoreError::conversion(format!(
            "Conversion of the file '{}' has failed: {}",
            input.display(),
            e
        )));
    }

    if let Err(errors) = converter.validate_output(&output) {
        log.error(format!(
            "[{}] - The converted file for the result file '{}' (during conversion process for the metric '{}') is not valid. The report file has been kept.",
            tool_name,
            input.display(),
            tool_name
        ));
        for error in errors {
            log.error(error.to_string());
        }
    }
    Ok(true)
}

/// Every file must be modified no earlier than `threshold_ms`.
fn check_freshness(files: &[PathBuf], threshold_ms: i64) -> CoreResult<()> {
    let mut stale = Vec::new();
    for file in files {
        let modified = modified_ms(file)?;
        if modified < threshold_ms {
            stale.push(format!(
                "{} (modified {} ms before the run start)",
                file.display(),
                threshold_ms - modified
            ));
        }
    }
    if stale.is_empty() {
        return Ok(());
    }
    Err(CoreError::outdated_reports(format!(
        "Test reports were found but not all of them are new. Did all the tests run?\n  * {}",
        stale.join("\n  * ")
    )))
}

fn modified_ms(file: &Path) -> CoreResult<i64> {
    let modified = fs::metadata(file)?.modified()?;
    Ok(DateTime::<Utc>::from(modified).timestamp_millis())
}
