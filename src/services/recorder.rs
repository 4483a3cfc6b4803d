//! Report Recording
//!
//! Node side: parse every canonical report of a namespace into one
//! `TestResultAggregate`. Coordinator side: merge it into the run's
//! aggregate, creating the aggregate on first recording.

use std::path::Path;

use chrono::Utc;

use xunit_converters::validation::parse_time;
use xunit_converters::XmlElement;
use xunit_core::{CoreError, CoreResult, RunLog};
use xunit_gates::{CaseResult, CaseStatus, SuiteResult, TestResultAggregate};

use crate::models::run::Run;
use crate::services::node::protocol::{NodeRequest, NodeResponse};
use crate::services::node::{dispatch, ExecutionNode};
use crate::services::pattern;
use crate::utils::error::AppResult;
use crate::utils::paths;

/// Parse the canonical reports under `<workspace>/generatedJUnitFiles/<namespace>`.
///
/// The aggregate timestamp is the run start shifted by the clock difference
/// between this node and the coordinator.
pub fn parse_reports(
    workspace: &Path,
    namespace: &str,
    build_time_ms: i64,
    coordinator_now_ms: i64,
    log: &RunLog,
) -> CoreResult<TestResultAggregate> {
    let node_now_ms = Utc::now().timestamp_millis();
    let timestamp_ms = build_time_ms + (node_now_ms - coordinator_now_ms);

    let root = paths::namespace_dir(workspace, namespace);
    let files = if root.is_dir() {
        pattern::find_files(&root, paths::REPORT_PATTERN)?
    } else {
        Vec::new()
    };

    let mut suites = Vec::new();
    for file in &files {
        match parse_canonical_report(file) {
            Ok(parsed) => suites.extend(parsed),
            Err(err) => log.error(format!(
                "Failed to read the report '{}': {}",
                file.display(),
                err
            )),
        }
    }
    tracing::debug!(namespace, reports = files.len(), "canonical reports parsed");
    Ok(TestResultAggregate::from_suites(suites, timestamp_ms))
}

/// Suites of one canonical (JUnit) report.
pub fn parse_canonical_report(path: &Path) -> CoreResult<Vec<SuiteResult>> {
    let root = XmlElement::parse_file(path)?;
    let fallback = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut suites = Vec::new();
    match root.name.as_str() {
        "testsuites" | "testsuite" => collect_suites(&root, &fallback, &mut suites),
        other => {
            return Err(CoreError::parse(format!(
                "Unexpected root element <{}> in '{}'",
                other,
                path.display()
            )))
        }
    }
    Ok(suites)
}

fn collect_suites(element: &XmlElement, fallback: &str, out: &mut Vec<SuiteResult>) {
    if element.name == "testsuite" {
        let name = element.attr("name").unwrap_or(fallback);
        let mut suite = SuiteResult::new(name);
        for case in element.children_named("testcase") {
            suite.push(parse_case(case));
        }
        if !suite.cases.is_empty() {
            out.push(suite);
        }
    }
    for nested in element.children_named("testsuite") {
        collect_suites(nested, fallback, out);
    }
}

fn parse_case(case: &XmlElement) -> CaseResult {
    let name = case.attr("name").unwrap_or_default();
    let failure = case.child("failure").or_else(|| case.child("error"));

    let mut result = if let Some(failure) = failure {
        let message = failure
            .attr("message")
            .map(str::to_string)
            .unwrap_or_else(|| failure.text_trimmed().to_string());
        CaseResult::failed(name, message)
    } else if let Some(skipped) = case.child("skipped") {
        let mut result = CaseResult::skipped(name);
        if let Some(message) = skipped.attr("message") {
            result = result.with_message(message);
        }
        result
    } else {
        CaseResult::new(name, CaseStatus::Passed)
    };

    if let Some(class_name) = case.attr("classname") {
        result = result.with_class_name(class_name);
    }
    if let Some(secs) = case.attr("time").and_then(parse_time) {
        result = result.with_duration(secs);
    }
    result
}

/// Parse the namespace on the node and merge the result into the run.
pub async fn record(node: &dyn ExecutionNode, run: &mut Run, namespace: &str) -> AppResult<()> {
    let log = run.context().log().clone();
    let request = NodeRequest::ParseReports {
        namespace: namespace.to_string(),
        build_time_ms: run.context().started_at_ms(),
        coordinator_now_ms: Utc::now().timestamp_millis(),
    };
    let aggregate = match dispatch(node, &log, request).await? {
        NodeResponse::Parsed { aggregate } => aggregate,
        other => {
            return Err(CoreError::state(format!(
                "Unexpected reply to a report parse request: {:?}",
                other
            ))
            .into())
        }
    };
    merge_into_run(run, aggregate, &log);
    Ok(())
}

/// Attach `aggregate` to the run, merging with an earlier recording.
pub fn merge_into_run(run: &mut Run, aggregate: TestResultAggregate, log: &RunLog) {
    let slot = run.test_result_mut();
    match slot.as_mut() {
        Some(existing) => existing.merge(aggregate),
        None => *slot = Some(aggregate),
    }
    if let Some(merged) = slot.as_mut() {
        merged.tally();
        if merged.is_empty_report() {
            log.warn("All test reports are empty.");
        }
    }
}
